//! Keypoint detection over Difference-of-Gaussian pyramids.

pub mod builder;
pub mod config;
pub mod configured_detector;
pub mod detector;
pub mod rules;
pub mod types;

pub use builder::DetectorBuilder;
pub use config::DetectorConfig;
pub use configured_detector::ConfiguredDetector;
pub use detector::{DEFAULT_EDGE_THRESHOLD, KeypointDetector};
pub use rules::{Extremum, classify_extremum, passes_contrast, passes_edge};
pub use types::{DetectionReport, DetectionStats, ScoredKeypoint};
