//! Gaussian scale-space and Difference-of-Gaussian pyramids.

pub mod builder;
pub mod dog;
pub mod processing;
pub mod schedule;

pub use builder::PyramidBuilder;
pub use dog::DogGenerator;
pub use processing::{ImageprocProcessing, LumaFImage, Processing, from_luma_f32, to_luma_f32};
pub use schedule::SigmaSchedule;
