use dog_core::{DogResult, EdgeFilter, ScaleSpaceConfig};
use dog_pyramid::{ImageprocProcessing, Processing, PyramidBuilder};

use crate::config::DetectorConfig;
use crate::configured_detector::ConfiguredDetector;
use crate::detector::KeypointDetector;

/// Builder for creating a `ConfiguredDetector`
#[derive(Debug, Clone, Default)]
pub struct DetectorBuilder {
    config: ScaleSpaceConfig,
}

impl DetectorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: ScaleSpaceConfig::default(),
        }
    }

    /// Set the number of octaves
    pub fn octaves(mut self, num_octaves: usize) -> Self {
        self.config.num_octaves = num_octaves;
        self
    }

    /// Set the number of blurred scales per octave
    pub fn scales(mut self, num_scales: usize) -> Self {
        self.config.num_scales = num_scales;
        self
    }

    /// Set the blur of the first scale of each octave
    pub fn initial_sigma(mut self, sigma: f32) -> Self {
        self.config.initial_sigma = sigma;
        self
    }

    /// Set the resolution reduction between octaves
    pub fn downsampling_factor(mut self, factor: usize) -> Self {
        self.config.downsampling_factor = factor;
        self
    }

    /// Set the minimum absolute DoG response
    pub fn contrast_threshold(mut self, threshold: f32) -> Self {
        self.config.contrast_threshold = threshold;
        self
    }

    /// Set the edge threshold and the rule it applies to
    pub fn edge_filter(mut self, filter: EdgeFilter, threshold: f32) -> Self {
        self.config.edge_filter = filter;
        self.config.edge_threshold = threshold;
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    /// Apply the reference preset
    pub fn preset_reference(mut self) -> Self {
        self.config = DetectorConfig::reference_preset().core;
        self
    }

    /// Apply the SIFT-like preset
    pub fn preset_sift_like(mut self) -> Self {
        self.config = DetectorConfig::sift_like_preset().core;
        self
    }

    /// Apply the coarse preset
    pub fn preset_coarse(mut self) -> Self {
        self.config = DetectorConfig::coarse_preset().core;
        self
    }

    /// Build a detector backed by `imageproc` blur and `image` resize
    pub fn build(self) -> DogResult<ConfiguredDetector> {
        self.build_with_processing(ImageprocProcessing)
    }

    /// Build with custom blur and resize primitives
    pub fn build_with_processing<P: Processing>(self, processing: P) -> DogResult<ConfiguredDetector<P>> {
        self.config.validate()?;
        let detector = KeypointDetector::from_config(&self.config)?;
        Ok(ConfiguredDetector {
            pyramid: PyramidBuilder::with_processing(processing),
            detector,
            config: self.config,
        })
    }

    /// Generate a summary of the builder's configuration
    pub fn summary(&self) -> String {
        self.clone().to_config().summary()
    }

    /// Create a builder from an existing `DetectorConfig`
    pub fn from_config(config: DetectorConfig) -> Self {
        Self { config: config.core }
    }

    /// Convert the builder into a `DetectorConfig`
    pub fn to_config(self) -> DetectorConfig {
        DetectorConfig::from(self.config)
    }

    pub fn config(&self) -> &ScaleSpaceConfig {
        &self.config
    }
}
