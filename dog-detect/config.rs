use dog_core::{DogResult, EdgeFilter, ScaleSpaceConfig};

use crate::builder::DetectorBuilder;
use crate::detector::KeypointDetector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete detector configuration with optional metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Metadata
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub version: Option<String>,
    /// Pyramid and threshold settings
    pub core: ScaleSpaceConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ScaleSpaceConfig> for DetectorConfig {
    fn from(core: ScaleSpaceConfig) -> Self {
        Self {
            core,
            ..Self::new()
        }
    }
}

impl DetectorConfig {
    /// Configuration with default settings
    pub fn new() -> Self {
        Self {
            core: ScaleSpaceConfig::default(),
            name: None,
            description: None,
            version: None,
        }
    }

    /// 3 octaves of 5 scales from sigma 1.6, contrast 100 and the gradient edge rule
    pub fn reference_preset() -> Self {
        Self {
            core: ScaleSpaceConfig::default(),
            name: Some("Reference".to_string()),
            description: Some("Defaults of the scale-space prototype: sigma 1.6, contrast 100".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Lower contrast threshold with the Hessian curvature edge test
    pub fn sift_like_preset() -> Self {
        Self {
            core: ScaleSpaceConfig {
                num_octaves: 4,
                num_scales: 5,
                initial_sigma: 1.6,
                downsampling_factor: 2,
                contrast_threshold: 8.0,
                edge_threshold: 10.0,
                edge_filter: EdgeFilter::HessianRatio,
                ..ScaleSpaceConfig::default()
            },
            name: Some("SIFT-like".to_string()),
            description: Some("Conventional curvature-ratio edge rejection".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Few, large-scale responses: aggressive downsampling and a high contrast bar
    pub fn coarse_preset() -> Self {
        Self {
            core: ScaleSpaceConfig {
                num_octaves: 2,
                num_scales: 4,
                initial_sigma: 2.0,
                downsampling_factor: 3,
                contrast_threshold: 50.0,
                edge_threshold: 10.0,
                edge_filter: EdgeFilter::GradientMagnitude,
                ..ScaleSpaceConfig::default()
            },
            name: Some("Coarse".to_string()),
            description: Some("Fast pass keeping only strong, large-scale responses".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self.version = Some("1.0".to_string());
        self
    }

    /// Convert to DetectorBuilder for further customization
    pub fn to_builder(self) -> DetectorBuilder {
        DetectorBuilder::from_config(self)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        let c = &self.core;
        format!(
            "DetectorConfig: octaves={}, scales={}, sigma={}, downsample={}, contrast={}, edge={:?}@{}, threads={}",
            c.num_octaves,
            c.num_scales,
            c.initial_sigma,
            c.downsampling_factor,
            c.contrast_threshold,
            c.edge_filter,
            c.edge_threshold,
            c.n_threads
        )
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> DogResult<()> {
        self.core.validate()?;
        KeypointDetector::from_config(&self.core)?;
        Ok(())
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize to JSON string
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from TOML string
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dog_core::DogError;

    #[test]
    fn test_presets_validate() {
        for cfg in [
            DetectorConfig::new(),
            DetectorConfig::reference_preset(),
            DetectorConfig::sift_like_preset(),
            DetectorConfig::coarse_preset(),
        ] {
            assert!(cfg.validate().is_ok(), "{}", cfg.summary());
        }
    }

    #[test]
    fn test_validate_catches_hessian_ratio() {
        let mut cfg = DetectorConfig::sift_like_preset();
        cfg.core.edge_threshold = -1.0;
        assert!(matches!(
            cfg.validate(),
            Err(DogError::InvalidThreshold { name: "edge_threshold", .. })
        ));
    }

    #[test]
    fn test_summary_and_metadata() {
        let cfg = DetectorConfig::coarse_preset().with_metadata("Mine", "Custom");
        assert_eq!(cfg.name.as_deref(), Some("Mine"));
        let summary = cfg.summary();
        assert!(summary.contains("octaves=2"));
        assert!(summary.contains("GradientMagnitude"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_and_toml_round_trip() {
        let cfg = DetectorConfig::sift_like_preset();
        let json = cfg.to_json().unwrap();
        assert!(json.contains("hessian_ratio"));
        assert_eq!(DetectorConfig::from_json(&json).unwrap(), cfg);

        let toml_str = cfg.to_toml().unwrap();
        assert_eq!(DetectorConfig::from_toml(&toml_str).unwrap(), cfg);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_config_fills_defaults_and_validates() {
        let cfg = DetectorConfig::from_toml("[core]\nnum_scales = 3\ncontrast_threshold = 4.0\n").unwrap();
        assert_eq!(cfg.core.num_scales, 3);
        assert_eq!(cfg.core.num_octaves, 3);
        assert_eq!(cfg.core.edge_threshold, 10.0);

        assert!(DetectorConfig::from_json(r#"{"core": {"num_octaves": 0}}"#).is_err());
    }
}
