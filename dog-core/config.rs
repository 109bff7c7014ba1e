use crate::error::{DogError, DogResult, DogWarning};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How candidates are rejected as edge-like after the contrast filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeFilter {
    /// Reject when the central-difference gradient magnitude is `<= edge_threshold`.
    #[default]
    GradientMagnitude,
    /// Reject when the Hessian principal-curvature ratio reaches `edge_threshold`,
    /// or the curvatures have opposite signs.
    HessianRatio,
}

/// Minimum interior DoG scales need 4 Gaussian scales per octave.
pub const MIN_USEFUL_SCALES: usize = 4;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScaleSpaceConfig {
    pub num_octaves: usize,
    pub num_scales: usize,
    pub initial_sigma: f32,
    pub downsampling_factor: usize,
    pub contrast_threshold: f32,
    pub edge_threshold: f32,
    pub edge_filter: EdgeFilter,
    pub n_threads: usize,
}

impl Default for ScaleSpaceConfig {
    fn default() -> Self {
        Self {
            num_octaves: 3,
            num_scales: 5,
            initial_sigma: 1.6,
            downsampling_factor: 2,
            contrast_threshold: 100.0,
            edge_threshold: 10.0,
            edge_filter: EdgeFilter::GradientMagnitude,
            n_threads: num_cpus::get().max(1),
        }
    }
}

impl ScaleSpaceConfig {
    /// Checks the parameters that do not depend on the image.
    pub fn validate(&self) -> DogResult<()> {
        if self.num_octaves < 1 {
            return Err(DogError::InvalidOctaveCount(self.num_octaves));
        }
        if self.num_scales < 1 {
            return Err(DogError::InvalidScaleCount(self.num_scales));
        }
        if !(self.initial_sigma.is_finite() && self.initial_sigma > 0.0) {
            return Err(DogError::InvalidSigma(self.initial_sigma));
        }
        if self.downsampling_factor < 1 {
            return Err(DogError::InvalidDownsamplingFactor(self.downsampling_factor));
        }
        if !self.contrast_threshold.is_finite() {
            return Err(DogError::InvalidThreshold {
                name: "contrast_threshold",
                value: self.contrast_threshold,
            });
        }
        if !self.edge_threshold.is_finite() {
            return Err(DogError::InvalidThreshold {
                name: "edge_threshold",
                value: self.edge_threshold,
            });
        }
        Ok(())
    }

    /// Checks the configuration against an input of `width` x `height`,
    /// including that every octave of the downsampling chain keeps at least one pixel.
    pub fn validate_for(&self, width: usize, height: usize) -> DogResult<()> {
        self.validate()?;
        if width == 0 || height == 0 {
            return Err(DogError::InvalidImageSize { width, height });
        }
        for (octave, (w, h)) in self.octave_dimensions(width, height).into_iter().enumerate() {
            if w == 0 || h == 0 {
                return Err(DogError::OctaveTooSmall { octave, width: w, height: h });
            }
        }
        Ok(())
    }

    /// Resolution of every octave for an input of `width` x `height`.
    pub fn octave_dimensions(&self, width: usize, height: usize) -> Vec<(usize, usize)> {
        let factor = self.downsampling_factor.max(1);
        std::iter::successors(Some((width, height)), |&(w, h)| Some((w / factor, h / factor)))
            .take(self.num_octaves)
            .collect()
    }

    /// Non-fatal problems with an otherwise valid configuration.
    pub fn warnings(&self) -> Vec<DogWarning> {
        let mut warnings = Vec::new();
        if self.num_scales < MIN_USEFUL_SCALES {
            warnings.push(DogWarning::DegenerateScaleCount {
                num_scales: self.num_scales,
            });
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScaleSpaceConfig {
        ScaleSpaceConfig {
            n_threads: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let cfg = config();
        assert!(cfg.validate().is_ok());
        assert!(cfg.warnings().is_empty());
        assert_eq!(cfg.edge_filter, EdgeFilter::GradientMagnitude);
        assert_eq!(cfg.edge_threshold, 10.0);
    }

    #[test]
    fn test_invalid_parameters() {
        let mut cfg = config();
        cfg.num_octaves = 0;
        assert_eq!(cfg.validate(), Err(DogError::InvalidOctaveCount(0)));

        let mut cfg = config();
        cfg.num_scales = 0;
        assert_eq!(cfg.validate(), Err(DogError::InvalidScaleCount(0)));

        let mut cfg = config();
        cfg.initial_sigma = 0.0;
        assert_eq!(cfg.validate(), Err(DogError::InvalidSigma(0.0)));
        cfg.initial_sigma = -1.0;
        assert_eq!(cfg.validate(), Err(DogError::InvalidSigma(-1.0)));

        let mut cfg = config();
        cfg.downsampling_factor = 0;
        assert_eq!(cfg.validate(), Err(DogError::InvalidDownsamplingFactor(0)));

        let mut cfg = config();
        cfg.edge_threshold = f32::INFINITY;
        assert!(matches!(
            cfg.validate(),
            Err(DogError::InvalidThreshold { name: "edge_threshold", .. })
        ));
    }

    #[test]
    fn test_octave_dimensions_floor() {
        let cfg = ScaleSpaceConfig {
            num_octaves: 4,
            downsampling_factor: 3,
            ..config()
        };
        assert_eq!(
            cfg.octave_dimensions(100, 50),
            vec![(100, 50), (33, 16), (11, 5), (3, 1)]
        );
    }

    #[test]
    fn test_octave_too_small() {
        let cfg = ScaleSpaceConfig {
            num_octaves: 3,
            downsampling_factor: 2,
            ..config()
        };
        assert!(cfg.validate_for(8, 4).is_ok());
        assert_eq!(
            cfg.validate_for(8, 3),
            Err(DogError::OctaveTooSmall { octave: 2, width: 2, height: 0 })
        );
        assert_eq!(
            cfg.validate_for(0, 3),
            Err(DogError::InvalidImageSize { width: 0, height: 3 })
        );
    }

    #[test]
    fn test_degenerate_scale_warning() {
        let cfg = ScaleSpaceConfig {
            num_scales: 3,
            ..config()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(
            cfg.warnings(),
            vec![DogWarning::DegenerateScaleCount { num_scales: 3 }]
        );
    }
}
