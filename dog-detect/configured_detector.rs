use dog_core::{DogResult, Grid, Keypoint, ScaleSpaceConfig};
use dog_pyramid::{DogGenerator, ImageprocProcessing, Processing, PyramidBuilder};
use log::{debug, warn};

use crate::config::DetectorConfig;
use crate::detector::KeypointDetector;
use crate::types::DetectionReport;

/// Full image-to-keypoints pipeline with a fixed configuration.
///
/// Holds no per-image state; every call rebuilds the pyramids from scratch.
#[derive(Debug, Clone)]
pub struct ConfiguredDetector<P: Processing = ImageprocProcessing> {
    pub(crate) pyramid: PyramidBuilder<P>,
    pub(crate) detector: KeypointDetector,
    pub(crate) config: ScaleSpaceConfig,
}

impl<P: Processing> ConfiguredDetector<P> {
    /// Detect keypoints in the given intensity grid.
    ///
    /// # Returns
    /// Keypoints ordered by octave, scale and row-major position; empty when
    /// the configuration has fewer than 4 scales per octave.
    pub fn detect(&self, image: &Grid) -> DogResult<Vec<Keypoint>> {
        Ok(self.run(image)?.keypoints())
    }

    /// Run every stage and keep the intermediate pyramids.
    pub fn run(&self, image: &Grid) -> DogResult<DetectionReport> {
        let (width, height) = image.dimensions();
        debug!(
            "ConfiguredDetector::run start w={} h={} octaves={} scales={}",
            width, height, self.config.num_octaves, self.config.num_scales
        );

        let warnings = self.config.warnings();
        for w in &warnings {
            warn!("{}", w);
        }

        let gaussian = self.pyramid.build_with_config(image, &self.config)?;
        let dog = DogGenerator::derive(&gaussian)?;
        let (keypoints, stats) = self.detector.detect_with_response(&dog);

        Ok(DetectionReport {
            gaussian,
            dog,
            keypoints,
            stats,
            warnings,
        })
    }

    pub fn config(&self) -> &ScaleSpaceConfig {
        &self.config
    }

    pub fn detector(&self) -> &KeypointDetector {
        &self.detector
    }

    /// Get a summary of the detector's configuration.
    pub fn config_summary(&self) -> String {
        DetectorConfig::from(self.config.clone()).summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DetectorBuilder;
    use dog_core::{DogError, DogWarning, EdgeFilter, ErrorKind};
    use proptest::prelude::*;

    fn blobs(width: usize, height: usize) -> Grid {
        let mut data = vec![20.0f32; width * height];
        let centres = [(width / 4, height / 4), (3 * width / 4, height / 3), (width / 2, 3 * height / 4)];
        for (i, &(cx, cy)) in centres.iter().enumerate() {
            let radius = 2 + i as i64;
            for y in 0..height as i64 {
                for x in 0..width as i64 {
                    let (dx, dy) = (x - cx as i64, y - cy as i64);
                    if dx * dx + dy * dy <= radius * radius {
                        data[y as usize * width + x as usize] = 230.0;
                    }
                }
            }
        }
        Grid::new(width, height, data).unwrap()
    }

    fn noise(width: usize, height: usize, seed: u32) -> Grid {
        let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
        let data = (0..width * height)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state % 256) as f32
            })
            .collect();
        Grid::new(width, height, data).unwrap()
    }

    fn builder() -> DetectorBuilder {
        DetectorBuilder::new().threads(1)
    }

    #[test]
    fn test_uniform_image_is_empty() {
        let _ = env_logger::builder().is_test(true).try_init();
        let img = Grid::filled(32, 24, 117.0).unwrap();
        for filter in [EdgeFilter::GradientMagnitude, EdgeFilter::HessianRatio] {
            let detector = builder()
                .octaves(2)
                .scales(5)
                .initial_sigma(1.0)
                .contrast_threshold(0.01)
                .edge_filter(filter, 1.0)
                .build()
                .unwrap();
            assert!(detector.detect(&img).unwrap().is_empty());
        }
    }

    #[test]
    fn test_three_scales_is_empty_with_warning() {
        let detector = builder().scales(3).contrast_threshold(0.0).build().unwrap();
        let report = detector.run(&noise(40, 40, 7)).unwrap();
        assert!(report.keypoints.is_empty());
        assert_eq!(report.warnings, vec![DogWarning::DegenerateScaleCount { num_scales: 3 }]);
        assert!(report.dog.octaves().iter().all(|o| o.len() == 2));
    }

    #[test]
    fn test_report_shapes() {
        let detector = builder().octaves(3).scales(5).build().unwrap();
        let report = detector.run(&blobs(48, 36)).unwrap();
        assert_eq!(report.gaussian.num_octaves(), 3);
        assert_eq!(report.dog.num_octaves(), 3);
        for (g, d) in report.gaussian.octaves().iter().zip(report.dog.octaves()) {
            assert_eq!(g.len(), 5);
            assert_eq!(d.len(), 4);
        }
        assert!(report.warnings.is_empty());
        assert_eq!(report.stats.accepted, report.keypoints.len());
    }

    #[test]
    fn test_contrast_above_max_response_is_empty() {
        let img = noise(40, 30, 3);
        let probe = builder().contrast_threshold(0.0).build().unwrap().run(&img).unwrap();
        let max = probe.dog.max_abs_response();
        let detector = builder().contrast_threshold(max + 1.0).build().unwrap();
        assert!(detector.detect(&img).unwrap().is_empty());
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let img = noise(64, 48, 11);
        let detector = builder()
            .contrast_threshold(1.0)
            .edge_filter(EdgeFilter::GradientMagnitude, 2.0)
            .build()
            .unwrap();
        let a = detector.run(&img).unwrap();
        let b = detector.run(&img).unwrap();
        assert_eq!(a.gaussian, b.gaussian);
        assert_eq!(a.dog, b.dog);
        assert_eq!(a.keypoints, b.keypoints);
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        let img = noise(48, 40, 5);
        let detector = builder().contrast_threshold(2.0).build().unwrap();
        let run_on = |threads: usize| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap()
                .install(|| detector.run(&img).unwrap())
        };
        let single = run_on(1);
        let many = run_on(4);
        assert_eq!(single.dog, many.dog);
        assert_eq!(single.keypoints, many.keypoints);
        assert_eq!(single.stats, many.stats);
    }

    #[test]
    fn test_input_errors_fail_before_work() {
        let detector = builder().octaves(4).build().unwrap();
        let err = detector.detect(&Grid::filled(6, 6, 1.0).unwrap()).unwrap_err();
        assert!(matches!(err, DogError::OctaveTooSmall { octave: 3, .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let mut data = vec![0.0; 16];
        data[3] = f32::NAN;
        let single = builder().octaves(1).build().unwrap();
        let err = single.detect(&Grid::new(4, 4, data).unwrap()).unwrap_err();
        assert_eq!(err, DogError::NonFiniteValue { row: 0, col: 3 });
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_keypoints_stay_interior(
            width in 8usize..40,
            height in 8usize..40,
            seed in any::<u32>(),
            scales in 3usize..6,
        ) {
            let detector = DetectorBuilder::new()
                .threads(1)
                .octaves(2)
                .scales(scales)
                .initial_sigma(0.8)
                .contrast_threshold(0.5)
                .edge_filter(EdgeFilter::GradientMagnitude, 1.0)
                .build()
                .unwrap();
            let report = detector.run(&noise(width, height, seed)).unwrap();
            for kp in report.keypoints() {
                let octave = &report.dog.octaves()[kp.octave];
                let (w, h) = octave.dimensions().unwrap();
                prop_assert!(kp.scale >= 1 && kp.scale + 2 <= octave.len());
                prop_assert!(kp.row >= 1 && kp.row + 2 <= h);
                prop_assert!(kp.col >= 1 && kp.col + 2 <= w);
            }
            if scales < 4 {
                prop_assert!(report.keypoints.is_empty());
            }
        }
    }
}
