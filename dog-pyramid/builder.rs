use dog_core::{DogResult, EdgeFilter, GaussianPyramid, Grid, Octave, ScaleSpaceConfig};
use log::debug;
use rayon::prelude::*;

use crate::processing::{ImageprocProcessing, Processing};
use crate::schedule::SigmaSchedule;

/// Builds a Gaussian scale-space pyramid from one intensity grid.
///
/// Every scale of an octave blurs that octave's seed directly (blurs are not cascaded).
/// The seed of octave `k + 1` is the unblurred seed of octave `k` downsampled with
/// nearest-neighbour interpolation to `(w / factor, h / factor)`.
#[derive(Debug, Clone, Default)]
pub struct PyramidBuilder<P: Processing = ImageprocProcessing> {
    processing: P,
}

impl PyramidBuilder<ImageprocProcessing> {
    pub fn new() -> Self {
        Self {
            processing: ImageprocProcessing,
        }
    }
}

impl<P: Processing> PyramidBuilder<P> {
    pub fn with_processing(processing: P) -> Self {
        Self { processing }
    }

    pub fn processing(&self) -> &P {
        &self.processing
    }

    pub fn build(
        &self,
        image: &Grid,
        num_octaves: usize,
        num_scales: usize,
        initial_sigma: f32,
        downsampling_factor: usize,
    ) -> DogResult<GaussianPyramid> {
        // Only the pyramid fields are read.
        let cfg = ScaleSpaceConfig {
            num_octaves,
            num_scales,
            initial_sigma,
            downsampling_factor,
            contrast_threshold: 0.0,
            edge_threshold: 0.0,
            edge_filter: EdgeFilter::default(),
            n_threads: 1,
        };
        self.build_with_config(image, &cfg)
    }

    /// Uses the pyramid fields of `cfg`; detection thresholds are ignored here.
    pub fn build_with_config(&self, image: &Grid, cfg: &ScaleSpaceConfig) -> DogResult<GaussianPyramid> {
        let (width, height) = image.dimensions();
        cfg.validate_for(width, height)?;
        image.ensure_finite()?;

        let schedule = SigmaSchedule::new(cfg.initial_sigma, cfg.num_scales);
        let dims = cfg.octave_dimensions(width, height);

        let mut seeds = Vec::with_capacity(dims.len());
        let mut current = image.clone();
        for (octave, &(w, h)) in dims.iter().enumerate() {
            if octave > 0 {
                debug!("downscaling seed to {}x{} for octave {}", w, h, octave);
                current = self.processing.resize_nearest(&current, w, h)?;
            }
            debug!("octave {}: {}x{}, sigmas {:?}", octave, w, h, schedule.sigmas());
            seeds.push(current.clone());
        }

        let jobs: Vec<(usize, usize)> = (0..seeds.len())
            .flat_map(|o| (0..cfg.num_scales).map(move |s| (o, s)))
            .collect();
        let blurred: Vec<Grid> = jobs
            .par_iter()
            .map(|&(o, s)| self.processing.gaussian_blur(&seeds[o], schedule.sigma(o, s)))
            .collect::<DogResult<Vec<_>>>()?;

        let mut scales = blurred.into_iter();
        let octaves = (0..seeds.len())
            .map(|_| Octave::new(scales.by_ref().take(cfg.num_scales).collect()))
            .collect::<DogResult<Vec<_>>>()?;

        Ok(GaussianPyramid::new(octaves, schedule.sigmas()))
    }
}
