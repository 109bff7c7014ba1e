//! Shared types for Difference-of-Gaussian scale-space detection.

pub mod config;
pub mod error;
pub mod grid;
pub mod pyramid;

pub use config::{EdgeFilter, MIN_USEFUL_SCALES, ScaleSpaceConfig};
pub use error::{DogError, DogResult, DogWarning, ErrorKind};
pub use grid::Grid;
pub use pyramid::{DogPyramid, GaussianPyramid, Octave};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scale-space extremum: `scale` indexes the DoG octave, `row`/`col` are in that octave's resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keypoint {
    pub octave: usize,
    pub scale: usize,
    pub row: usize,
    pub col: usize,
}

impl Keypoint {
    /// Position in input-image pixels, given the factor applied between octaves.
    ///
    /// Returns the centre of the `factor^octave` block the sample was taken from.
    pub fn to_input_coords(&self, downsampling_factor: usize) -> (usize, usize) {
        let factor = downsampling_factor.max(1).pow(self.octave as u32);
        (self.row * factor + factor / 2, self.col * factor + factor / 2)
    }
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}
