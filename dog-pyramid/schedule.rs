/// Blur applied at each scale of an octave: `initial_sigma * 2^scale`.
///
/// The schedule is the same for every octave; downsampling the seed between octaves
/// is what carries the coarser resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmaSchedule {
    initial_sigma: f32,
    num_scales: usize,
}

impl SigmaSchedule {
    pub fn new(initial_sigma: f32, num_scales: usize) -> Self {
        Self {
            initial_sigma,
            num_scales,
        }
    }

    pub fn initial_sigma(&self) -> f32 {
        self.initial_sigma
    }

    pub fn num_scales(&self) -> usize {
        self.num_scales
    }

    /// Sigma for `scale` within `octave`. The octave index does not change the value.
    #[inline]
    pub fn sigma(&self, _octave: usize, scale: usize) -> f32 {
        self.initial_sigma * 2f32.powi(scale as i32)
    }

    pub fn sigmas(&self) -> Vec<f32> {
        (0..self.num_scales).map(|s| self.sigma(0, s)).collect()
    }
}
