use crate::error::{DogError, DogResult};
use crate::grid::Grid;

/// Ordered images sharing one resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Octave {
    images: Vec<Grid>,
}

impl Octave {
    /// Groups images into an octave. All images must share the first image's dimensions.
    pub fn new(images: Vec<Grid>) -> DogResult<Self> {
        if let Some(first) = images.first() {
            let expected = first.dimensions();
            if let Some(bad) = images.iter().find(|g| g.dimensions() != expected) {
                return Err(DogError::DimensionMismatch {
                    expected,
                    actual: bad.dimensions(),
                });
            }
        }
        Ok(Self { images })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[Grid] {
        &self.images
    }

    pub fn get(&self, index: usize) -> Option<&Grid> {
        self.images.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Grid> {
        self.images.iter()
    }

    /// `(width, height)` shared by every image, `None` for an empty octave.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.images.first().map(Grid::dimensions)
    }
}

impl<'a> IntoIterator for &'a Octave {
    type Item = &'a Grid;
    type IntoIter = std::slice::Iter<'a, Grid>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

/// Blurred scale space: `octaves[o].images()[s]` is the seed of octave `o` blurred with `sigmas[s]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianPyramid {
    octaves: Vec<Octave>,
    sigmas: Vec<f32>,
}

impl GaussianPyramid {
    pub fn new(octaves: Vec<Octave>, sigmas: Vec<f32>) -> Self {
        Self { octaves, sigmas }
    }

    pub fn octaves(&self) -> &[Octave] {
        &self.octaves
    }

    pub fn num_octaves(&self) -> usize {
        self.octaves.len()
    }

    /// Blur applied to scale `scale` of every octave; the schedule restarts per octave.
    pub fn sigmas(&self) -> &[f32] {
        &self.sigmas
    }

    pub fn sigma(&self, octave: usize, scale: usize) -> Option<f32> {
        if octave >= self.octaves.len() {
            return None;
        }
        self.sigmas.get(scale).copied()
    }
}

/// Per-octave consecutive differences of a [`GaussianPyramid`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogPyramid {
    octaves: Vec<Octave>,
}

impl DogPyramid {
    pub fn new(octaves: Vec<Octave>) -> Self {
        Self { octaves }
    }

    pub fn octaves(&self) -> &[Octave] {
        &self.octaves
    }

    pub fn num_octaves(&self) -> usize {
        self.octaves.len()
    }

    /// Largest absolute response across every octave and scale.
    pub fn max_abs_response(&self) -> f32 {
        self.octaves
            .iter()
            .flat_map(Octave::iter)
            .fold(0.0f32, |acc, g| acc.max(g.max_abs()))
    }
}
