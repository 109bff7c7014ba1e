use dog_core::{DogError, DogPyramid, DogResult, GaussianPyramid, Octave};
use log::debug;
use rayon::prelude::*;

/// Difference-of-Gaussian derivation: `dog[i] = gaussian[i + 1] - gaussian[i]` per octave.
pub struct DogGenerator;

impl DogGenerator {
    /// Each output octave holds one image fewer than its source. Values are signed and unclamped.
    pub fn derive(pyramid: &GaussianPyramid) -> DogResult<DogPyramid> {
        let octaves = pyramid
            .octaves()
            .par_iter()
            .enumerate()
            .map(|(index, octave)| Self::derive_octave(index, octave))
            .collect::<DogResult<Vec<_>>>()?;
        debug!(
            "derived DoG pyramid: {} octaves, {:?} scales",
            octaves.len(),
            octaves.iter().map(Octave::len).collect::<Vec<_>>()
        );
        Ok(DogPyramid::new(octaves))
    }

    fn derive_octave(index: usize, octave: &Octave) -> DogResult<Octave> {
        if octave.is_empty() {
            return Err(DogError::EmptyOctave { octave: index });
        }
        let differences = octave
            .images()
            .windows(2)
            .map(|pair| pair[1].difference(&pair[0]))
            .collect::<DogResult<Vec<_>>>()?;
        Octave::new(differences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PyramidBuilder;
    use dog_core::Grid;

    fn textured(width: usize, height: usize) -> Grid {
        let data = (0..width * height)
            .map(|i| (((i * 37) % 101) as f32) * 2.5)
            .collect();
        Grid::new(width, height, data).unwrap()
    }

    #[test]
    fn test_consecutive_differences() {
        let pyr = PyramidBuilder::new()
            .build(&textured(24, 18), 2, 5, 1.0, 2)
            .unwrap();
        let dog = DogGenerator::derive(&pyr).unwrap();
        assert_eq!(dog.num_octaves(), 2);
        for (gauss, diff) in pyr.octaves().iter().zip(dog.octaves()) {
            assert_eq!(diff.len(), gauss.len() - 1);
            assert_eq!(diff.dimensions(), gauss.dimensions());
            for i in 0..diff.len() {
                let g0 = gauss.images()[i].data();
                let g1 = gauss.images()[i + 1].data();
                let d = diff.images()[i].data();
                for k in 0..d.len() {
                    assert_eq!(d[k], g1[k] - g0[k]);
                }
            }
        }
    }

    #[test]
    fn test_negative_values_survive() {
        let a = Grid::filled(3, 3, 10.0).unwrap();
        let b = Grid::filled(3, 3, 4.0).unwrap();
        let pyr = GaussianPyramid::new(vec![Octave::new(vec![a, b]).unwrap()], vec![1.0, 2.0]);
        let dog = DogGenerator::derive(&pyr).unwrap();
        assert!(dog.octaves()[0].images()[0].data().iter().all(|&v| v == -6.0));
    }

    #[test]
    fn test_single_scale_gives_empty_octave() {
        let pyr = GaussianPyramid::new(
            vec![Octave::new(vec![Grid::filled(3, 3, 1.0).unwrap()]).unwrap()],
            vec![1.0],
        );
        let dog = DogGenerator::derive(&pyr).unwrap();
        assert!(dog.octaves()[0].is_empty());
    }

    #[test]
    fn test_empty_octave_is_configuration_error() {
        let full = Octave::new(vec![Grid::filled(3, 3, 1.0).unwrap(); 2]).unwrap();
        let pyr = GaussianPyramid::new(vec![full, Octave::default()], vec![1.0, 2.0]);
        let err = DogGenerator::derive(&pyr).unwrap_err();
        assert_eq!(err, DogError::EmptyOctave { octave: 1 });
        assert_eq!(err.kind(), dog_core::ErrorKind::Configuration);
    }
}
