use dog_core::{DogError, DogResult, Grid};
use image::imageops::{FilterType, resize};
use image::{ImageBuffer, Luma};
use imageproc::filter::gaussian_blur_f32;

pub type LumaFImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Blur and resize primitives used to build the scale space.
///
/// Swapping the implementation is useful for testing or to match another library's
/// numerics exactly; the pyramid layout does not depend on it.
pub trait Processing: Sync {
    fn gaussian_blur(&self, image: &Grid, sigma: f32) -> DogResult<Grid>;
    fn resize_nearest(&self, image: &Grid, width: usize, height: usize) -> DogResult<Grid>;
}

/// `imageproc` Gaussian blur and `image` nearest-neighbour resize.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocProcessing;

impl Processing for ImageprocProcessing {
    fn gaussian_blur(&self, image: &Grid, sigma: f32) -> DogResult<Grid> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(DogError::InvalidSigma(sigma));
        }
        let buffer = to_luma_f32(image)?;
        from_luma_f32(gaussian_blur_f32(&buffer, sigma))
    }

    fn resize_nearest(&self, image: &Grid, width: usize, height: usize) -> DogResult<Grid> {
        if width == 0 || height == 0 {
            return Err(DogError::InvalidImageSize { width, height });
        }
        let buffer = to_luma_f32(image)?;
        from_luma_f32(resize(&buffer, width as u32, height as u32, FilterType::Nearest))
    }
}

pub fn to_luma_f32(grid: &Grid) -> DogResult<LumaFImage> {
    let (width, height) = grid.dimensions();
    ImageBuffer::from_raw(width as u32, height as u32, grid.data().to_vec()).ok_or(
        DogError::InvalidImageData {
            expected_len: width * height,
            actual_len: grid.data().len(),
        },
    )
}

pub fn from_luma_f32(buffer: LumaFImage) -> DogResult<Grid> {
    let (width, height) = buffer.dimensions();
    Grid::new(width as usize, height as usize, buffer.into_raw())
}
