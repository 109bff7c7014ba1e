use std::path::Path;

use dog_core::{DogError, DogResult, Grid, Keypoint, init_thread_pool};
use dog_detect::{ConfiguredDetector, DetectionReport, DetectorConfig};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_circle_mut;
use log::{debug, info};

pub use dog_core::{self, Keypoint as DogKeypoint};
pub use dog_detect::DetectorConfig as Config;

/// Radius of the marker drawn around each keypoint.
pub const KEYPOINT_RADIUS: i32 = 3;

#[derive(Debug)]
pub enum ScaleSpaceError {
    Dog(DogError),
    ThreadPool(rayon::ThreadPoolBuildError),
    Image(image::ImageError),
    Io(std::io::Error),
    Config(String),
}

impl std::fmt::Display for ScaleSpaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleSpaceError::Dog(e) => write!(f, "Scale-space error: {}", e),
            ScaleSpaceError::ThreadPool(e) => write!(f, "Thread pool error: {}", e),
            ScaleSpaceError::Image(e) => write!(f, "Image error: {}", e),
            ScaleSpaceError::Io(e) => write!(f, "I/O error: {}", e),
            ScaleSpaceError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for ScaleSpaceError {}

impl From<DogError> for ScaleSpaceError {
    fn from(err: DogError) -> Self {
        ScaleSpaceError::Dog(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for ScaleSpaceError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        ScaleSpaceError::ThreadPool(err)
    }
}

impl From<image::ImageError> for ScaleSpaceError {
    fn from(err: image::ImageError) -> Self {
        ScaleSpaceError::Image(err)
    }
}

impl From<std::io::Error> for ScaleSpaceError {
    fn from(err: std::io::Error) -> Self {
        ScaleSpaceError::Io(err)
    }
}

pub type ScaleSpaceResult<T> = Result<T, ScaleSpaceError>;

/// High-level detector: builds both pyramids and scans them for keypoints
pub struct ScaleSpace {
    detector: ConfiguredDetector,
    config: DetectorConfig,
}

impl ScaleSpace {
    /// Create a detector with the given configuration.
    ///
    /// Sizes the global Rayon pool from `n_threads` the first time it is called; later
    /// calls reuse whatever pool is already installed.
    pub fn new(config: DetectorConfig) -> ScaleSpaceResult<Self> {
        config.validate()?;
        if let Err(e) = init_thread_pool(config.core.n_threads) {
            debug!("Keeping existing thread pool: {}", e);
        }
        let detector = config.clone().to_builder().build()?;
        Ok(Self { detector, config })
    }

    /// Detect keypoints, ordered by octave, scale and row-major position
    pub fn detect(&self, image: &Grid) -> ScaleSpaceResult<Vec<Keypoint>> {
        Ok(self.detector.detect(image)?)
    }

    /// Detect keypoints and keep both pyramids
    pub fn detect_with_report(&self, image: &Grid) -> ScaleSpaceResult<DetectionReport> {
        Ok(self.detector.run(image)?)
    }

    /// Detect keypoints in an 8-bit grayscale image
    pub fn detect_luma8(&self, image: &GrayImage) -> ScaleSpaceResult<Vec<Keypoint>> {
        self.detect(&grid_from_luma8(image)?)
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn detector(&self) -> &ConfiguredDetector {
        &self.detector
    }
}

/// Intensities in `[0, 255]` as f32
pub fn grid_from_luma8(image: &GrayImage) -> DogResult<Grid> {
    let (w, h) = image.dimensions();
    Grid::from_luma8(w as usize, h as usize, image.as_raw())
}

/// Min-max normalised to `[0, 255]`; a constant grid maps to black.
pub fn grid_to_luma8(grid: &Grid) -> GrayImage {
    let (w, h) = grid.dimensions();
    let (lo, hi) = grid.min_max();
    let range = hi - lo;
    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        let v = grid.at(y as usize, x as usize);
        let scaled = if range > 0.0 { (v - lo) / range * 255.0 } else { 0.0 };
        Luma([scaled.round().clamp(0.0, 255.0) as u8])
    })
}

/// Draw a red hollow circle per keypoint, mapped back to input resolution.
pub fn draw_keypoints(image: &GrayImage, keypoints: &[Keypoint], downsampling_factor: usize) -> RgbaImage {
    let mut output: RgbaImage = image::DynamicImage::ImageLuma8(image.clone()).into_rgba8();
    for kp in keypoints {
        let (row, col) = kp.to_input_coords(downsampling_factor);
        draw_hollow_circle_mut(&mut output, (col as i32, row as i32), KEYPOINT_RADIUS, Rgba([255, 0, 0, 255]));
    }
    output
}

/// Write every Gaussian and DoG level as a normalised PNG.
///
/// # Returns
/// Number of files written.
pub fn dump_pyramid<P: AsRef<Path>>(report: &DetectionReport, dir: P) -> ScaleSpaceResult<usize> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let mut written = 0;
    for (prefix, octaves) in [("gauss", report.gaussian.octaves()), ("dog", report.dog.octaves())] {
        for (o, octave) in octaves.iter().enumerate() {
            for (s, level) in octave.iter().enumerate() {
                let path = dir.join(format!("{}_o{}_s{}.png", prefix, o, s));
                grid_to_luma8(level).save(&path)?;
                written += 1;
            }
        }
    }
    info!("Wrote {} pyramid levels to {}", written, dir.display());
    Ok(written)
}

/// Load a detector configuration from a `.json` or `.toml` file
#[cfg(feature = "serde")]
pub fn load_config<P: AsRef<Path>>(path: P) -> ScaleSpaceResult<DetectorConfig> {
    let path = path.as_ref();
    let loaded = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => DetectorConfig::load_json(path),
        Some("toml") => DetectorConfig::load_toml(path),
        _ => return Err(ScaleSpaceError::Config(format!("unsupported config file {}", path.display()))),
    };
    loaded.map_err(|e| ScaleSpaceError::Config(e.to_string()))
}
