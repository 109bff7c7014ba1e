/// Broad class of a [`DogError`]: bad pixels in, or bad parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Configuration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DogError {
    EmptyImage,
    InvalidImageSize { width: usize, height: usize },
    InvalidImageData { expected_len: usize, actual_len: usize },
    DimensionMismatch { expected: (usize, usize), actual: (usize, usize) },
    NonFiniteValue { row: usize, col: usize },
    InvalidOctaveCount(usize),
    InvalidScaleCount(usize),
    InvalidSigma(f32),
    InvalidDownsamplingFactor(usize),
    InvalidThreshold { name: &'static str, value: f32 },
    OctaveTooSmall { octave: usize, width: usize, height: usize },
    EmptyOctave { octave: usize },
}

impl DogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DogError::EmptyImage
            | DogError::InvalidImageSize { .. }
            | DogError::InvalidImageData { .. }
            | DogError::DimensionMismatch { .. }
            | DogError::NonFiniteValue { .. } => ErrorKind::InvalidInput,
            DogError::InvalidOctaveCount(_)
            | DogError::InvalidScaleCount(_)
            | DogError::InvalidSigma(_)
            | DogError::InvalidDownsamplingFactor(_)
            | DogError::InvalidThreshold { .. }
            | DogError::OctaveTooSmall { .. }
            | DogError::EmptyOctave { .. } => ErrorKind::Configuration,
        }
    }
}

impl std::fmt::Display for DogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DogError::EmptyImage => write!(f, "Input image is empty"),
            DogError::InvalidImageSize { width, height } => {
                write!(f, "Invalid image dimensions: {}x{} (must be > 0)", width, height)
            }
            DogError::InvalidImageData { expected_len, actual_len } => {
                write!(f, "Image data length mismatch: expected {}, got {}", expected_len, actual_len)
            }
            DogError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Image dimension mismatch: expected {}x{}, got {}x{}",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
            DogError::NonFiniteValue { row, col } => {
                write!(f, "Non-finite intensity at row {}, col {}", row, col)
            }
            DogError::InvalidOctaveCount(n) => {
                write!(f, "Invalid octave count: {} (must be >= 1)", n)
            }
            DogError::InvalidScaleCount(n) => {
                write!(f, "Invalid scale count: {} (must be >= 1)", n)
            }
            DogError::InvalidSigma(s) => {
                write!(f, "Invalid initial sigma: {} (must be finite and > 0)", s)
            }
            DogError::InvalidDownsamplingFactor(d) => {
                write!(f, "Invalid downsampling factor: {} (must be >= 1)", d)
            }
            DogError::InvalidThreshold { name, value } => {
                write!(f, "Invalid {}: {} (must be finite)", name, value)
            }
            DogError::OctaveTooSmall { octave, width, height } => {
                write!(f, "Octave {} would be {}x{}; reduce octaves or downsampling factor", octave, width, height)
            }
            DogError::EmptyOctave { octave } => {
                write!(f, "Octave {} contains no images", octave)
            }
        }
    }
}

impl std::error::Error for DogError {}

pub type DogResult<T> = Result<T, DogError>;

/// Non-fatal conditions surfaced next to a successful result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DogWarning {
    /// Fewer than 4 scales per octave leaves no interior DoG scale, so nothing can be detected.
    DegenerateScaleCount { num_scales: usize },
}

impl std::fmt::Display for DogWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DogWarning::DegenerateScaleCount { num_scales } => {
                write!(f, "{} scales per octave yields no interior DoG scale (need >= 4)", num_scales)
            }
        }
    }
}
