use crate::error::{DogError, DogResult};

/// Row-major single-channel f32 image.
///
/// Indexing is `(row, col)` with `row < height` and `col < width`. A grid is never empty:
/// every constructor rejects zero dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Grid {
    /// Wraps row-major data, checking that it fills `width * height` exactly.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> DogResult<Self> {
        if width == 0 || height == 0 {
            if data.is_empty() {
                return Err(DogError::EmptyImage);
            }
            return Err(DogError::InvalidImageSize { width, height });
        }
        let expected_len = width * height;
        if data.len() != expected_len {
            return Err(DogError::InvalidImageData {
                expected_len,
                actual_len: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Builds a grid from nested rows; every row must have the same length.
    pub fn from_rows(rows: &[Vec<f32>]) -> DogResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(DogError::EmptyImage);
        }
        let mut data = Vec::with_capacity(width * height);
        for row in rows {
            if row.len() != width {
                return Err(DogError::InvalidImageData {
                    expected_len: width * height,
                    actual_len: rows.iter().map(Vec::len).sum(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { width, height, data })
    }

    /// Converts an 8-bit grayscale buffer, keeping the 0..=255 intensity range.
    pub fn from_luma8(width: usize, height: usize, pixels: &[u8]) -> DogResult<Self> {
        Self::new(width, height, pixels.iter().map(|&p| p as f32).collect())
    }

    pub fn filled(width: usize, height: usize, value: f32) -> DogResult<Self> {
        Self::new(width, height, vec![value; width * height])
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.height && col < self.width {
            Some(self.data[row * self.width + col])
        } else {
            None
        }
    }

    /// Value at `(row, col)`. Panics when out of range; interior scans stay in range by construction.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        assert!(row < self.height && col < self.width, "({row}, {col}) outside {}x{}", self.width, self.height);
        self.data[row * self.width + col]
    }

    /// The 3x3 block centred on `(row, col)` in row-major order, or `None` on the border.
    pub fn neighborhood(&self, row: usize, col: usize) -> Option<[f32; 9]> {
        if row == 0 || col == 0 || row + 1 >= self.height || col + 1 >= self.width {
            return None;
        }
        let mut block = [0.0f32; 9];
        for (i, r) in (row - 1..=row + 1).enumerate() {
            let start = r * self.width + col - 1;
            block[i * 3..i * 3 + 3].copy_from_slice(&self.data[start..start + 3]);
        }
        Some(block)
    }

    /// Rows that have a full 3x3 neighbourhood.
    pub fn interior_rows(&self) -> std::ops::Range<usize> {
        1..self.height.saturating_sub(1)
    }

    /// Columns that have a full 3x3 neighbourhood.
    pub fn interior_cols(&self) -> std::ops::Range<usize> {
        1..self.width.saturating_sub(1)
    }

    /// Interior `(row, col)` pairs in row-major scan order.
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.interior_rows()
            .flat_map(move |row| self.interior_cols().map(move |col| (row, col)))
    }

    /// Element-wise `self - other`; no clamping.
    pub fn difference(&self, other: &Grid) -> DogResult<Grid> {
        if self.dimensions() != other.dimensions() {
            return Err(DogError::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a - b)
            .collect();
        Ok(Grid {
            width: self.width,
            height: self.height,
            data,
        })
    }

    /// First non-finite sample, if any.
    pub fn ensure_finite(&self) -> DogResult<()> {
        match self.data.iter().position(|v| !v.is_finite()) {
            Some(idx) => Err(DogError::NonFiniteValue {
                row: idx / self.width,
                col: idx % self.width,
            }),
            None => Ok(()),
        }
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    pub fn max_abs(&self) -> f32 {
        self.data.iter().fold(0.0f32, |acc, v| acc.max(v.abs()))
    }
}
