//! Per-pixel accept/reject rules applied to interior DoG samples.

use dog_core::{EdgeFilter, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Maximum,
    Minimum,
}

/// Classifies `current[row, col]` against the 3x3 blocks at the same location one scale
/// below and one scale above (18 values, including the two samples directly beneath and over it).
///
/// The centre's own-scale neighbours are not compared. Unlike a "greater than the upper max or
/// less than the lower min" check, the centre must beat all 18 values strictly, on one side
/// only. Any tie disqualifies the sample.
/// Returns `None` on the border or when the three grids disagree in size.
pub fn classify_extremum(below: &Grid, current: &Grid, above: &Grid, row: usize, col: usize) -> Option<Extremum> {
    if below.dimensions() != current.dimensions() || above.dimensions() != current.dimensions() {
        return None;
    }
    let centre = current.get(row, col)?;
    let lower = below.neighborhood(row, col)?;
    let upper = above.neighborhood(row, col)?;
    let neighbours = lower.iter().chain(upper.iter());

    let mut greater = true;
    let mut smaller = true;
    for &v in neighbours {
        greater &= centre > v;
        smaller &= centre < v;
        if !greater && !smaller {
            return None;
        }
    }
    match (greater, smaller) {
        (true, false) => Some(Extremum::Maximum),
        (false, true) => Some(Extremum::Minimum),
        _ => None,
    }
}

/// Keeps responses whose magnitude reaches `threshold`.
#[inline]
pub fn passes_contrast(value: f32, threshold: f32) -> bool {
    value.abs() >= threshold
}

/// Central-difference gradient magnitude, with `dx` along rows and `dy` along columns.
pub fn gradient_magnitude(grid: &Grid, row: usize, col: usize) -> f32 {
    let dx = grid.at(row + 1, col) - grid.at(row - 1, col);
    let dy = grid.at(row, col + 1) - grid.at(row, col - 1);
    (dx * dx + dy * dy).sqrt()
}

/// 2x2 spatial Hessian `(dxx, dyy, dxy)` from central second differences.
pub fn hessian(grid: &Grid, row: usize, col: usize) -> (f32, f32, f32) {
    let c = grid.at(row, col);
    let dxx = grid.at(row + 1, col) + grid.at(row - 1, col) - 2.0 * c;
    let dyy = grid.at(row, col + 1) + grid.at(row, col - 1) - 2.0 * c;
    let dxy = (grid.at(row + 1, col + 1) - grid.at(row + 1, col - 1) - grid.at(row - 1, col + 1)
        + grid.at(row - 1, col - 1))
        * 0.25;
    (dxx, dyy, dxy)
}

/// `true` when the sample survives the edge filter.
pub fn passes_edge(grid: &Grid, row: usize, col: usize, filter: EdgeFilter, threshold: f32) -> bool {
    match filter {
        // Weak local gradient counts as edge-adjacent here, so only strong gradients survive.
        EdgeFilter::GradientMagnitude => gradient_magnitude(grid, row, col) > threshold,
        EdgeFilter::HessianRatio => {
            let (dxx, dyy, dxy) = hessian(grid, row, col);
            let trace = dxx + dyy;
            let det = dxx * dyy - dxy * dxy;
            if det <= 0.0 {
                return false;
            }
            let r = threshold;
            trace * trace * r < (r + 1.0) * (r + 1.0) * det
        }
    }
}
