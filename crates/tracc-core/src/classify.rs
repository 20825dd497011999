//! Value → class → color.
//!
//! Classes are left-closed and right-open except the last one: a value equal
//! to a break belongs to the class above it. `None` is the no-data sentinel,
//! returned for missing values and for variables without statistics.

use serde::Serialize;

use crate::palette::{Palette, BIVARIATE_COLORS, NO_DATA_COLOR};
use crate::stats::Stats;

/// Number of breaks `≤ value`.
#[inline]
pub fn threshold_class(value: f64, breaks: &[f64]) -> usize {
    breaks.iter().filter(|&&b| b <= value).count()
}

/// Quintile class in `[0, 4]`.
pub fn quintile_class(value: Option<f64>, stats: Option<&Stats>) -> Option<usize> {
    Some(threshold_class(value?, &stats?.breaks5))
}

/// Tertile class in `[0, 2]`.
pub fn tertile_class(value: Option<f64>, stats: Option<&Stats>) -> Option<usize> {
    Some(threshold_class(value?, &stats?.breaks3))
}

pub fn univariate_color(class: Option<usize>, palette: Palette) -> &'static str {
    match class {
        Some(c) => palette.colors()[c.min(4)],
        None => NO_DATA_COLOR,
    }
}

/// Cell of the 3×3 bivariate matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BivariateCell {
    /// Frequency (y) tertile.
    pub row: usize,
    /// Intensity (x) tertile.
    pub col: usize,
}

impl BivariateCell {
    pub fn color(self) -> &'static str {
        BIVARIATE_COLORS[self.row][self.col]
    }
}

/// Joint tertile class; no-data if either axis is missing.
pub fn bivariate_class(
    x: Option<f64>,
    y: Option<f64>,
    x_stats: Option<&Stats>,
    y_stats: Option<&Stats>,
) -> Option<BivariateCell> {
    let col = tertile_class(x, x_stats)?;
    let row = tertile_class(y, y_stats)?;
    Some(BivariateCell { row, col })
}

pub fn bivariate_color(cell: Option<BivariateCell>) -> &'static str {
    cell.map_or(NO_DATA_COLOR, BivariateCell::color)
}
