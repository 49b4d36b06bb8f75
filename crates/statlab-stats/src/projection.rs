//! Variance of 2D point clouds along a rotating axis.
//!
//! In two dimensions the principal components can be found by brute force: the
//! first principal component (PC1) is the axis direction that maximizes the
//! variance of the projected points, and the second (PC2) is perpendicular to it.
//!
//! Angles are in degrees. Axes are undirected, so an axis at `θ` and one at
//! `θ + 180°` are the same line and have the same variance. Canonical axis angles
//! live in `[0, 180)`.
//!
//! Two identities hold for any point set and any angle, and are what the
//! Variance Explorer game teaches:
//!
//! - `variance_along_axis(θ) == variance_along_axis(θ + 180)`
//! - `variance_along_axis(θ) + variance_along_axis(θ + 90) == total_variance`

use serde::{Deserialize, Serialize};

use crate::descriptive;

/// Resolution of [`optimal_angle`]'s grid search, in degrees.
pub const ANGLE_SEARCH_STEP: f64 = 0.5;

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotates the point counter-clockwise around the origin.
    #[must_use]
    pub fn rotated(self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Scalar projection onto the unit axis at `angle_deg`.
    #[must_use]
    pub fn project(self, angle_deg: f64) -> f64 {
        let (dy, dx) = angle_deg.to_radians().sin_cos();
        self.x * dx + self.y * dy
    }
}

/// Returns the population variance of the points projected onto the axis at `angle_deg`.
///
/// Returns `0.0` for an empty point set.
///
/// # Examples
///
/// ```
/// use statlab_stats::projection::{self, Point2};
///
/// let points = [Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0)];
/// assert_eq!(projection::variance_along_axis(&points, 0.0), 1.0);
/// assert!(projection::variance_along_axis(&points, 90.0) < 1e-12);
/// ```
#[must_use]
pub fn variance_along_axis(points: &[Point2], angle_deg: f64) -> f64 {
    let projections = points
        .iter()
        .map(|p| p.project(angle_deg))
        .collect::<Vec<_>>();
    descriptive::population_variance(&projections).unwrap_or(0.0)
}

/// Returns the total variance of the point set (sum of both coordinate variances).
///
/// Returns `0.0` for an empty point set.
#[must_use]
pub fn total_variance(points: &[Point2]) -> f64 {
    let xs = points.iter().map(|p| p.x).collect::<Vec<_>>();
    let ys = points.iter().map(|p| p.y).collect::<Vec<_>>();
    let var_x = descriptive::population_variance(&xs).unwrap_or(0.0);
    let var_y = descriptive::population_variance(&ys).unwrap_or(0.0);
    var_x + var_y
}

/// Returns the share of total variance captured by the axis at `angle_deg`, in percent.
///
/// Returns `0.0` when the point set has no variance at all.
#[must_use]
pub fn explained_percent(points: &[Point2], angle_deg: f64) -> f64 {
    let total = total_variance(points);
    if total <= 0.0 {
        return 0.0;
    }
    variance_along_axis(points, angle_deg) / total * 100.0
}

/// Finds the axis angle in `[0, 180)` with maximum projected variance.
///
/// Performs a linear grid search with [`ANGLE_SEARCH_STEP`] resolution. Only a
/// strictly larger variance replaces the current best, so ties resolve to the
/// smallest angle and a point set without variance yields `0.0`.
#[must_use]
pub fn optimal_angle(points: &[Point2]) -> f64 {
    let mut best_variance = 0.0;
    let mut best_angle = 0.0;
    for angle in search_angles() {
        let variance = variance_along_axis(points, angle);
        if variance > best_variance {
            best_variance = variance;
            best_angle = angle;
        }
    }
    best_angle
}

fn search_angles() -> impl Iterator<Item = f64> {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = (180.0 / ANGLE_SEARCH_STEP) as u32;
    (0..steps).map(|i| f64::from(i) * ANGLE_SEARCH_STEP)
}

/// Folds any angle into the canonical axis range `[0, 180)`.
///
/// ```
/// use statlab_stats::projection::normalize_axis_angle;
///
/// assert_eq!(normalize_axis_angle(-30.0), 150.0);
/// assert_eq!(normalize_axis_angle(180.0), 0.0);
/// assert_eq!(normalize_axis_angle(405.0), 45.0);
/// ```
#[must_use]
pub fn normalize_axis_angle(angle_deg: f64) -> f64 {
    let folded = angle_deg.rem_euclid(180.0);
    // rem_euclid may round up to exactly 180.0 for tiny negative inputs
    if folded >= 180.0 { 0.0 } else { folded }
}

/// Returns the axis perpendicular to `angle_deg`, in `[0, 180)`.
#[must_use]
pub fn perpendicular(angle_deg: f64) -> f64 {
    normalize_axis_angle(angle_deg + 90.0)
}
