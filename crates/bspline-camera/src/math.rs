//! Scalar and vector type aliases used throughout the crate.

use nalgebra::{Point2, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components (ray directions, control points).
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates (pixels or normalized parameters).
pub type Pt2 = Point2<Real>;

/// Euclidean distance between two directions.
pub fn direction_distance(a: &Vec3, b: &Vec3) -> Real {
    (a - b).norm()
}

/// Pixel position of control node `idx` out of `count` along an axis of
/// `extent` pixels: `(extent - 1) / (count - 1) * idx`.
///
/// An axis with a single node maps to `0`.
pub(crate) fn node_pixel(idx: usize, count: usize, extent: u32) -> Real {
    if count < 2 {
        return 0.0;
    }
    (Real::from(extent) - 1.0) / (count - 1) as Real * idx as Real
}
