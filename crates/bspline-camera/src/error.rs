//! Error types for model construction and sampling.

use thiserror::Error;

use crate::Real;

/// Precondition violations detected while building a [`crate::CentralModel`].
///
/// These are not recoverable at the call site: construction does not proceed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Knot construction strategy name is not one of `open_uniform`, `uniform`.
    #[error("unknown knot method `{0}`, expected `open_uniform` or `uniform`")]
    UnknownKnotMethod(String),
    /// Image width and height must both be positive.
    #[error("image dimensions must be positive, got {width}x{height}")]
    InvalidImageDimensions { width: u32, height: u32 },
    /// Grid width and height are used as divisors and must both exceed 1.
    #[error("grid dimensions must both be greater than 1, got {width}x{height}")]
    InvalidGridDimensions { width: u32, height: u32 },
    /// Control points are not a non-empty n x m x 3 array.
    #[error("invalid control grid: {0}")]
    InvalidControlGrid(String),
    /// Spline order must be smaller than both control-point counts.
    #[error("order {order} must be smaller than grid size {n}x{m}")]
    OrderTooLarge { order: usize, n: usize, m: usize },
    /// Knot sequence is not finite and non-decreasing.
    #[error("invalid knot vector: {0}")]
    InvalidKnotVector(String),
}

/// Failures reported by the explicit sampling entry points.
///
/// The default [`crate::CentralModel::sample`] never fails; these variants
/// only surface through `try_sample` and `sample_normalized`.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SampleError {
    /// No basis function passes the threshold on either axis.
    #[error("pixel ({u}, {v}) lies outside the support of the surface")]
    OutsideDomain { u: Real, v: Real },
    /// The sampled vector is exactly zero and cannot be normalized.
    #[error("division by zero: sample at ({u}, {v}) has zero norm")]
    ZeroNorm { u: Real, v: Real },
}
