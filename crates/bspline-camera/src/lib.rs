//! Generalized B-spline central camera model.
//!
//! A non-pinhole camera (fisheye, omnidirectional, ...) is described by a
//! grid of ray directions sampled at calibration-grid nodes. A tensor-product
//! B-spline surface over that grid maps any pixel to a ray direction.
//!
//! This crate contains:
//! - knot construction strategies (`open_uniform`, `uniform`),
//! - a Cox–de Boor basis evaluator,
//! - the [`CentralModel`] surface sampler with significance-based truncation,
//! - deterministic synthetic control grids for tests and examples.
//!
//! Sampling pipeline:
//! `ray = Σ cp[i][j] · B_i(u') · B_j(v')`, with `(u', v') = normalize(u, v)`.
//!
//! # Example
//!
//! ```
//! use bspline_camera::{synthetic, CentralModel, ModelConfig, Vec3};
//!
//! let grid = synthetic::constant_grid(5, 5, Vec3::z()).unwrap();
//! let model = CentralModel::new(ModelConfig::new((100, 100), (100, 100), 2), grid).unwrap();
//! let ray = model.sample(50.0, 50.0);
//! assert!((ray - Vec3::z()).norm() < 1e-6);
//! ```

/// Cox–de Boor basis function evaluation.
pub mod basis;
mod error;
mod grid;
mod knots;
mod math;
mod model;
/// Deterministic synthetic control grids.
pub mod synthetic;

pub use error::*;
pub use grid::*;
pub use knots::*;
pub use math::*;
pub use model::*;
