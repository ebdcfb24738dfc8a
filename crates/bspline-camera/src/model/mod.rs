//! The B-spline central camera model.
//!
//! A [`CentralModel`] maps a pixel `(u, v)` to a ray direction:
//!
//! 1. [`CoordinateMapper`] normalizes the pixel into parameters `(u', v')`,
//! 2. one basis sweep per axis evaluates `B(i, order, u')` and
//!    `B(j, order, v')` (see [`crate::basis`]),
//! 3. the control points are blended with the product weights, skipping
//!    basis values below `min_basis_value`,
//! 4. optionally the result is normalized to a unit direction.
//!
//! All state is fixed at construction; sampling only reads it, so a model can
//! be shared freely across threads.

mod mapper;
mod params;
mod sampler;

pub use mapper::*;
pub use params::*;
pub use sampler::*;

use log::debug;

use crate::{ConfigError, ControlGrid, KnotGenerator, KnotVector};

/// Generalized B-spline camera model mapping pixels to ray directions.
#[derive(Clone, Debug)]
pub struct CentralModel {
    config: ModelConfig,
    grid: ControlGrid,
    mapper: CoordinateMapper,
    /// Knots along `u`, built from the horizontal control-point count `n`.
    knots_u: KnotVector,
    /// Knots along `v`, built from the vertical control-point count `m`.
    knots_v: KnotVector,
}

impl CentralModel {
    /// Validate the configuration against the control grid and build the model.
    ///
    /// Fails when the image or grid dimensions are degenerate or when
    /// `order >= min(n, m)`.
    pub fn new(config: ModelConfig, grid: ControlGrid) -> Result<Self, ConfigError> {
        config.validate()?;
        let (n, m) = grid.shape();
        if config.order >= n || config.order >= m {
            return Err(ConfigError::OrderTooLarge {
                order: config.order,
                n,
                m,
            });
        }

        let knots_u = config.knot_method.knots(n, config.order);
        let knots_v = config.knot_method.knots(m, config.order);
        let mapper = CoordinateMapper::new(config.image_dimensions, config.grid_dimensions);

        debug!(
            "central model: image {:?}, grid {:?}, control points {}x{}, order {}, knots {}, min basis {}",
            config.image_dimensions,
            config.grid_dimensions,
            n,
            m,
            config.order,
            config.knot_method,
            config.min_basis_value
        );

        Ok(Self {
            config,
            grid,
            mapper,
            knots_u,
            knots_v,
        })
    }

    /// Build a model with an explicit knot strategy instead of the configured one.
    ///
    /// `config.knot_method` is kept as given and only describes the model.
    pub fn with_knot_generator(
        config: ModelConfig,
        grid: ControlGrid,
        generator: &dyn KnotGenerator,
    ) -> Result<Self, ConfigError> {
        let mut model = Self::new(config, grid)?;
        let (n, m) = model.grid.shape();
        let order = model.config.order;
        model.knots_u = generator.knots(n, order);
        model.knots_v = generator.knots(m, order);
        for (axis, knots, count) in [("u", &model.knots_u, n), ("v", &model.knots_v, m)] {
            if knots.len() < count + order + 1 {
                return Err(ConfigError::InvalidKnotVector(format!(
                    "{axis} axis needs at least {} knots, got {}",
                    count + order + 1,
                    knots.len()
                )));
            }
        }
        Ok(model)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn grid(&self) -> &ControlGrid {
        &self.grid
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn order(&self) -> usize {
        self.config.order
    }

    /// Knot vector used by the horizontal (`u`, index `i`) basis sweep.
    pub fn knots_u(&self) -> &KnotVector {
        &self.knots_u
    }

    /// Knot vector used by the vertical (`v`, index `j`) basis sweep.
    pub fn knots_v(&self) -> &KnotVector {
        &self.knots_v
    }
}
