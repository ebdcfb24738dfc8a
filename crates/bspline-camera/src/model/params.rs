use serde::{Deserialize, Serialize};

use super::CentralModel;
use crate::{ConfigError, ControlGrid, KnotMethod, Real};

/// Default significance threshold below which basis values are dropped.
pub const DEFAULT_MIN_BASIS_VALUE: Real = 0.001;
/// Default value of the (currently inert) end divergence parameter.
pub const DEFAULT_END_DIVERGENCE: Real = 1e-10;

fn default_min_basis_value() -> Real {
    DEFAULT_MIN_BASIS_VALUE
}

fn default_end_divergence() -> Real {
    DEFAULT_END_DIVERGENCE
}

/// Image and grid geometry plus spline settings of a [`CentralModel`].
///
/// Dimensions are `(width, height)` in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Image size in pixels.
    pub image_dimensions: (u32, u32),
    /// Calibration grid footprint in pixels; both values must exceed 1.
    pub grid_dimensions: (u32, u32),
    /// Spline order; must be smaller than both control-point counts.
    pub order: usize,
    /// Knot construction strategy.
    #[serde(default)]
    pub knot_method: KnotMethod,
    /// Basis values below this threshold are skipped during accumulation.
    ///
    /// A value `<= 0` keeps every basis function.
    #[serde(default = "default_min_basis_value")]
    pub min_basis_value: Real,
    /// Accepted for compatibility with existing model files.
    ///
    /// Sampling does not read it: the right-open basis intervals are left
    /// untouched and the value is only carried through serialization.
    #[serde(default = "default_end_divergence")]
    pub end_divergence: Real,
}

impl ModelConfig {
    /// Config with default knot method, threshold and end divergence.
    pub fn new(image_dimensions: (u32, u32), grid_dimensions: (u32, u32), order: usize) -> Self {
        Self {
            image_dimensions,
            grid_dimensions,
            order,
            knot_method: KnotMethod::default(),
            min_basis_value: DEFAULT_MIN_BASIS_VALUE,
            end_divergence: DEFAULT_END_DIVERGENCE,
        }
    }

    pub fn with_knot_method(mut self, knot_method: KnotMethod) -> Self {
        self.knot_method = knot_method;
        self
    }

    pub fn with_min_basis_value(mut self, min_basis_value: Real) -> Self {
        self.min_basis_value = min_basis_value;
        self
    }

    /// Check the geometry constraints that do not depend on the control grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (iw, ih) = self.image_dimensions;
        if iw == 0 || ih == 0 {
            return Err(ConfigError::InvalidImageDimensions {
                width: iw,
                height: ih,
            });
        }
        let (gw, gh) = self.grid_dimensions;
        if gw <= 1 || gh <= 1 {
            return Err(ConfigError::InvalidGridDimensions {
                width: gw,
                height: gh,
            });
        }
        Ok(())
    }
}

/// Serializable model description: configuration plus control points.
///
/// ```
/// use bspline_camera::CentralModelParams;
///
/// let json = r#"{
///     "image_dimensions": [100, 100],
///     "grid_dimensions": [100, 100],
///     "order": 1,
///     "control_points": [
///         [[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
///         [[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]]
///     ]
/// }"#;
/// let params: CentralModelParams = serde_json::from_str(json).unwrap();
/// let model = params.build().unwrap();
/// assert_eq!(model.grid().shape(), (2, 2));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CentralModelParams {
    #[serde(flatten)]
    pub config: ModelConfig,
    /// Nested `[i][j] = [x, y, z]` control points.
    pub control_points: ControlGrid,
}

impl CentralModelParams {
    /// Build the runtime model, validating every construction precondition.
    pub fn build(&self) -> Result<CentralModel, ConfigError> {
        CentralModel::new(self.config.clone(), self.control_points.clone())
    }
}

impl From<&CentralModel> for CentralModelParams {
    fn from(model: &CentralModel) -> Self {
        Self {
            config: model.config().clone(),
            control_points: model.grid().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_serde_shape_and_defaults() {
        let json = r#"{
            "image_dimensions": [640, 480],
            "grid_dimensions": [700, 540],
            "order": 3
        }"#;
        let cfg: ModelConfig = serde_json::from_str(json).expect("serde should succeed");
        assert_eq!(cfg.image_dimensions, (640, 480));
        assert_eq!(cfg.grid_dimensions, (700, 540));
        assert_eq!(cfg.order, 3);
        assert_eq!(cfg.knot_method, KnotMethod::OpenUniform);
        assert_eq!(cfg.min_basis_value, DEFAULT_MIN_BASIS_VALUE);
        assert_eq!(cfg.end_divergence, DEFAULT_END_DIVERGENCE);
    }

    #[test]
    fn knot_method_serde_names() {
        let cfg: ModelConfig = serde_json::from_str(
            r#"{"image_dimensions":[10,10],"grid_dimensions":[10,10],"order":1,"knot_method":"uniform"}"#,
        )
        .unwrap();
        assert_eq!(cfg.knot_method, KnotMethod::Uniform);

        let bad = serde_json::from_str::<ModelConfig>(
            r#"{"image_dimensions":[10,10],"grid_dimensions":[10,10],"order":1,"knot_method":"bezier"}"#,
        );
        assert!(bad.is_err());

        let out = serde_json::to_value(ModelConfig::new((4, 4), (4, 4), 1)).unwrap();
        assert_eq!(out["knot_method"], "open_uniform");
    }

    #[test]
    fn dimensions_must_be_pairs() {
        let triple = serde_json::from_str::<ModelConfig>(
            r#"{"image_dimensions":[10,10,3],"grid_dimensions":[10,10],"order":1}"#,
        );
        assert!(triple.is_err());
    }

    #[test]
    fn validate_rejects_degenerate_geometry() {
        assert_eq!(
            ModelConfig::new((0, 10), (10, 10), 1).validate(),
            Err(ConfigError::InvalidImageDimensions {
                width: 0,
                height: 10
            })
        );
        assert_eq!(
            ModelConfig::new((10, 10), (10, 1), 1).validate(),
            Err(ConfigError::InvalidGridDimensions {
                width: 10,
                height: 1
            })
        );
        assert!(ModelConfig::new((10, 10), (2, 2), 1).validate().is_ok());
    }
}
