use serde::{Deserialize, Serialize};

use crate::{Pt2, Real};

/// Maps raw pixel coordinates into the B-spline parameter domain.
///
/// The image footprint is centered inside the (possibly larger) calibration
/// grid footprint, then scaled so that grid pixel `0` maps to `0` and grid
/// pixel `grid - 1` maps to `1`:
///
/// ```text
/// u' = (u + (grid_width  - image_width)  / 2) / (grid_width  - 1)
/// v' = (v + (grid_height - image_height) / 2) / (grid_height - 1)
/// ```
///
/// No clamping is applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    offset_u: Real,
    offset_v: Real,
    scale_u: Real,
    scale_v: Real,
}

impl CoordinateMapper {
    /// Build a mapper from `(width, height)` pairs.
    ///
    /// Callers guarantee both grid dimensions exceed one.
    pub fn new(image: (u32, u32), grid: (u32, u32)) -> Self {
        let (iw, ih) = (Real::from(image.0), Real::from(image.1));
        let (gw, gh) = (Real::from(grid.0), Real::from(grid.1));
        Self {
            offset_u: (gw - iw) / 2.0,
            offset_v: (gh - ih) / 2.0,
            scale_u: gw - 1.0,
            scale_v: gh - 1.0,
        }
    }

    /// Pixel `(u, v)` to normalized parameters `(u', v')`.
    #[inline]
    pub fn to_param(&self, u: Real, v: Real) -> (Real, Real) {
        ((u + self.offset_u) / self.scale_u, (v + self.offset_v) / self.scale_v)
    }

    /// Normalized parameters back to a pixel position.
    pub fn to_pixel(&self, up: Real, vp: Real) -> Pt2 {
        Pt2::new(up * self.scale_u - self.offset_u, vp * self.scale_v - self.offset_v)
    }
}
