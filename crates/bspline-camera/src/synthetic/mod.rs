//! Deterministic synthetic control grids.
//!
//! These helpers build ray-direction grids for idealized lenses so tests,
//! examples and the CLI can exercise the sampler without calibration data:
//! - a constant direction ([`constant_grid`]),
//! - a pinhole camera ([`pinhole_grid`]),
//! - an equidistant fisheye ([`equidistant_fisheye_grid`]), valid past 90°.
//!
//! Node `(i, j)` sits at grid pixel `((w - 1) / (n - 1) * i, (h - 1) / (m - 1) * j)`
//! and the optical axis passes through the grid center.
//!
//! # Example
//!
//! ```
//! use bspline_camera::{synthetic, CentralModel, ModelConfig};
//!
//! let grid = synthetic::equidistant_fisheye_grid(9, 7, (640, 480), 200.0).unwrap();
//! let model = CentralModel::new(ModelConfig::new((640, 480), (640, 480), 3), grid).unwrap();
//! let ray = model.sample_normalized(320.0, 240.0).unwrap();
//! assert!(ray.z > 0.99);
//! ```

pub mod noise;

use crate::{math::node_pixel, ConfigError, ControlGrid, Real, Vec3};

/// Offset of node `(i, j)` from the grid center, in pixels.
fn centered(i: usize, j: usize, n: usize, m: usize, grid: (u32, u32)) -> (Real, Real) {
    let cx = (Real::from(grid.0) - 1.0) / 2.0;
    let cy = (Real::from(grid.1) - 1.0) / 2.0;
    (node_pixel(i, n, grid.0) - cx, node_pixel(j, m, grid.1) - cy)
}

/// Grid where every control point equals `dir`.
pub fn constant_grid(n: usize, m: usize, dir: Vec3) -> Result<ControlGrid, ConfigError> {
    ControlGrid::from_fn(n, m, |_, _| dir)
}

/// Unit rays of a pinhole camera with focal length `focal_px`.
pub fn pinhole_grid(
    n: usize,
    m: usize,
    grid: (u32, u32),
    focal_px: Real,
) -> Result<ControlGrid, ConfigError> {
    ControlGrid::from_fn(n, m, |i, j| {
        let (dx, dy) = centered(i, j, n, m, grid);
        Vec3::new(dx, dy, focal_px).normalize()
    })
}

/// Unit rays of an equidistant fisheye (`theta = r / focal_px`).
pub fn equidistant_fisheye_grid(
    n: usize,
    m: usize,
    grid: (u32, u32),
    focal_px: Real,
) -> Result<ControlGrid, ConfigError> {
    ControlGrid::from_fn(n, m, |i, j| {
        let (dx, dy) = centered(i, j, n, m, grid);
        let r = dx.hypot(dy);
        if r == 0.0 {
            return Vec3::z();
        }
        let theta = r / focal_px;
        let s = theta.sin() / r;
        Vec3::new(dx * s, dy * s, theta.cos())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinhole_rays_are_unit_and_symmetric() {
        let grid = pinhole_grid(5, 5, (101, 101), 50.0).unwrap();
        for (_, _, p) in grid.iter() {
            assert!((p.norm() - 1.0).abs() < 1e-12);
        }
        assert_eq!(*grid.get(2, 2), Vec3::z());
        let a = grid.get(0, 2);
        let b = grid.get(4, 2);
        assert!((a.x + b.x).abs() < 1e-12);
        assert!((a.z - b.z).abs() < 1e-12);
    }

    #[test]
    fn fisheye_reaches_past_ninety_degrees() {
        // Corner radius ~141 px with f = 60 px gives theta ~ 2.36 rad.
        let grid = equidistant_fisheye_grid(3, 3, (201, 201), 60.0).unwrap();
        let corner = grid.get(0, 0);
        assert!(corner.z < 0.0, "corner ray {corner:?}");
        assert!((corner.norm() - 1.0).abs() < 1e-12);
        assert_eq!(*grid.get(1, 1), Vec3::z());
    }

    #[test]
    fn constant_grid_fills_every_node() {
        let grid = constant_grid(3, 4, Vec3::new(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(grid.shape(), (3, 4));
        assert!(grid.iter().all(|(_, _, p)| *p == Vec3::new(0.0, 0.0, 2.0)));
        assert!(constant_grid(0, 4, Vec3::z()).is_err());
    }
}
