//! Deterministic angular perturbation of control grids.
//!
//! Each control node gets its own SplitMix64 stream keyed by the seed and the
//! node index, so a perturbed grid depends only on `(seed, max_angle)` and
//! stays stable across versions and platforms.

use nalgebra::{Rotation3, Unit};

use crate::{ConfigError, ControlGrid, Real, Vec3};

/// Rotates every control direction by a deterministic angle in `[0, max_angle)`
/// about an axis perpendicular to it.
///
/// The rotation keeps the length of each control point, so unit rays stay unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirectionNoise {
    /// Base seed selecting the per-node streams.
    pub seed: u64,
    /// Largest rotation angle, in radians.
    pub max_angle: Real,
}

impl DirectionNoise {
    pub fn new(seed: u64, max_angle: Real) -> Self {
        Self { seed, max_angle }
    }

    /// Perturbed copy of `dir`, the control point at node `(i, j)`.
    pub fn perturb(&self, i: usize, j: usize, dir: &Vec3) -> Vec3 {
        let max_angle = self.max_angle.abs();
        let len = dir.norm();
        if max_angle == 0.0 || len == 0.0 {
            return *dir;
        }

        let mut stream = NodeStream::new(self.seed, i, j);
        let angle = stream.next_unit() * max_angle;
        let azimuth = stream.next_unit() * std::f64::consts::TAU;

        let d = dir / len;
        let helper = if d.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        let e1 = d.cross(&helper).normalize();
        let e2 = d.cross(&e1);
        let axis = Unit::new_normalize(e1 * azimuth.cos() + e2 * azimuth.sin());
        Rotation3::from_axis_angle(&axis, angle) * dir
    }

    /// Perturb every control point of `grid`.
    pub fn apply(&self, grid: &ControlGrid) -> Result<ControlGrid, ConfigError> {
        let (n, m) = grid.shape();
        ControlGrid::from_fn(n, m, |i, j| self.perturb(i, j, grid.get(i, j)))
    }
}

/// SplitMix64 generator seeded per control node.
struct NodeStream {
    state: u64,
}

impl NodeStream {
    const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

    fn new(seed: u64, i: usize, j: usize) -> Self {
        let mut base = Self { state: seed };
        let row = base.next_u64() ^ i as u64;
        let mut seeded = Self { state: row };
        let state = seeded.next_u64() ^ j as u64;
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(Self::GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)` from the top 53 bits.
    fn next_unit(&mut self) -> Real {
        (self.next_u64() >> 11) as Real / (1u64 << 53) as Real
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{constant_grid, equidistant_fisheye_grid};

    fn angle_between(a: &Vec3, b: &Vec3) -> Real {
        (a.dot(b) / (a.norm() * b.norm())).clamp(-1.0, 1.0).acos()
    }

    #[test]
    fn perturbation_is_deterministic_and_bounded() {
        let noise = DirectionNoise::new(7, 0.05);
        let dir = Vec3::new(0.2, -0.1, 1.0);
        let a = noise.perturb(1, 2, &dir);
        assert_eq!(a, noise.perturb(1, 2, &dir));
        assert_ne!(a, noise.perturb(2, 1, &dir));
        assert_ne!(a, DirectionNoise::new(8, 0.05).perturb(1, 2, &dir));
        assert!(angle_between(&a, &dir) <= 0.05 + 1e-12);
        assert!((a.norm() - dir.norm()).abs() < 1e-12);
    }

    #[test]
    fn zero_angle_keeps_grid() {
        let grid = constant_grid(3, 3, Vec3::new(0.0, 0.6, 0.8)).unwrap();
        let same = DirectionNoise::new(5, 0.0).apply(&grid).unwrap();
        assert_eq!(same, grid);
    }

    #[test]
    fn rays_along_x_axis_are_perturbed() {
        let noise = DirectionNoise::new(3, 0.1);
        let p = noise.perturb(0, 0, &Vec3::x());
        assert!(p.iter().all(|c| c.is_finite()));
        assert!((p.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perturbed_fisheye_rays_stay_unit() {
        let grid = equidistant_fisheye_grid(5, 4, (320, 240), 90.0).unwrap();
        let noisy = DirectionNoise::new(11, 0.02).apply(&grid).unwrap();
        assert_ne!(noisy, grid);
        for (i, j, p) in noisy.iter() {
            assert!((p.norm() - 1.0).abs() < 1e-12);
            assert!(angle_between(p, grid.get(i, j)) <= 0.02 + 1e-9);
        }
    }
}
