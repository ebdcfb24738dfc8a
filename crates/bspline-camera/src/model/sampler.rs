use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::CentralModel;
use crate::{basis::basis_row, direction_distance, math::node_pixel, Pt2, Real, SampleError, Vec3};

/// Distance statistics between [`CentralModel::sample_grid`] and the control grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridResiduals {
    /// Mean Euclidean distance.
    pub mean: Real,
    /// Root-mean-square distance.
    pub rms: Real,
    /// Largest distance.
    pub max: Real,
    /// Number of compared nodes.
    pub count: usize,
}

/// Per-axis basis values at one pixel and the indices that pass the threshold.
struct Weights {
    bh: Vec<Real>,
    bv: Vec<Real>,
    keep_i: Vec<usize>,
    keep_j: Vec<usize>,
}

impl CentralModel {
    fn weights(&self, u: Real, v: Real, min_basis_value: Real) -> Weights {
        let (up, vp) = self.mapper.to_param(u, v);
        let (n, m) = self.grid.shape();
        let order = self.config.order;

        let bh = basis_row(n, order, self.knots_u.as_slice(), up);
        let bv = basis_row(m, order, self.knots_v.as_slice(), vp);

        let keep = |b: &[Real]| -> Vec<usize> {
            b.iter()
                .enumerate()
                .filter(|&(_, &w)| w >= min_basis_value)
                .map(|(idx, _)| idx)
                .collect()
        };
        let keep_i = keep(&bh);
        let keep_j = keep(&bv);

        Weights {
            bh,
            bv,
            keep_i,
            keep_j,
        }
    }

    fn accumulate(&self, w: &Weights) -> Vec3 {
        let mut res = Vec3::zeros();
        for &i in &w.keep_i {
            for &j in &w.keep_j {
                res += self.grid.get(i, j) * (w.bh[i] * w.bv[j]);
            }
        }
        res
    }

    /// Sample the surface at pixel `(u, v)`.
    ///
    /// Returns the weighted sum of control points over the basis functions
    /// whose value reaches `min_basis_value` on each axis. Pixels outside the
    /// support of the surface (including the far edge, where the parameter
    /// equals the final knot) yield the zero vector.
    pub fn sample(&self, u: Real, v: Real) -> Vec3 {
        let w = self.weights(u, v, self.config.min_basis_value);
        self.accumulate(&w)
    }

    /// Like [`CentralModel::sample`], but reports pixels with no retained
    /// basis function on either axis as [`SampleError::OutsideDomain`].
    ///
    /// A pixel outside the support along only one axis still samples to the
    /// zero vector without an error.
    pub fn try_sample(&self, u: Real, v: Real) -> Result<Vec3, SampleError> {
        let w = self.weights(u, v, self.config.min_basis_value);
        if w.keep_i.is_empty() && w.keep_j.is_empty() {
            trace!(
                "pixel ({u}, {v}) outside surface support: {} u / {} v basis functions kept",
                w.keep_i.len(),
                w.keep_j.len()
            );
            return Err(SampleError::OutsideDomain { u, v });
        }
        Ok(self.accumulate(&w))
    }

    /// Untruncated weighted sum over every control point.
    pub fn sample_full(&self, u: Real, v: Real) -> Vec3 {
        let w = self.weights(u, v, Real::NEG_INFINITY);
        self.accumulate(&w)
    }

    /// Sample the surface and scale the result to unit length.
    ///
    /// Fails with [`SampleError::ZeroNorm`] when the sampled vector is exactly
    /// zero, e.g. outside the support of the surface.
    pub fn sample_normalized(&self, u: Real, v: Real) -> Result<Vec3, SampleError> {
        let s = self.sample(u, v);
        let norm = s.norm();
        if norm == 0.0 {
            return Err(SampleError::ZeroNorm { u, v });
        }
        Ok(s / norm)
    }

    /// Sample a batch of pixels, in order.
    pub fn sample_many(&self, pixels: &[Pt2]) -> Vec<Vec3> {
        pixels.iter().map(|p| self.sample(p.x, p.y)).collect()
    }

    /// Representative pixel of control node `(i, j)`:
    /// `(floor((grid_width - 1) / (n - 1) * i), floor((grid_height - 1) / (m - 1) * j))`.
    ///
    /// An axis with a single control point maps to pixel `0`.
    pub fn grid_pixel(&self, i: usize, j: usize) -> Pt2 {
        let (n, m) = self.grid.shape();
        let (gw, gh) = self.config.grid_dimensions;
        Pt2::new(node_pixel(i, n, gw).floor(), node_pixel(j, m, gh).floor())
    }

    /// Sample the surface at the representative pixel of every control node.
    ///
    /// The result has the shape of the control grid (`[i][j]`) and is meant
    /// for comparing the sampled surface against the control points.
    pub fn sample_grid(&self) -> Vec<Vec<Vec3>> {
        let (n, m) = self.grid.shape();
        (0..n)
            .map(|i| {
                (0..m)
                    .map(|j| {
                        let px = self.grid_pixel(i, j);
                        self.sample(px.x, px.y)
                    })
                    .collect()
            })
            .collect()
    }

    /// Distance statistics between [`CentralModel::sample_grid`] and the control points.
    pub fn grid_residuals(&self) -> GridResiduals {
        let samples = self.sample_grid();

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut max: Real = 0.0;
        let mut count = 0usize;
        for (i, j, cp) in self.grid.iter() {
            let err = direction_distance(&samples[i][j], cp);
            sum += err;
            sum_sq += err * err;
            max = max.max(err);
            count += 1;
        }

        let count_f = count as Real;
        let stats = GridResiduals {
            mean: sum / count_f,
            rms: (sum_sq / count_f).sqrt(),
            max,
            count,
        };
        debug!(
            "grid residuals: mean {:.3e}, rms {:.3e}, max {:.3e} over {} nodes",
            stats.mean, stats.rms, stats.max, stats.count
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ControlGrid, ModelConfig};

    fn ramp_model(order: usize) -> CentralModel {
        let grid = ControlGrid::from_fn(6, 5, |i, j| Vec3::new(i as Real, j as Real, 1.0)).unwrap();
        CentralModel::new(ModelConfig::new((200, 160), (200, 160), order), grid).unwrap()
    }

    #[test]
    fn grid_pixel_uses_floor() {
        let model = ramp_model(1);
        // (200 - 1) / 5 * 3 = 119.4, (160 - 1) / 4 * 1 = 39.75
        assert_eq!(model.grid_pixel(3, 1), Pt2::new(119.0, 39.0));
        assert_eq!(model.grid_pixel(0, 0), Pt2::new(0.0, 0.0));
        assert_eq!(model.grid_pixel(2, 4), Pt2::new(79.0, 159.0));
    }

    #[test]
    fn linear_surface_reproduces_synthetic_nodes() {
        // Node spacing is a whole number of pixels on both axes.
        let grid = crate::synthetic::pinhole_grid(6, 5, (501, 401), 250.0).unwrap();
        let model =
            CentralModel::new(ModelConfig::new((501, 401), (501, 401), 1), grid.clone()).unwrap();
        let samples = model.sample_grid();
        for i in 0..5 {
            for j in 0..4 {
                assert_eq!(samples[i][j], *grid.get(i, j), "node ({i}, {j})");
            }
        }
    }

    #[test]
    fn sample_grid_has_control_shape() {
        let model = ramp_model(2);
        let grid = model.sample_grid();
        assert_eq!(grid.len(), 6);
        assert!(grid.iter().all(|row| row.len() == 5));
    }

    #[test]
    fn try_sample_flags_outside_pixels() {
        let model = ramp_model(2);
        assert_eq!(
            model.try_sample(-50.0, -50.0),
            Err(SampleError::OutsideDomain { u: -50.0, v: -50.0 })
        );
        assert_eq!(model.sample(-50.0, -50.0), Vec3::zeros());
        assert!(model.try_sample(100.0, 80.0).is_ok());
    }

    #[test]
    fn try_sample_needs_both_axes_outside() {
        let model = ramp_model(2);
        // u inside, v outside: the product set is empty but only one axis misses.
        assert_eq!(model.try_sample(50.0, -50.0), Ok(Vec3::zeros()));
        assert_eq!(model.try_sample(500.0, 80.0), Ok(Vec3::zeros()));
        assert_eq!(model.sample(50.0, -50.0), Vec3::zeros());
        assert!(model.try_sample(500.0, -50.0).is_err());
    }

    #[test]
    fn normalized_outside_support_is_division_by_zero() {
        let model = ramp_model(2);
        let err = model.sample_normalized(1000.0, 10.0).unwrap_err();
        assert_eq!(err, SampleError::ZeroNorm { u: 1000.0, v: 10.0 });
    }

    #[test]
    fn sample_many_preserves_order() {
        let model = ramp_model(2);
        let pixels = [Pt2::new(10.0, 10.0), Pt2::new(150.0, 20.0), Pt2::new(80.0, 120.0)];
        let batch = model.sample_many(&pixels);
        assert_eq!(batch.len(), 3);
        for (p, s) in pixels.iter().zip(&batch) {
            assert_eq!(*s, model.sample(p.x, p.y));
        }
    }
}
