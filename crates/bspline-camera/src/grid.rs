//! Control-point grid of the B-spline surface.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Real, Vec3};

/// Immutable `n x m` grid of 3D control points.
///
/// Index `i` runs along the horizontal image axis (`u`, `n` points) and
/// `j` along the vertical axis (`v`, `m` points). Storage is row-major in `i`.
/// Control points do not need to be unit vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<[Real; 3]>>", into = "Vec<Vec<[Real; 3]>>")]
pub struct ControlGrid {
    n: usize,
    m: usize,
    points: Vec<Vec3>,
}

impl ControlGrid {
    /// Build a grid from nested rows `rows[i][j] = [x, y, z]`.
    ///
    /// All rows must be non-empty and of equal length.
    pub fn from_rows(rows: Vec<Vec<[Real; 3]>>) -> Result<Self, ConfigError> {
        let n = rows.len();
        if n == 0 {
            return Err(ConfigError::InvalidControlGrid("grid has no rows".into()));
        }
        let m = rows[0].len();
        if m == 0 {
            return Err(ConfigError::InvalidControlGrid("grid has no columns".into()));
        }
        if let Some(idx) = rows.iter().position(|row| row.len() != m) {
            return Err(ConfigError::InvalidControlGrid(format!(
                "row {} has {} points, expected {}",
                idx,
                rows[idx].len(),
                m
            )));
        }

        let points = rows
            .into_iter()
            .flatten()
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();
        Ok(Self { n, m, points })
    }

    /// Build a grid from a flat `n x m x 3` buffer in row-major order.
    ///
    /// This is the dense-array form: the buffer length must be exactly
    /// `n * m * 3`, i.e. rank three with a trailing dimension of three.
    pub fn from_flat(n: usize, m: usize, data: &[Real]) -> Result<Self, ConfigError> {
        if n == 0 || m == 0 {
            return Err(ConfigError::InvalidControlGrid(format!(
                "grid shape {n}x{m} is empty"
            )));
        }
        if data.len() != n * m * 3 {
            return Err(ConfigError::InvalidControlGrid(format!(
                "expected {} values for shape ({n}, {m}, 3), got {}",
                n * m * 3,
                data.len()
            )));
        }
        let points = data
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self { n, m, points })
    }

    /// Build a grid by evaluating `f(i, j)` for every node.
    pub fn from_fn(
        n: usize,
        m: usize,
        mut f: impl FnMut(usize, usize) -> Vec3,
    ) -> Result<Self, ConfigError> {
        if n == 0 || m == 0 {
            return Err(ConfigError::InvalidControlGrid(format!(
                "grid shape {n}x{m} is empty"
            )));
        }
        let mut points = Vec::with_capacity(n * m);
        for i in 0..n {
            for j in 0..m {
                points.push(f(i, j));
            }
        }
        Ok(Self { n, m, points })
    }

    /// Number of control points along the horizontal axis.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of control points along the vertical axis.
    pub fn m(&self) -> usize {
        self.m
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n, self.m)
    }

    /// Control point at node `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n` or `j >= m`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> &Vec3 {
        assert!(i < self.n && j < self.m, "node ({i}, {j}) outside {}x{}", self.n, self.m);
        &self.points[i * self.m + j]
    }

    /// Iterate over `(i, j, point)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Vec3)> + '_ {
        let m = self.m;
        self.points
            .iter()
            .enumerate()
            .map(move |(idx, p)| (idx / m, idx % m, p))
    }

    /// Nested `[x, y, z]` rows, the inverse of [`ControlGrid::from_rows`].
    pub fn to_rows(&self) -> Vec<Vec<[Real; 3]>> {
        self.points
            .chunks(self.m)
            .map(|row| row.iter().map(|p| [p.x, p.y, p.z]).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<[Real; 3]>>> for ControlGrid {
    type Error = ConfigError;

    fn try_from(rows: Vec<Vec<[Real; 3]>>) -> Result<Self, Self::Error> {
        ControlGrid::from_rows(rows)
    }
}

impl From<ControlGrid> for Vec<Vec<[Real; 3]>> {
    fn from(grid: ControlGrid) -> Self {
        grid.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_and_flat_agree() {
        let rows = vec![
            vec![[0.0, 0.0, 1.0], [0.1, 0.0, 1.0]],
            vec![[0.0, 0.1, 1.0], [0.1, 0.1, 1.0]],
            vec![[0.0, 0.2, 1.0], [0.1, 0.2, 1.0]],
        ];
        let flat: Vec<Real> = rows.iter().flatten().flatten().copied().collect();

        let a = ControlGrid::from_rows(rows.clone()).unwrap();
        let b = ControlGrid::from_flat(3, 2, &flat).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.shape(), (3, 2));
        assert_eq!(*a.get(2, 1), Vec3::new(0.1, 0.2, 1.0));
        assert_eq!(a.to_rows(), rows);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = ControlGrid::from_rows(vec![vec![[0.0; 3]; 3], vec![[0.0; 3]; 2]]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidControlGrid(_)));
        assert!(ControlGrid::from_rows(Vec::new()).is_err());
        assert!(ControlGrid::from_rows(vec![Vec::new()]).is_err());
    }

    #[test]
    fn flat_buffer_must_have_depth_three() {
        assert!(ControlGrid::from_flat(2, 2, &[0.0; 8]).is_err());
        assert!(ControlGrid::from_flat(2, 2, &[0.0; 16]).is_err());
        assert!(ControlGrid::from_flat(0, 2, &[]).is_err());
        assert!(ControlGrid::from_flat(2, 2, &[0.0; 12]).is_ok());
    }

    #[test]
    fn iter_visits_every_node() {
        let grid = ControlGrid::from_fn(3, 4, |i, j| Vec3::new(i as Real, j as Real, 1.0)).unwrap();
        let nodes: Vec<_> = grid.iter().map(|(i, j, p)| (i, j, *p)).collect();
        assert_eq!(nodes.len(), 12);
        for (i, j, p) in nodes {
            assert_eq!(p, Vec3::new(i as Real, j as Real, 1.0));
        }
    }

    #[test]
    fn serde_uses_nested_rows() {
        let json = "[[[0.0,0.0,1.0],[1.0,0.0,1.0]],[[0.0,1.0,1.0],[1.0,1.0,1.0]]]";
        let grid: ControlGrid = serde_json::from_str(json).unwrap();
        assert_eq!(grid.shape(), (2, 2));
        assert_eq!(*grid.get(1, 0), Vec3::new(0.0, 1.0, 1.0));

        let ragged = "[[[0.0,0.0,1.0]],[]]";
        assert!(serde_json::from_str::<ControlGrid>(ragged).is_err());
        let shallow = "[[[0.0,0.0]]]";
        assert!(serde_json::from_str::<ControlGrid>(shallow).is_err());
    }
}
