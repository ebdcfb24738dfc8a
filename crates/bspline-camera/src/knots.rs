//! Knot vectors and the knot construction strategies.
//!
//! A model asks a [`KnotGenerator`] for one knot vector per axis. Two
//! strategies are available and selected through [`KnotMethod`]:
//!
//! - [`OpenUniform`]: clamped at both ends so the surface interpolates the
//!   boundary control points,
//! - [`Uniform`]: evenly spaced knots without clamping.
//!
//! Both produce `count + order + 2` knots whose valid parameter domain is
//! `[0, 1]`.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Real};

/// Immutable, non-decreasing knot sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotVector {
    knots: Vec<Real>,
}

impl KnotVector {
    /// Validate and wrap a knot sequence.
    ///
    /// Fails when the sequence is empty, contains a non-finite value, or
    /// decreases anywhere.
    pub fn new(knots: Vec<Real>) -> Result<Self, ConfigError> {
        if knots.is_empty() {
            return Err(ConfigError::InvalidKnotVector("empty knot vector".into()));
        }
        if let Some(idx) = knots.iter().position(|t| !t.is_finite()) {
            return Err(ConfigError::InvalidKnotVector(format!(
                "knot {idx} is not finite"
            )));
        }
        if let Some(idx) = knots.windows(2).position(|w| w[1] < w[0]) {
            return Err(ConfigError::InvalidKnotVector(format!(
                "knots decrease between index {} and {}",
                idx,
                idx + 1
            )));
        }
        Ok(Self { knots })
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn as_slice(&self) -> &[Real] {
        &self.knots
    }

    pub fn first(&self) -> Real {
        self.knots[0]
    }

    pub fn last(&self) -> Real {
        self.knots[self.knots.len() - 1]
    }
}

impl Index<usize> for KnotVector {
    type Output = Real;

    fn index(&self, idx: usize) -> &Real {
        &self.knots[idx]
    }
}

impl AsRef<[Real]> for KnotVector {
    fn as_ref(&self) -> &[Real] {
        &self.knots
    }
}

/// Strategy building a knot vector for `count` control points of a given order.
pub trait KnotGenerator {
    /// Build `count + order + 2` non-decreasing knots.
    ///
    /// Callers guarantee `order < count`.
    fn knots(&self, count: usize, order: usize) -> KnotVector;
}

/// Clamped knots: `order + 1` zeros, evenly spaced interior knots, then ones.
///
/// The trailing run of ones has `order + 2` entries; the extra guard knot keeps
/// the sequence length equal to the unclamped strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpenUniform;

impl KnotGenerator for OpenUniform {
    fn knots(&self, count: usize, order: usize) -> KnotVector {
        debug_assert!(order < count);
        let spans = (count - order) as Real;
        let knots = (0..count + order + 2)
            .map(|j| ((j as Real - order as Real) / spans).clamp(0.0, 1.0))
            .collect();
        KnotVector { knots }
    }
}

/// Evenly spaced knots `t_j = (j - order) / (count - order)`.
///
/// The valid domain `[t_order, t_count]` is `[0, 1]`; the end knots extend
/// beyond it instead of being clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Uniform;

impl KnotGenerator for Uniform {
    fn knots(&self, count: usize, order: usize) -> KnotVector {
        debug_assert!(order < count);
        let spans = (count - order) as Real;
        let knots = (0..count + order + 2)
            .map(|j| (j as Real - order as Real) / spans)
            .collect();
        KnotVector { knots }
    }
}

/// Configuration-level choice of knot construction strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnotMethod {
    #[default]
    OpenUniform,
    Uniform,
}

impl KnotMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnotMethod::OpenUniform => "open_uniform",
            KnotMethod::Uniform => "uniform",
        }
    }
}

impl KnotGenerator for KnotMethod {
    fn knots(&self, count: usize, order: usize) -> KnotVector {
        match self {
            KnotMethod::OpenUniform => OpenUniform.knots(count, order),
            KnotMethod::Uniform => Uniform.knots(count, order),
        }
    }
}

impl FromStr for KnotMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open_uniform" => Ok(KnotMethod::OpenUniform),
            "uniform" => Ok(KnotMethod::Uniform),
            other => Err(ConfigError::UnknownKnotMethod(other.to_string())),
        }
    }
}

impl fmt::Display for KnotMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
