//! Cox–de Boor evaluation of B-spline basis functions.
//!
//! The recursion
//!
//! ```text
//! B(i, 0, x) = 1 if t[i] <= x < t[i+1] else 0
//! B(i, k, x) = (x - t[i]) / (t[i+k] - t[i]) * B(i, k-1, x)
//!            + (t[i+k+1] - x) / (t[i+k+1] - t[i+1]) * B(i+1, k-1, x)
//! ```
//!
//! is evaluated bottom-up as a triangular table, so every `(i, k)` pair is
//! computed exactly once per call. The table lives on the stack of the call
//! that owns it; nothing is shared between calls or threads.
//!
//! A zero denominator replaces both numerator and denominator with one, i.e.
//! that coefficient becomes exactly `1` and the term reduces to the
//! lower-order value unchanged.

use crate::Real;

/// Evaluate the single basis function `B(i, k)` at `x`.
///
/// # Panics
///
/// Panics if `knots.len() < i + k + 2`.
pub fn basis(i: usize, k: usize, knots: &[Real], x: Real) -> Real {
    triangle(knots, x, i, 1, k)[0]
}

/// Evaluate `B(0, k), ..., B(count - 1, k)` at `x` with one shared table.
///
/// # Panics
///
/// Panics if `knots.len() < count + k + 1`.
pub fn basis_row(count: usize, k: usize, knots: &[Real], x: Real) -> Vec<Real> {
    triangle(knots, x, 0, count, k)
}

/// Values of `B(first + r, order)` for `r in 0..count`.
fn triangle(knots: &[Real], x: Real, first: usize, count: usize, order: usize) -> Vec<Real> {
    let width = count + order;
    assert!(
        knots.len() > first + width,
        "knot vector of length {} too short for basis {}..{} of order {}",
        knots.len(),
        first,
        first + count,
        order
    );

    let mut row: Vec<Real> = (first..first + width)
        .map(|j| {
            if knots[j] <= x && x < knots[j + 1] {
                1.0
            } else {
                0.0
            }
        })
        .collect();

    // Level k overwrites row[r] with B(first + r, k); row[r + 1] still holds level k - 1.
    for k in 1..=order {
        for r in 0..width - k {
            let i = first + r;
            let left = ratio(x - knots[i], knots[i + k] - knots[i]) * row[r];
            let right = ratio(knots[i + k + 1] - x, knots[i + k + 1] - knots[i + 1]) * row[r + 1];
            row[r] = left + right;
        }
    }

    row.truncate(count);
    row
}

#[inline]
fn ratio(num: Real, den: Real) -> Real {
    if den == 0.0 {
        1.0
    } else {
        num / den
    }
}
