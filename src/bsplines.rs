//! Closed-form evaluation of the cardinal cubic B-spline and its derivatives.
//!
//! The temporal basis is the cardinal (uniform-knot) cubic B-spline: every
//! basis function is the same bell-shaped piecewise cubic, translated by an
//! integer number of knot intervals. Its support spans `SPLINE_DEGREE + 1 = 4`
//! intervals, so on any single interval exactly four basis functions are
//! non-zero, one per positional offset ("shift") of the interval within a
//! spline's support.
//!
//! [`derivative_table`] samples those four local polynomial pieces — or their
//! first or second derivatives — at equally spaced points across one knot
//! interval. The values come from the exact piece polynomials, differentiated
//! coefficient-wise and evaluated by Horner's rule, so the only error is
//! floating-point rounding. This exactness is what lets the quadrature module
//! integrate spline products without truncation error.

use crate::types::{DampingError, SPLINE_DEGREE};
use ndarray::Array2;

/// Polynomial coefficients (in `u^0..u^3`, `u` local to the interval) of the
/// four pieces of the cardinal cubic B-spline. Row `k` is the restriction of
/// the spline to `[k, k+1]` in knot units.
const PIECE_COEFFS: [[f64; 4]; 4] = [
    [0.0, 0.0, 0.0, 1.0 / 6.0],
    [1.0 / 6.0, 0.5, 0.5, -0.5],
    [2.0 / 3.0, 0.0, -1.0, 0.5],
    [1.0 / 6.0, -0.5, 0.5, -1.0 / 6.0],
];

/// Differentiates a local piece polynomial `order` times, in place.
fn differentiate(coeffs: &mut [f64; 4], order: usize) {
    for _ in 0..order {
        for k in 1..coeffs.len() {
            coeffs[k - 1] = coeffs[k] * k as f64;
        }
        coeffs[3] = 0.0;
    }
}

#[inline]
fn horner(coeffs: &[f64; 4], u: f64) -> f64 {
    coeffs
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * u + c)
}

/// Samples the derivative-order-`ddt` cubic B-spline pieces across one knot
/// interval.
///
/// Returns a `(SPLINE_DEGREE + 1) × num_points` table: row `shift` holds the
/// values of the piece with positional offset `shift` within the spline's
/// support, sampled at `num_points` equally spaced locations spanning the
/// interval (endpoints included; a single point samples the left edge).
/// Because the basis lives on a grid with spacing `t_step`, each derivative
/// order carries a factor `t_step^(-ddt)` from the chain rule.
///
/// # Arguments
/// * `t_step` - knot spacing of the temporal grid (positive, finite)
/// * `num_points` - number of sample locations per interval (at least 1)
/// * `ddt` - derivative order, 0 through 2
pub fn derivative_table(
    t_step: f64,
    num_points: usize,
    ddt: usize,
) -> Result<Array2<f64>, DampingError> {
    if ddt >= SPLINE_DEGREE {
        return Err(DampingError::InvalidDerivativeOrder {
            order: ddt,
            max: SPLINE_DEGREE - 1,
        });
    }
    if num_points == 0 {
        return Err(DampingError::EmptySampleTable);
    }
    if !t_step.is_finite() || t_step <= 0.0 {
        return Err(DampingError::InvalidTimeStep(t_step));
    }

    let scale = t_step.powi(-(ddt as i32));
    let mut table = Array2::<f64>::zeros((SPLINE_DEGREE + 1, num_points));
    for shift in 0..=SPLINE_DEGREE {
        let mut coeffs = PIECE_COEFFS[shift];
        differentiate(&mut coeffs, ddt);
        for point in 0..num_points {
            let u = if num_points == 1 {
                0.0
            } else {
                point as f64 / (num_points - 1) as f64
            };
            table[[shift, point]] = scale * horner(&coeffs, u);
        }
    }
    Ok(table)
}
