//! Exact Newton-Cotes quadrature of overlapping B-spline products.
//!
//! On each knot interval the product of two (possibly differentiated) cubic
//! B-spline pieces is a polynomial of degree `2 * (SPLINE_DEGREE - ddt)`. A
//! closed Newton-Cotes rule of exactly that order integrates such a
//! polynomial without truncation error, so the overlap integrals computed
//! here are exact up to floating-point rounding:
//!
//! * `ddt = 0`: degree-6 product, 7-point rule (exact through degree 7)
//! * `ddt = 1`: degree-4 product, Boole's rule (exact through degree 5)
//! * `ddt = 2`: degree-2 product, Simpson's rule (exact through degree 3)
//!
//! The weights are the standard closed Newton-Cotes coefficients normalized
//! so they sum to the rule order; each interval contribution is then scaled
//! by the node spacing `t_step / order`.

use crate::bsplines::derivative_table;
use crate::types::{DampingError, SPLINE_DEGREE};

/// Simpson's rule (order 2).
const NEWTON_COTES_2: [f64; 3] = [1.0 / 3.0, 4.0 / 3.0, 1.0 / 3.0];

/// Boole's rule (order 4).
const NEWTON_COTES_4: [f64; 5] = [
    14.0 / 45.0,
    64.0 / 45.0,
    24.0 / 45.0,
    64.0 / 45.0,
    14.0 / 45.0,
];

/// 7-point closed rule (order 6).
const NEWTON_COTES_6: [f64; 7] = [
    41.0 / 140.0,
    216.0 / 140.0,
    27.0 / 140.0,
    272.0 / 140.0,
    27.0 / 140.0,
    216.0 / 140.0,
    41.0 / 140.0,
];

fn newton_cotes_weights(order: usize) -> Option<&'static [f64]> {
    match order {
        2 => Some(&NEWTON_COTES_2),
        4 => Some(&NEWTON_COTES_4),
        6 => Some(&NEWTON_COTES_6),
        _ => None,
    }
}

/// Integrates the product of two cubic B-splines (or their derivatives) over
/// the valid time domain.
///
/// Computes `∫ B_spl1^(ddt)(t) * B_spl2^(ddt)(t) dt`, where `B_i` is the
/// cubic B-spline starting at knot `i` of a uniform grid with spacing
/// `t_step`. Splines farther than `SPLINE_DEGREE` indices apart share no
/// support, and the valid domain clips the first `SPLINE_DEGREE` intervals
/// and everything beyond knot `nr_splines`; both cases yield 0.0, not an
/// error.
///
/// # Arguments
/// * `spl1`, `spl2` - indices of the two splines
/// * `nr_splines` - total number of splines in the basis (at least 4)
/// * `t_step` - knot spacing (positive, finite)
/// * `ddt` - derivative order applied to both splines, 0 through 2
pub fn spline_overlap_integral(
    spl1: usize,
    spl2: usize,
    nr_splines: usize,
    t_step: f64,
    ddt: usize,
) -> Result<f64, DampingError> {
    if ddt >= SPLINE_DEGREE {
        return Err(DampingError::InvalidDerivativeOrder {
            order: ddt,
            max: SPLINE_DEGREE - 1,
        });
    }
    if nr_splines < SPLINE_DEGREE + 1 {
        return Err(DampingError::InsufficientSplines {
            degree: SPLINE_DEGREE,
            required: SPLINE_DEGREE + 1,
            provided: nr_splines,
        });
    }
    if !t_step.is_finite() || t_step <= 0.0 {
        return Err(DampingError::InvalidTimeStep(t_step));
    }

    if spl1.abs_diff(spl2) > SPLINE_DEGREE {
        return Ok(0.0);
    }

    // Shared support, clipped to the valid domain [SPLINE_DEGREE, nr_splines]
    // in knot units.
    let low = spl1.max(spl2).max(SPLINE_DEGREE);
    let high = (spl1 + SPLINE_DEGREE)
        .min(spl2 + SPLINE_DEGREE)
        .min(nr_splines - 1);
    if low > high {
        return Ok(0.0);
    }

    // Rule order matching the degree of the piecewise-polynomial product.
    let order = 2 * (SPLINE_DEGREE - ddt);
    let weights = newton_cotes_weights(order).ok_or(DampingError::InvalidDerivativeOrder {
        order: ddt,
        max: SPLINE_DEGREE - 1,
    })?;
    let table = derivative_table(t_step, order + 1, ddt)?;
    let dt = t_step / order as f64;

    let mut integral = 0.0;
    for interval in low..=high {
        let shift1 = interval - spl1;
        let shift2 = interval - spl2;
        let mut contribution = 0.0;
        for (point, &weight) in weights.iter().enumerate() {
            contribution += weight * table[[shift1, point]] * table[[shift2, point]];
        }
        integral += contribution * dt;
    }
    Ok(integral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn weights_sum_to_rule_order() {
        for order in [2usize, 4, 6] {
            let weights = newton_cotes_weights(order).expect("supported order");
            let sum: f64 = weights.iter().sum();
            assert_relative_eq!(sum, order as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn weights_integrate_monomials_exactly() {
        // A closed rule of order n on [0, n] is exact for degree <= n + 1
        // (n even); checking up to the rule order covers what the overlap
        // integrals need.
        for order in [2usize, 4, 6] {
            let weights = newton_cotes_weights(order).expect("supported order");
            for degree in 0..=order as u32 {
                let approx_value: f64 = weights
                    .iter()
                    .enumerate()
                    .map(|(i, &w)| w * (i as f64).powi(degree as i32))
                    .sum();
                let exact = (order as f64).powi(degree as i32 + 1) / (degree as f64 + 1.0);
                assert_relative_eq!(approx_value, exact, epsilon = 1e-9, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn interior_self_overlap_matches_analytic_norm() {
        // ∫ B(x)^2 dx = 151/315 for the cardinal cubic B-spline.
        let value = spline_overlap_integral(3, 3, 10, 1.0, 0).expect("valid inputs");
        assert_relative_eq!(value, 151.0 / 315.0, epsilon = 1e-13);
    }

    #[test]
    fn interior_overlaps_match_analytic_values() {
        // Exact lag-k products of the cardinal cubic B-spline and its
        // derivatives, from rational integration of the piece polynomials.
        let expected = [
            [
                151.0 / 315.0,
                397.0 / 1680.0,
                1.0 / 42.0,
                1.0 / 5040.0,
            ],
            [2.0 / 3.0, -1.0 / 8.0, -1.0 / 5.0, -1.0 / 120.0],
            [8.0 / 3.0, -3.0 / 2.0, 0.0, 1.0 / 6.0],
        ];
        for ddt in 0..=2usize {
            for lag in 0..=3usize {
                let value =
                    spline_overlap_integral(3, 3 + lag, 20, 1.0, ddt).expect("valid inputs");
                assert_relative_eq!(value, expected[ddt][lag], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn overlap_is_symmetric_in_spline_indices() {
        for ddt in 0..=2usize {
            for spl1 in 0..8usize {
                for spl2 in 0..8usize {
                    let a = spline_overlap_integral(spl1, spl2, 8, 0.7, ddt).expect("valid");
                    let b = spline_overlap_integral(spl2, spl1, 8, 0.7, ddt).expect("valid");
                    assert_relative_eq!(a, b, epsilon = 1e-14);
                }
            }
        }
    }

    #[test]
    fn out_of_band_pairs_integrate_to_zero() {
        for ddt in 0..=2usize {
            let value = spline_overlap_integral(0, 4, 12, 1.0, ddt).expect("valid inputs");
            assert_eq!(value, 0.0);
            let value = spline_overlap_integral(9, 2, 12, 1.0, ddt).expect("valid inputs");
            assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn boundary_spline_loses_clipped_intervals() {
        // Spline 0 keeps only its last support interval inside the valid
        // domain: ∫ over [3, 4] of piece 3 squared = 1/252.
        let value = spline_overlap_integral(0, 0, 10, 1.0, 0).expect("valid inputs");
        assert_relative_eq!(value, 1.0 / 252.0, epsilon = 1e-15);
    }

    #[test]
    fn time_step_scaling_follows_derivative_order() {
        // ∫ (d^k/dt^k B(t/h))^2 dt = h^(1 - 2k) * unit-step value.
        let h = 2.5;
        for ddt in 0..=2usize {
            let unit = spline_overlap_integral(3, 4, 12, 1.0, ddt).expect("valid");
            let scaled = spline_overlap_integral(3, 4, 12, h, ddt).expect("valid");
            let factor = h.powi(1 - 2 * ddt as i32);
            assert_relative_eq!(scaled, unit * factor, epsilon = 1e-12);
        }
    }

    #[test]
    fn invalid_parameters_fail_fast() {
        assert!(matches!(
            spline_overlap_integral(0, 0, 10, 1.0, 3),
            Err(DampingError::InvalidDerivativeOrder { order: 3, max: 2 })
        ));
        assert!(matches!(
            spline_overlap_integral(0, 0, 3, 1.0, 0),
            Err(DampingError::InsufficientSplines { provided: 3, .. })
        ));
        assert!(matches!(
            spline_overlap_integral(0, 0, 10, -1.0, 0),
            Err(DampingError::InvalidTimeStep(_))
        ));
    }
}
