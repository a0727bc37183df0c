//! Per-coefficient spatial damping weights.
//!
//! Every damping method assigns one weight per spherical-harmonic degree,
//! repeated across the `2l + 1` orders of that degree. The profiles are the
//! usual spatial norms of the geomagnetic inversion literature, expressed at
//! the core-mantle boundary through the downward-continuation ratio
//! `(a / c)^(2l + k)` so that small-scale (high-degree) structure is
//! penalized progressively harder.

use crate::types::{coefficient_count, DampingMethod};
use ndarray::Array1;

/// Earth surface reference radius, km (IGRF convention).
pub const RADIUS_SURFACE_KM: f64 = 6371.2;

/// Core-mantle boundary radius, km.
pub const RADIUS_CMB_KM: f64 = 3485.0;

/// Weight applied to every coefficient of spherical-harmonic degree `l`.
fn degree_weight(l: usize, method: DampingMethod) -> f64 {
    let lf = l as f64;
    let ratio = RADIUS_SURFACE_KM / RADIUS_CMB_KM;
    match method {
        DampingMethod::Uniform => 1.0,
        // Lowes' lower bound on ohmic dissipation in the core.
        DampingMethod::Dissipation => {
            (lf + 1.0) * (2.0 * lf + 1.0) * (2.0 * lf + 3.0) / lf
                * ratio.powi(2 * l as i32 + 3)
        }
        // Geometric growth of the spectral power series at the CMB.
        DampingMethod::Powerseries => ratio.powi(2 * l as i32 + 4),
        // Gubbins' heat-flow norm.
        DampingMethod::Gubbins => {
            (lf + 1.0) * (2.0 * lf + 1.0) / lf * ratio.powi(2 * l as i32 + 3)
        }
        // Mean-square horizontal gradient of Br over the CMB.
        DampingMethod::Horderiv2cmb => {
            lf * (lf + 1.0).powi(3) / (2.0 * lf + 1.0) * ratio.powi(2 * l as i32 + 6)
        }
        // Mean-square radial field over the CMB.
        DampingMethod::Br2cmb => {
            (lf + 1.0).powi(2) / (2.0 * lf + 1.0) * ratio.powi(2 * l as i32 + 4)
        }
        // Energy density of the external potential field at the CMB.
        DampingMethod::Energydensity => (lf + 1.0) * ratio.powi(2 * l as i32 + 4),
    }
}

/// Builds the damping weight vector, one entry per (degree, order)
/// coefficient.
///
/// Entries are degree-major: degrees `1..=max_degree`, with the `2l + 1`
/// orders of degree `l` sharing the same weight. With `damp_dipole = false`
/// the three degree-1 entries are zeroed so the dipole is left unpenalized.
/// All weights are non-negative.
pub fn damping_weights(
    max_degree: usize,
    method: DampingMethod,
    damp_dipole: bool,
) -> Array1<f64> {
    let mut weights = Array1::<f64>::zeros(coefficient_count(max_degree));
    let mut index = 0;
    for l in 1..=max_degree {
        let weight = if l == 1 && !damp_dipole {
            0.0
        } else {
            degree_weight(l, method)
        };
        for _ in 0..(2 * l + 1) {
            weights[index] = weight;
            index += 1;
        }
    }
    weights
}
