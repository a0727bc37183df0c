//! Assembly of the block-banded damping matrix and the per-step roughness
//! norm.
//!
//! The damping matrix is an `nr_splines x nr_splines` grid of
//! `nm_total x nm_total` blocks. Block `(i, j)` couples splines `i` and `j`
//! and equals `damp_factor * overlap(i, j) * diag(weights)`; cubic B-splines
//! interact only within `|i - j| <= SPLINE_DEGREE`, so everything outside
//! that band stays zero. Because the overlap integral is symmetric in its
//! spline arguments and the per-block factor is diagonal, the assembled
//! matrix is symmetric by construction.
//!
//! Block rows never overlap, so they are filled in parallel, each worker
//! owning exactly one `nm_total`-row chunk of the output. The same pattern
//! applies to the norm evaluator: per-step windows are read-only and each
//! step writes its own output slot.

use crate::bsplines::derivative_table;
use crate::quadrature::spline_overlap_integral;
use crate::types::{coefficient_count, DampingError, DampingMethod, SPLINE_DEGREE};
use crate::weights::damping_weights;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

/// Builds the damping (regularization) matrix for a splined spherical-
/// harmonic model, together with the weight vector used on each block
/// diagonal.
///
/// The matrix has dimension `nm_total * nr_splines` with
/// `nm_total = (max_degree + 1)^2 - 1`, and is symmetric and block-banded
/// with bandwidth `SPLINE_DEGREE`. A `damp_factor` of exactly zero disables
/// damping: the all-zero matrix of the stated dimension and an empty weight
/// vector are returned without consulting the remaining parameters.
///
/// # Arguments
/// * `max_degree` - maximum spherical-harmonic degree of the model (>= 1)
/// * `nr_splines` - number of temporal B-splines (>= 4 when damping is on)
/// * `t_step` - knot spacing of the temporal grid
/// * `damp_factor` - global damping factor (lambda); zero disables damping
/// * `method` - spatial norm selecting the per-degree weights
/// * `ddt` - B-spline derivative order for temporal damping, 0 through 2
/// * `damp_dipole` - whether degree-1 (dipole) coefficients are damped
///
/// # Returns
/// The damping matrix and the length-`nm_total` weight vector (empty when
/// damping is disabled).
pub fn damp_matrix(
    max_degree: usize,
    nr_splines: usize,
    t_step: f64,
    damp_factor: f64,
    method: DampingMethod,
    ddt: usize,
    damp_dipole: bool,
) -> Result<(Array2<f64>, Array1<f64>), DampingError> {
    if max_degree < 1 {
        return Err(DampingError::InvalidMaxDegree(max_degree));
    }
    let nm_total = coefficient_count(max_degree);
    let dim = nm_total * nr_splines;

    if damp_factor == 0.0 {
        log::debug!("damping disabled (damp_factor = 0), returning zero matrix of dim {dim}");
        return Ok((Array2::zeros((dim, dim)), Array1::zeros(0)));
    }

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

    let weights = damping_weights(max_degree, method, damp_dipole);
    log::debug!(
        "assembling {dim}x{dim} {method} damping matrix ({nr_splines} splines, ddt {ddt})"
    );

    let mut matrix = Array2::<f64>::zeros((dim, dim));
    matrix
        .axis_chunks_iter_mut(Axis(0), nm_total)
        .into_par_iter()
        .enumerate()
        .try_for_each(|(spl1, mut block_row)| -> Result<(), DampingError> {
            let band_lo = spl1.saturating_sub(SPLINE_DEGREE);
            let band_hi = (spl1 + SPLINE_DEGREE).min(nr_splines - 1);
            for spl2 in band_lo..=band_hi {
                let overlap = spline_overlap_integral(spl1, spl2, nr_splines, t_step, ddt)?;
                let scale = damp_factor * overlap;
                let mut block =
                    block_row.slice_mut(s![.., spl2 * nm_total..(spl2 + 1) * nm_total]);
                for (m, &weight) in weights.iter().enumerate() {
                    block[[m, m]] = scale * weight;
                }
            }
            Ok(())
        })?;

    Ok((matrix, weights))
}

/// Evaluates the damping norm of a splined coefficient series, one value per
/// retained time step.
///
/// `coeff` holds one row of `nm_total` spline coefficients per spline;
/// `weights` is the damping diagonal from [`damping_weights`] (or the one
/// returned by [`damp_matrix`]). Each step combines a window of
/// `SPLINE_DEGREE + 1` consecutive rows with the single-point derivative
/// stencil, squares the resulting coefficient vector and weighs it. The
/// series is padded with `SPLINE_DEGREE` leading zero rows (coefficients are
/// taken to vanish before the series starts); the first `SPLINE_DEGREE`
/// outputs are artifacts of that padding and are dropped, and the rest are
/// divided by `t_step`. The result therefore has `T - SPLINE_DEGREE` entries
/// for `T` input rows (empty when `T <= SPLINE_DEGREE`).
pub fn damp_norm(
    weights: ArrayView1<f64>,
    coeff: ArrayView2<f64>,
    ddt: usize,
    t_step: f64,
) -> Result<Array1<f64>, DampingError> {
    let nm_total = coeff.ncols();
    if weights.len() != nm_total {
        return Err(DampingError::DimensionMismatch(format!(
            "weight vector has length {} but coefficient rows have {} entries",
            weights.len(),
            nm_total
        )));
    }

    let stencil = derivative_table(t_step, 1, ddt)?.column(0).to_owned();

    // Owned zero-padded copy; the caller's series is never touched.
    let nr_steps = coeff.nrows();
    let mut padded = Array2::<f64>::zeros((nr_steps + SPLINE_DEGREE, nm_total));
    padded.slice_mut(s![SPLINE_DEGREE.., ..]).assign(&coeff);

    let norms: Vec<f64> = (0..nr_steps)
        .into_par_iter()
        .map(|t| {
            let window = padded.slice(s![t..t + SPLINE_DEGREE + 1, ..]);
            let combined = stencil.dot(&window);
            combined.mapv(|g| g * g).dot(&weights)
        })
        .collect();

    Ok(norms
        .into_iter()
        .skip(SPLINE_DEGREE)
        .map(|norm| norm / t_step)
        .collect())
}
