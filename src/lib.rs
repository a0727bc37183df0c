#![deny(dead_code)]
#![deny(unused_imports)]

//! Damping (regularization) operators for geomagnetic field inversions.
//!
//! A geomagnetic field model represents each spherical-harmonic Gauss
//! coefficient as a linear combination of cubic B-splines on a uniform time
//! grid. This crate builds the quadratic penalty used to regularize that
//! model: [`damp_matrix`] assembles the symmetric block-banded damping matrix
//! from exact B-spline overlap integrals and a per-degree weight profile, and
//! [`damp_norm`] evaluates the corresponding roughness norm of a fitted
//! coefficient series, one value per time step.

pub mod bsplines;
pub mod construction;
pub mod quadrature;
pub mod types;
pub mod weights;

pub use bsplines::derivative_table;
pub use construction::{damp_matrix, damp_norm};
pub use quadrature::spline_overlap_integral;
pub use types::{coefficient_count, DampingError, DampingMethod, SPLINE_DEGREE};
pub use weights::{damping_weights, RADIUS_CMB_KM, RADIUS_SURFACE_KM};
