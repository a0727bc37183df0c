use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Degree of every B-spline in the temporal basis (cubic).
pub const SPLINE_DEGREE: usize = 3;

/// Number of spherical-harmonic coefficients for degrees `1..=max_degree`,
/// all orders, excluding the degree-0 (monopole) term.
pub fn coefficient_count(max_degree: usize) -> usize {
    (max_degree + 1) * (max_degree + 1) - 1
}

/// Spatial damping norm selector.
///
/// Each variant picks one per-degree weight profile for the damping
/// diagonal; see [`crate::weights::damping_weights`]. Unrecognized names are
/// rejected at parse time rather than falling back to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DampingMethod {
    Uniform,
    Dissipation,
    Powerseries,
    Gubbins,
    Horderiv2cmb,
    Br2cmb,
    Energydensity,
}

impl DampingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DampingMethod::Uniform => "Uniform",
            DampingMethod::Dissipation => "Dissipation",
            DampingMethod::Powerseries => "Powerseries",
            DampingMethod::Gubbins => "Gubbins",
            DampingMethod::Horderiv2cmb => "Horderiv2cmb",
            DampingMethod::Br2cmb => "Br2cmb",
            DampingMethod::Energydensity => "Energydensity",
        }
    }
}

impl fmt::Display for DampingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DampingMethod {
    type Err = DampingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Uniform" => Ok(DampingMethod::Uniform),
            "Dissipation" => Ok(DampingMethod::Dissipation),
            "Powerseries" => Ok(DampingMethod::Powerseries),
            "Gubbins" => Ok(DampingMethod::Gubbins),
            "Horderiv2cmb" => Ok(DampingMethod::Horderiv2cmb),
            "Br2cmb" => Ok(DampingMethod::Br2cmb),
            "Energydensity" => Ok(DampingMethod::Energydensity),
            other => Err(DampingError::UnknownDampingMethod(other.to_string())),
        }
    }
}

/// A comprehensive error type for all operations within this crate.
#[derive(Error, Debug)]
pub enum DampingError {
    #[error(
        "Derivative order must be between 0 and {max}, but was {order}; higher orders leave no polynomial degree to integrate."
    )]
    InvalidDerivativeOrder { order: usize, max: usize },

    #[error(
        "At least {required} splines are needed for a degree-{degree} B-spline overlap, but only {provided} were given; every overlap window would be empty."
    )]
    InsufficientSplines {
        degree: usize,
        required: usize,
        provided: usize,
    },

    #[error("Time step must be positive and finite, but was {0}.")]
    InvalidTimeStep(f64),

    #[error("Maximum spherical-harmonic degree must be at least 1, but was {0}.")]
    InvalidMaxDegree(usize),

    #[error("Sample table needs at least one point, but zero were requested.")]
    EmptySampleTable,

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error(
        "Unknown damping method '{0}'; expected one of Uniform, Dissipation, Powerseries, Gubbins, Horderiv2cmb, Br2cmb, Energydensity."
    )]
    UnknownDampingMethod(String),
}
