//! Error and diagnostic types for the collision simulation.
//!
//! Construction-time problems are errors and are returned to the caller.
//! Problems found while stepping are contained to the affected bodies and
//! surfaced as [`Diagnostic`]s in the step report instead.

use thiserror::Error;

use crate::body::BodyId;

/// Errors returned by fallible constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A parameter was out of its valid range (non-positive radius, mass,
    /// cell size, timestep, restitution outside `[0, 1]`, ...).
    #[error("invalid parameter `{name}`: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, value: f32, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Requires `value` to be finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<f32, SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::invalid(name, value, "must be finite and > 0"))
    }
}

/// Requires `value` to lie in `[0, 1]`.
pub(crate) fn ensure_unit(name: &'static str, value: f32) -> Result<f32, SimError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SimError::invalid(name, value, "must be within [0, 1]"))
    }
}

/// Recoverable anomalies observed during a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagnostic {
    /// Two bodies had coincident centres; they were pushed apart along a
    /// fallback axis.
    DegenerateGeometry { a: BodyId, b: BodyId },
    /// A body's position or velocity became non-finite and was reset.
    NumericalInstability { body: BodyId },
}
