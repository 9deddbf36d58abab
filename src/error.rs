//! Error types for simulation entry points and obstacle construction.

use nalgebra::Vector2;
use thiserror::Error;

/// Errors raised by the simulation API and the obstacle constructors.
///
/// Every variant reports a violated precondition; physical outcomes such as
/// "no future collision" are ordinary values (`f64::INFINITY` with empty
/// partner data), never errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BilliardError {
    #[error("{quantity} must be finite")]
    NonFinite { quantity: &'static str },

    #[error("ball radius must be finite and non-negative, got {0}")]
    InvalidRadius(f64),

    #[error("ball mass must be non-negative (infinity allowed), got {0}")]
    InvalidMass(f64),

    #[error("ball index {index} out of range for {count} balls")]
    UnknownBall { index: usize, count: usize },

    #[error("line endpoints coincide at ({0}, {1})")]
    DegenerateLine(f64, f64),

    #[error("disk radius must be finite and positive, got {0}")]
    InvalidDiskRadius(f64),

    #[error("cannot evolve backwards from t = {time} to t = {end_time}")]
    TimeReversal { time: f64, end_time: f64 },
}

pub(crate) fn require_finite_point(
    point: Vector2<f64>,
    quantity: &'static str,
) -> Result<(), BilliardError> {
    if point.x.is_finite() && point.y.is_finite() {
        Ok(())
    } else {
        Err(BilliardError::NonFinite { quantity })
    }
}
