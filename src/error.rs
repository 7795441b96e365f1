//! # Model Errors
//!
//! Every validation failure in the cost model surfaces as a [`ModelError`].
//! Errors are raised where the bad value is first seen and propagated to the
//! caller unchanged; nothing in the model retries or clamps.

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the field operation cost model.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelError {
    /// Speed was zero, negative or not a finite number
    #[error("invalid speed {speed} km/h: speed must be a finite value above zero")]
    InvalidSpeed { speed: f64 },

    /// Fuel-rate curve produced a negative or non-finite consumption
    #[error("invalid fuel curve: rate {rate_l_per_h} l/h at {speed} km/h")]
    InvalidFuelCurve { speed: f64, rate_l_per_h: f64 },

    /// Time budget was zero, negative or not a finite number
    #[error("invalid time budget {time_budget_h} h: budget must be a finite value above zero")]
    InvalidBudget { time_budget_h: f64 },

    /// No sampled speed completes the field within the time budget
    #[error(
        "no speed in {speed_min}..={speed_max} km/h finishes within {time_budget_h} h; \
         at least {required_speed:.2} km/h is needed"
    )]
    Infeasible {
        speed_min: f64,
        speed_max: f64,
        time_budget_h: f64,
        required_speed: f64,
    },

    /// Generic bound violation on a named parameter
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ModelError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        ModelError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
