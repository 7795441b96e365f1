//! # Fuel and Labor Cost Model
//!
//! Turns a coverage result into fuel use and money:
//!
//! - `fuel_consumed = rate(speed) * time_to_complete`
//! - `fuel_cost = fuel_consumed * fuel_price`
//! - `labor_cost = labor_rate * time_to_complete`
//! - `total_cost = fuel_cost + labor_cost`
//!
//! The fuel-rate curve is checked at the evaluated speed; a negative or
//! non-finite rate fails the whole evaluation.

use crate::coverage::Coverage;
use crate::error::ModelError;
use crate::fuel_curve::FuelCurve;
use crate::params::UnitParameters;

/// Fuel and cost figures for one evaluated speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuelCost {
    pub fuel_rate_l_per_h: f64,
    pub fuel_consumed_l: f64,
    pub fuel_cost: f64,
    pub labor_cost: f64,
    pub total_cost: f64,
}

/// Fuel and labor cost of running at `speed_kmh` for `time_to_complete_h`.
pub fn evaluate(
    curve: &FuelCurve,
    speed_kmh: f64,
    time_to_complete_h: f64,
    fuel_price: f64,
    labor_rate: f64,
) -> Result<FuelCost, ModelError> {
    let fuel_rate_l_per_h = curve.checked_rate(speed_kmh)?;
    let fuel_consumed_l = fuel_rate_l_per_h * time_to_complete_h;
    let fuel_cost = fuel_consumed_l * fuel_price;
    let labor_cost = labor_rate * time_to_complete_h;

    Ok(FuelCost {
        fuel_rate_l_per_h,
        fuel_consumed_l,
        fuel_cost,
        labor_cost,
        total_cost: fuel_cost + labor_cost,
    })
}

/// Costs for a coverage result computed from the same parameters.
pub fn for_coverage(params: &UnitParameters, coverage: &Coverage) -> Result<FuelCost, ModelError> {
    evaluate(
        params.fuel_curve(),
        coverage.speed_kmh,
        coverage.time_to_complete_h,
        params.fuel_price(),
        params.labor_rate(),
    )
}
