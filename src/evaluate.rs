//! # Single-Speed Evaluation
//!
//! Chains the coverage, fuel-cost and tractor-count models into one
//! [`OperationResult`]. This is the only place the three models meet, so the
//! search and the curve generator both go through [`evaluate`].

use crate::error::ModelError;
use crate::params::UnitParameters;
use crate::{coverage, fuel_cost, tractors, OperationResult};

/// Full set of figures for running the operation at `speed_kmh`.
pub fn evaluate(
    params: &UnitParameters,
    speed_kmh: f64,
) -> Result<OperationResult, ModelError> {
    let coverage = coverage::evaluate(params, speed_kmh)?;
    let cost = fuel_cost::for_coverage(params, &coverage)?;
    let tractors_required = tractors::tractors_required(
        params.area_ha(),
        coverage.rate_ha_per_h,
        params.time_budget_h(),
    )?;

    Ok(OperationResult {
        speed: speed_kmh,
        coverage_rate_ha_per_h: coverage.rate_ha_per_h,
        time_to_complete_h: coverage.time_to_complete_h,
        fuel_rate_l_per_h: cost.fuel_rate_l_per_h,
        fuel_consumed_l: cost.fuel_consumed_l,
        fuel_per_ha_l: cost.fuel_consumed_l / params.area_ha(),
        fuel_cost: cost.fuel_cost,
        labor_cost: cost.labor_cost,
        total_cost: cost.total_cost,
        cost_per_ha: cost.total_cost / params.area_ha(),
        tractors_required,
        fleet_completion_h: coverage.time_to_complete_h / tractors_required as f64,
    })
}
