//! # Field Operation Cost Model
//!
//! This library estimates the economics of a tractor field operation. Given
//! the field area, implement width, field efficiency, fuel and labor prices,
//! a fuel-rate curve and a time budget, it computes:
//!
//! - **Coverage**: hectares per hour and hours to finish at a given speed
//! - **Fuel and cost**: litres burned, fuel cost, labor cost and their total
//! - **Fleet size**: the fewest tractors that finish inside the time budget
//! - **Optimal speed**: the cheapest speed whose completion time fits the budget
//! - **Curves**: speed vs coverage and speed vs cost series for charting
//!
//! ## Design
//!
//! Every model call is a pure function of a validated [`params::UnitParameters`]
//! snapshot. There is no process-wide state; the only memory across calls is
//! the explicit, fully keyed [`plan::PlanCache`].
//!
//! ### Data Flow
//! 1. **Validate**: `ParameterInput` → [`params::UnitParameters`] (fails, never clamps)
//! 2. **Evaluate**: coverage → fuel/labor cost → tractor count ([`evaluate::evaluate`])
//! 3. **Search**: evaluate a fixed speed grid, keep the cheapest feasible sample
//! 4. **Plot**: re-walk the same grid to produce [`CurveSample`] series
//!
//! ## Core Types
//!
//! - [`OperationResult`]: every figure for one speed
//! - [`CurvePoint`]: one grid sample as seen by a chart
//! - [`CurveSample`]: the paired coverage and cost series

use serde::{Deserialize, Serialize};

pub mod advisor;
pub mod chart;
pub mod config;
pub mod coverage;
pub mod curves;
pub mod error;
pub mod evaluate;
pub mod fuel_cost;
pub mod fuel_curve;
pub mod optimizer;
pub mod params;
pub mod plan;
pub mod renderer;
pub mod report;
pub mod tractors;

pub use error::ModelError;
pub use params::{ParameterInput, UnitParameters};

/// All figures for running the operation at one speed.
///
/// Costs are in the currency of the configured fuel price and labor rate.
/// `fuel_consumed_l`, `fuel_cost`, `labor_cost` and `total_cost` cover the
/// whole field; they do not depend on how many tractors share the work.
///
/// # Example
/// ```
/// use field_cost_lib::{evaluate::evaluate, fuel_curve::FuelCurve, ParameterInput, UnitParameters};
///
/// let params = UnitParameters::try_from(ParameterInput {
///     area_ha: 10.0,
///     width_m: 3.0,
///     efficiency: 0.8,
///     fuel_price: 1.5,
///     fuel_curve: FuelCurve::linear(2.0, 0.1),
///     labor_rate: 0.0,
///     time_budget_h: 5.0,
///     speed_min: 4.0,
///     speed_max: 10.0,
/// })
/// .unwrap();
///
/// let result = evaluate(&params, 6.0).unwrap();
/// assert!((result.coverage_rate_ha_per_h - 1.44).abs() < 1e-9);
/// assert_eq!(result.tractors_required, 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Working speed (km/h)
    pub speed: f64,
    pub coverage_rate_ha_per_h: f64,
    /// Hours for a single tractor to finish the field
    pub time_to_complete_h: f64,
    pub fuel_rate_l_per_h: f64,
    pub fuel_consumed_l: f64,
    pub fuel_per_ha_l: f64,
    pub fuel_cost: f64,
    pub labor_cost: f64,
    /// Exactly `fuel_cost + labor_cost`
    pub total_cost: f64,
    pub cost_per_ha: f64,
    /// Fewest tractors that finish inside the time budget (at least 1)
    pub tractors_required: u64,
    /// Hours to finish when `tractors_required` tractors share the field
    pub fleet_completion_h: f64,
}

/// One evaluated grid speed, reduced to what the charts plot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub speed: f64,
    pub coverage_rate_ha_per_h: f64,
    pub total_cost: f64,
}

/// Paired chart series over the search grid, in ascending speed order.
///
/// # Example
/// ```
/// use field_cost_lib::CurveSample;
///
/// let sample = CurveSample {
///     coverage: vec![(4.0, 0.96), (5.0, 1.2)],
///     cost: vec![(4.0, 180.0), (5.0, 150.0)],
/// };
/// assert_eq!(sample.coverage.len(), sample.cost.len());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    /// `(speed km/h, coverage ha/h)` pairs
    pub coverage: Vec<(f64, f64)>,
    /// `(speed km/h, total cost)` pairs
    pub cost: Vec<(f64, f64)>,
}
