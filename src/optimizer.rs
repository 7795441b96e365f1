//! # Optimal Speed Search
//!
//! Bounded grid search for the cheapest working speed that still finishes the
//! field inside the time budget.
//!
//! The fuel-rate curve is arbitrary (measured points, presets, polynomials)
//! and may be non-convex, so no closed-form minimum is assumed. Instead:
//!
//! 1. Split `[speed_min, speed_max]` into `sample_count` evenly spaced speeds,
//!    both ends included ([`SpeedGrid`])
//! 2. Evaluate every speed
//! 3. Drop speeds whose single-tractor completion time exceeds the budget
//! 4. Keep the cheapest remaining speed; near-equal costs go to the lower speed
//!
//! [`crate::curves::CurveGenerator`] walks the same grid, so a plotted optimum
//! marker always sits on a plotted sample.

use serde::Serialize;
use tracing::debug;

use crate::coverage::minimum_speed_for_budget;
use crate::error::ModelError;
use crate::evaluate::evaluate;
use crate::params::UnitParameters;
use crate::OperationResult;

/// Samples used when no count is configured
pub const DEFAULT_SAMPLE_COUNT: usize = 301;

/// Costs closer than this (relative) count as a tie
pub const COST_TIE_TOLERANCE: f64 = 1e-9;

/// Evenly spaced speeds over a closed range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedGrid {
    min: f64,
    max: f64,
    count: usize,
}

impl SpeedGrid {
    pub fn new(min: f64, max: f64, count: usize) -> Result<Self, ModelError> {
        if count < 2 {
            return Err(ModelError::parameter(
                "sample_count",
                format!("{count} must be at least 2"),
            ));
        }
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min >= max {
            return Err(ModelError::parameter(
                "speed_min",
                format!("speed range {min}..={max} must be positive and increasing"),
            ));
        }
        Ok(SpeedGrid { min, max, count })
    }

    /// Grid spanning the speed range of `params`.
    pub fn for_params(params: &UnitParameters, count: usize) -> Result<Self, ModelError> {
        SpeedGrid::new(params.speed_min(), params.speed_max(), count)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Speed of sample `index`; the last index lands exactly on `max`.
    pub fn speed_at(&self, index: usize) -> f64 {
        if index + 1 >= self.count {
            return self.max;
        }
        self.min + (self.max - self.min) * index as f64 / (self.count - 1) as f64
    }

    pub fn speeds(&self) -> impl Iterator<Item = f64> + Clone + '_ {
        (0..self.count).map(move |i| self.speed_at(i))
    }
}

/// Cheapest feasible sample together with search statistics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OptimalSpeed {
    pub result: OperationResult,
    pub samples_evaluated: usize,
    pub feasible_samples: usize,
}

/// Grid search configured with a sample count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptimalSpeedSearch {
    sample_count: usize,
}

impl Default for OptimalSpeedSearch {
    fn default() -> Self {
        OptimalSpeedSearch {
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl OptimalSpeedSearch {
    pub fn new(sample_count: usize) -> Result<Self, ModelError> {
        if sample_count < 2 {
            return Err(ModelError::parameter(
                "sample_count",
                format!("{sample_count} must be at least 2"),
            ));
        }
        Ok(OptimalSpeedSearch { sample_count })
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Find the cost-minimizing speed that meets the time budget.
    ///
    /// Fails with [`ModelError::Infeasible`] when every sample is too slow, and
    /// with any evaluation error (e.g. a negative fuel rate) as soon as it is hit.
    pub fn search(&self, params: &UnitParameters) -> Result<OptimalSpeed, ModelError> {
        let grid = SpeedGrid::for_params(params, self.sample_count)?;
        let budget = params.time_budget_h();

        let mut feasible = Vec::with_capacity(grid.len());
        for speed in grid.speeds() {
            let result = evaluate(params, speed)?;
            if result.time_to_complete_h <= budget {
                feasible.push(result);
            }
        }
        let feasible_samples = feasible.len();

        // Ties are measured from the overall minimum, not the running best
        let min_cost = feasible
            .iter()
            .map(|r| r.total_cost)
            .fold(f64::INFINITY, f64::min);
        let best = feasible
            .into_iter()
            .find(|r| within_tie_tolerance(r.total_cost, min_cost));

        let Some(result) = best else {
            let required_speed = minimum_speed_for_budget(
                params.area_ha(),
                params.width_m(),
                params.efficiency(),
                budget,
            );
            debug!(
                samples = grid.len(),
                required_speed, "no sampled speed meets the time budget"
            );
            return Err(ModelError::Infeasible {
                speed_min: params.speed_min(),
                speed_max: params.speed_max(),
                time_budget_h: budget,
                required_speed,
            });
        };

        debug!(
            samples = grid.len(),
            feasible = feasible_samples,
            speed = result.speed,
            total_cost = result.total_cost,
            "optimal speed selected"
        );

        Ok(OptimalSpeed {
            result,
            samples_evaluated: grid.len(),
            feasible_samples,
        })
    }
}

/// True when `cost` is no more than the tie tolerance above `min_cost`.
fn within_tie_tolerance(cost: f64, min_cost: f64) -> bool {
    cost - min_cost <= COST_TIE_TOLERANCE * min_cost.abs()
}
