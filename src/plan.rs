//! # Plans and the Plan Cache
//!
//! A [`Plan`] bundles everything a front end shows for one parameter set: the
//! optimal speed (or why there is none), an optional custom-speed analysis,
//! and both curves.
//!
//! An infeasible speed range is part of the plan, not a failure of it: the
//! custom-speed analysis still answers how many tractors a given speed needs.
//! Any other model error fails the build.
//!
//! [`PlanCache`] remembers the most recent plan together with the complete
//! key it was built from (parameters, sample count, custom speed). Any
//! difference in the key rebuilds the plan; failed builds are never stored.

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::curves::CurveGenerator;
use crate::error::ModelError;
use crate::evaluate::evaluate;
use crate::optimizer::{OptimalSpeed, OptimalSpeedSearch};
use crate::params::UnitParameters;
use crate::{CurveSample, OperationResult};

/// Results for one parameter set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Plan {
    /// Cheapest feasible speed; always `ModelError::Infeasible` when absent
    #[serde(serialize_with = "serialize_optimum")]
    pub optimum: Result<OptimalSpeed, ModelError>,
    /// Evaluation at a caller-chosen speed, if one was requested
    pub at_speed: Option<OperationResult>,
    pub curves: CurveSample,
}

impl Plan {
    /// Compute a plan from scratch.
    pub fn build(
        params: &UnitParameters,
        sample_count: usize,
        custom_speed: Option<f64>,
    ) -> Result<Self, ModelError> {
        let search = OptimalSpeedSearch::new(sample_count)?;
        let optimum = match search.search(params) {
            Ok(found) => Ok(found),
            Err(error @ ModelError::Infeasible { .. }) => {
                debug!(%error, "no feasible speed in range");
                Err(error)
            }
            Err(error) => return Err(error),
        };
        let at_speed = custom_speed
            .map(|speed| evaluate(params, speed))
            .transpose()?;
        let curves = CurveGenerator::new(params, sample_count)?.sample()?;

        Ok(Plan {
            optimum,
            at_speed,
            curves,
        })
    }

    /// Result at the optimal speed, if the range has one.
    pub fn optimum_result(&self) -> Option<&OperationResult> {
        self.optimum.as_ref().ok().map(|found| &found.result)
    }

    pub fn optimum_speed(&self) -> Option<f64> {
        self.optimum_result().map(|result| result.speed)
    }
}

#[derive(Serialize)]
struct OptimumError<'a> {
    error: &'a ModelError,
    message: String,
}

/// Found optimum as is; a missing one as the error and its message.
fn serialize_optimum<S: Serializer>(
    optimum: &Result<OptimalSpeed, ModelError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match optimum {
        Ok(found) => found.serialize(serializer),
        Err(error) => OptimumError {
            error,
            message: error.to_string(),
        }
        .serialize(serializer),
    }
}

#[derive(Clone, Debug, PartialEq)]
struct PlanKey {
    params: UnitParameters,
    sample_count: usize,
    custom_speed: Option<f64>,
}

/// Single-entry memo of the last computed plan.
#[derive(Debug, Default)]
pub struct PlanCache {
    entry: Option<(PlanKey, Plan)>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan for the given inputs, reusing the stored one when the key matches.
    pub fn plan(
        &mut self,
        params: &UnitParameters,
        sample_count: usize,
        custom_speed: Option<f64>,
    ) -> Result<&Plan, ModelError> {
        let key = PlanKey {
            params: params.clone(),
            sample_count,
            custom_speed,
        };

        // The old entry is taken out first, so a failed build leaves the cache empty.
        let entry = match self.entry.take() {
            Some((stored, plan)) if stored == key => {
                debug!("plan cache hit");
                (stored, plan)
            }
            _ => {
                let plan = Plan::build(params, sample_count, custom_speed)?;
                (key, plan)
            }
        };

        let (_, plan) = self.entry.insert(entry);
        Ok(&*plan)
    }

    /// True when a plan for exactly these inputs is stored.
    pub fn contains(
        &self,
        params: &UnitParameters,
        sample_count: usize,
        custom_speed: Option<f64>,
    ) -> bool {
        matches!(&self.entry, Some((key, _))
            if key.params == *params
                && key.sample_count == sample_count
                && key.custom_speed == custom_speed)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
