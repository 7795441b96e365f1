//! # Tractor Count Model
//!
//! Capacity planning: how many tractors, each covering `coverage_rate`
//! hectares per hour, finish `area_ha` inside the time budget. Tractors are
//! treated as independent and their coverage as additive.

use crate::error::ModelError;

/// Counts at or above this are not exactly representable as `f64`, so the
/// estimate is returned as is.
const EXACT_COUNT_LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53

/// Smallest `n >= 1` with `area_ha <= n * coverage_rate_ha_per_h * time_budget_h`.
///
/// Very slow speeds give very large counts; they are still valid answers and
/// saturate at `u64::MAX` instead of failing.
pub fn tractors_required(
    area_ha: f64,
    coverage_rate_ha_per_h: f64,
    time_budget_h: f64,
) -> Result<u64, ModelError> {
    if !time_budget_h.is_finite() || time_budget_h <= 0.0 {
        return Err(ModelError::InvalidBudget { time_budget_h });
    }
    if !area_ha.is_finite() || area_ha <= 0.0 {
        return Err(ModelError::parameter(
            "area_ha",
            format!("{area_ha} must be a finite value above zero"),
        ));
    }
    if !coverage_rate_ha_per_h.is_finite() || coverage_rate_ha_per_h <= 0.0 {
        return Err(ModelError::parameter(
            "coverage_rate_ha_per_h",
            format!("{coverage_rate_ha_per_h} must be a finite value above zero"),
        ));
    }

    let capacity_per_tractor = coverage_rate_ha_per_h * time_budget_h;
    let estimate = (area_ha / capacity_per_tractor).ceil().max(1.0);
    if estimate >= EXACT_COUNT_LIMIT {
        // `as` saturates, including the infinite quotient of an underflowed capacity
        return Ok(estimate as u64);
    }

    // The division and the multiplication in the invariant round differently;
    // walk the estimate until the invariant holds in f64 arithmetic.
    let mut count = estimate as u64;
    while count > 1 && area_ha <= (count - 1) as f64 * capacity_per_tractor {
        count -= 1;
    }
    while area_ha > count as f64 * capacity_per_tractor {
        count += 1;
    }
    Ok(count)
}
