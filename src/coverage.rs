//! # Coverage Model
//!
//! Converts working speed and implement geometry into an area coverage rate
//! and the time one tractor needs to finish the field.
//!
//! `coverage (ha/h) = speed (km/h) * 1000 * width (m) * efficiency / 10_000`

use crate::error::ModelError;
use crate::params::UnitParameters;

/// Square metres per hectare
const M2_PER_HA: f64 = 10_000.0;
/// Metres per kilometre
const M_PER_KM: f64 = 1_000.0;

/// Coverage figures for one tractor at one speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coverage {
    pub speed_kmh: f64,
    pub rate_ha_per_h: f64,
    pub time_to_complete_h: f64,
}

/// Effective area covered per hour.
pub fn coverage_rate(speed_kmh: f64, width_m: f64, efficiency: f64) -> Result<f64, ModelError> {
    if !speed_kmh.is_finite() || speed_kmh <= 0.0 {
        return Err(ModelError::InvalidSpeed { speed: speed_kmh });
    }
    Ok(speed_kmh * M_PER_KM * width_m * efficiency / M2_PER_HA)
}

/// Coverage rate and completion time for the field described by `params`.
pub fn evaluate(params: &UnitParameters, speed_kmh: f64) -> Result<Coverage, ModelError> {
    let rate_ha_per_h = coverage_rate(speed_kmh, params.width_m(), params.efficiency())?;
    Ok(Coverage {
        speed_kmh,
        rate_ha_per_h,
        time_to_complete_h: params.area_ha() / rate_ha_per_h,
    })
}

/// Lowest speed at which one tractor finishes `area_ha` within `time_budget_h`.
pub fn minimum_speed_for_budget(
    area_ha: f64,
    width_m: f64,
    efficiency: f64,
    time_budget_h: f64,
) -> f64 {
    area_ha * M2_PER_HA / (time_budget_h * M_PER_KM * width_m * efficiency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::tests::sample_params;
    use approx::assert_relative_eq;

    #[test]
    fn reference_field_at_six_kmh() {
        let coverage = evaluate(&sample_params(), 6.0).unwrap();
        assert_relative_eq!(coverage.rate_ha_per_h, 1.44, epsilon = 1e-12);
        assert_relative_eq!(coverage.time_to_complete_h, 6.944, epsilon = 1e-3);
    }

    #[test]
    fn rate_strictly_increases_with_speed() {
        let mut previous = 0.0;
        for step in 1..=200 {
            let rate = coverage_rate(step as f64 * 0.1, 2.5, 0.7).unwrap();
            assert!(rate > previous);
            previous = rate;
        }
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        for speed in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let err = coverage_rate(speed, 3.0, 0.8).unwrap_err();
            assert!(matches!(err, ModelError::InvalidSpeed { .. }));
        }
    }

    #[test]
    fn minimum_speed_meets_budget_exactly() {
        let speed = minimum_speed_for_budget(20.0, 3.0, 0.8, 3.0);
        assert_relative_eq!(speed, 27.777_777, epsilon = 1e-5);
        let rate = coverage_rate(speed, 3.0, 0.8).unwrap();
        assert_relative_eq!(20.0 / rate, 3.0, epsilon = 1e-9);
    }
}
