//! # Unit Parameters
//!
//! [`UnitParameters`] is the validated input snapshot every model call works
//! from. It is assembled from a plain [`ParameterInput`] and is immutable
//! afterwards: fields are private and only exposed through getters, so a
//! value that passed validation cannot drift out of range later.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::fuel_curve::FuelCurve;

/// Unvalidated parameter set, as read from configuration or a caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterInput {
    pub area_ha: f64,
    pub width_m: f64,
    pub efficiency: f64,
    pub fuel_price: f64,
    pub fuel_curve: FuelCurve,
    pub labor_rate: f64,
    pub time_budget_h: f64,
    pub speed_min: f64,
    pub speed_max: f64,
}

/// Validated, immutable operating parameters for one field operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnitParameters {
    area_ha: f64,
    width_m: f64,
    efficiency: f64,
    fuel_price: f64,
    fuel_curve: FuelCurve,
    labor_rate: f64,
    time_budget_h: f64,
    speed_min: f64,
    speed_max: f64,
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ModelError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ModelError::parameter(
            name,
            format!("{value} must be a finite value above zero"),
        ));
    }
    Ok(())
}

fn require_non_negative(name: &'static str, value: f64) -> Result<(), ModelError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ModelError::parameter(
            name,
            format!("{value} must be a finite value of zero or more"),
        ));
    }
    Ok(())
}

impl TryFrom<ParameterInput> for UnitParameters {
    type Error = ModelError;

    fn try_from(input: ParameterInput) -> Result<Self, Self::Error> {
        require_positive("area_ha", input.area_ha)?;
        require_positive("width_m", input.width_m)?;
        if !input.efficiency.is_finite() || input.efficiency <= 0.0 || input.efficiency > 1.0 {
            return Err(ModelError::parameter(
                "efficiency",
                format!("{} must lie in (0, 1]", input.efficiency),
            ));
        }
        require_non_negative("fuel_price", input.fuel_price)?;
        require_non_negative("labor_rate", input.labor_rate)?;
        if !input.time_budget_h.is_finite() || input.time_budget_h <= 0.0 {
            return Err(ModelError::InvalidBudget {
                time_budget_h: input.time_budget_h,
            });
        }
        require_positive("speed_min", input.speed_min)?;
        require_positive("speed_max", input.speed_max)?;
        if input.speed_min >= input.speed_max {
            return Err(ModelError::parameter(
                "speed_min",
                format!(
                    "{} must be below speed_max ({})",
                    input.speed_min, input.speed_max
                ),
            ));
        }
        input.fuel_curve.validate()?;

        Ok(UnitParameters {
            area_ha: input.area_ha,
            width_m: input.width_m,
            efficiency: input.efficiency,
            fuel_price: input.fuel_price,
            fuel_curve: input.fuel_curve,
            labor_rate: input.labor_rate,
            time_budget_h: input.time_budget_h,
            speed_min: input.speed_min,
            speed_max: input.speed_max,
        })
    }
}

impl UnitParameters {
    pub fn area_ha(&self) -> f64 {
        self.area_ha
    }

    pub fn width_m(&self) -> f64 {
        self.width_m
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    pub fn fuel_price(&self) -> f64 {
        self.fuel_price
    }

    pub fn fuel_curve(&self) -> &FuelCurve {
        &self.fuel_curve
    }

    pub fn labor_rate(&self) -> f64 {
        self.labor_rate
    }

    pub fn time_budget_h(&self) -> f64 {
        self.time_budget_h
    }

    pub fn speed_min(&self) -> f64 {
        self.speed_min
    }

    pub fn speed_max(&self) -> f64 {
        self.speed_max
    }

    /// Copy of the inputs, for building a modified parameter set.
    pub fn to_input(&self) -> ParameterInput {
        ParameterInput {
            area_ha: self.area_ha,
            width_m: self.width_m,
            efficiency: self.efficiency,
            fuel_price: self.fuel_price,
            fuel_curve: self.fuel_curve.clone(),
            labor_rate: self.labor_rate,
            time_budget_h: self.time_budget_h,
            speed_min: self.speed_min,
            speed_max: self.speed_max,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Field used across the model tests: 10 ha, 3 m implement at 80 %.
    pub(crate) fn sample_input() -> ParameterInput {
        ParameterInput {
            area_ha: 10.0,
            width_m: 3.0,
            efficiency: 0.8,
            fuel_price: 1.5,
            fuel_curve: FuelCurve::linear(2.0, 0.1),
            labor_rate: 12.0,
            time_budget_h: 5.0,
            speed_min: 4.0,
            speed_max: 10.0,
        }
    }

    pub(crate) fn sample_params() -> UnitParameters {
        UnitParameters::try_from(sample_input()).unwrap()
    }

    #[test]
    fn valid_input_is_accepted() {
        let params = sample_params();
        assert_eq!(params.area_ha(), 10.0);
        assert_eq!(params.speed_max(), 10.0);
        assert_eq!(params.to_input(), sample_input());
    }

    #[test]
    fn non_positive_area_is_rejected() {
        for area in [0.0, -3.0, f64::NAN] {
            let input = ParameterInput {
                area_ha: area,
                ..sample_input()
            };
            let err = UnitParameters::try_from(input).unwrap_err();
            assert!(
                matches!(err, ModelError::InvalidParameter { name: "area_ha", .. }),
                "area {area} gave {err:?}"
            );
        }
    }

    #[test]
    fn efficiency_must_be_in_unit_interval() {
        for efficiency in [0.0, 1.01, -0.5] {
            let input = ParameterInput {
                efficiency,
                ..sample_input()
            };
            assert!(UnitParameters::try_from(input).is_err());
        }
        let full = ParameterInput {
            efficiency: 1.0,
            ..sample_input()
        };
        assert!(UnitParameters::try_from(full).is_ok());
    }

    #[test]
    fn zero_budget_is_a_budget_error() {
        let input = ParameterInput {
            time_budget_h: 0.0,
            ..sample_input()
        };
        assert_eq!(
            UnitParameters::try_from(input).unwrap_err(),
            ModelError::InvalidBudget { time_budget_h: 0.0 }
        );
    }

    #[test]
    fn inverted_speed_range_is_rejected() {
        let input = ParameterInput {
            speed_min: 10.0,
            speed_max: 10.0,
            ..sample_input()
        };
        assert!(matches!(
            UnitParameters::try_from(input),
            Err(ModelError::InvalidParameter {
                name: "speed_min",
                ..
            })
        ));
    }

    #[test]
    fn negative_prices_are_rejected_but_zero_is_fine() {
        let negative = ParameterInput {
            fuel_price: -0.1,
            ..sample_input()
        };
        assert!(UnitParameters::try_from(negative).is_err());

        let free = ParameterInput {
            fuel_price: 0.0,
            labor_rate: 0.0,
            ..sample_input()
        };
        assert!(UnitParameters::try_from(free).is_ok());
    }
}
