//! # Fuel-Rate Curves
//!
//! The cost model never derives fuel use internally. It is handed a
//! [`FuelCurve`] that maps working speed (km/h) to consumption (l/h), and
//! checks what the curve returns at every speed it evaluates.
//!
//! Three shapes are supported:
//! - **Polynomial**: `c0 + c1*v + c2*v^2 + ...`
//! - **Piecewise**: linear interpolation through measured `(speed, l/h)`
//!   points, held flat outside the measured range
//! - **Per hectare**: a reference consumption in l/ha scaled by
//!   `(v / v_ref)^exponent`, converted to l/h through the coverage rate.
//!   The [`Operation`] presets produce this shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ModelError;

/// Speed exponent used by the operation presets (rolling/draft resistance)
pub const PRESET_SPEED_EXPONENT: f64 = 1.5;

/// Fuel consumption as a function of working speed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FuelCurve {
    /// Coefficients in ascending order of power
    Polynomial { coefficients: Vec<f64> },
    /// `(speed_kmh, l_per_h)` points with strictly increasing speeds
    Piecewise { points: Vec<(f64, f64)> },
    /// Per-hectare consumption scaled with speed and converted to l/h
    PerHectare {
        base_l_per_ha: f64,
        reference_speed_kmh: f64,
        exponent: f64,
        /// Hectares covered per hour for each km/h of speed
        ha_per_h_per_kmh: f64,
    },
}

impl FuelCurve {
    /// Straight line `intercept + slope * v`.
    pub fn linear(intercept_l_per_h: f64, slope: f64) -> Self {
        FuelCurve::Polynomial {
            coefficients: vec![intercept_l_per_h, slope],
        }
    }

    /// Curve for a preset operation run with the given implement.
    pub fn for_operation(operation: Operation, width_m: f64, efficiency: f64) -> Self {
        let profile = operation.profile();
        FuelCurve::PerHectare {
            base_l_per_ha: profile.base_l_per_ha,
            reference_speed_kmh: profile.reference_speed_kmh,
            exponent: PRESET_SPEED_EXPONENT,
            ha_per_h_per_kmh: width_m * efficiency / 10.0,
        }
    }

    /// Fuel consumption in l/h at `speed_kmh`.
    ///
    /// The value is returned as computed. Range checks happen in
    /// [`FuelCurve::checked_rate`].
    pub fn rate_l_per_h(&self, speed_kmh: f64) -> f64 {
        match self {
            FuelCurve::Polynomial { coefficients } => coefficients
                .iter()
                .rev()
                .fold(0.0, |acc, c| acc * speed_kmh + c),
            FuelCurve::Piecewise { points } => interpolate(points, speed_kmh),
            FuelCurve::PerHectare {
                base_l_per_ha,
                reference_speed_kmh,
                exponent,
                ha_per_h_per_kmh,
            } => {
                let l_per_ha = base_l_per_ha * (speed_kmh / reference_speed_kmh).powf(*exponent);
                l_per_ha * speed_kmh * ha_per_h_per_kmh
            }
        }
    }

    /// Fuel consumption at `speed_kmh`, rejecting negative or non-finite rates.
    pub fn checked_rate(&self, speed_kmh: f64) -> Result<f64, ModelError> {
        let rate = self.rate_l_per_h(speed_kmh);
        if !rate.is_finite() || rate < 0.0 {
            return Err(ModelError::InvalidFuelCurve {
                speed: speed_kmh,
                rate_l_per_h: rate,
            });
        }
        Ok(rate)
    }

    /// Structural checks run when parameters are assembled.
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        match self {
            FuelCurve::Polynomial { coefficients } => {
                if coefficients.is_empty() {
                    return Err(ModelError::parameter(
                        "fuel_curve",
                        "polynomial needs at least one coefficient",
                    ));
                }
                if coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ModelError::parameter(
                        "fuel_curve",
                        "polynomial coefficients must be finite",
                    ));
                }
            }
            FuelCurve::Piecewise { points } => {
                if points.is_empty() {
                    return Err(ModelError::parameter(
                        "fuel_curve",
                        "piecewise curve needs at least one point",
                    ));
                }
                if points.iter().any(|(s, r)| !s.is_finite() || !r.is_finite()) {
                    return Err(ModelError::parameter(
                        "fuel_curve",
                        "piecewise points must be finite",
                    ));
                }
                if points.windows(2).any(|w| w[1].0 <= w[0].0) {
                    return Err(ModelError::parameter(
                        "fuel_curve",
                        "piecewise speeds must be strictly increasing",
                    ));
                }
            }
            FuelCurve::PerHectare {
                base_l_per_ha,
                reference_speed_kmh,
                exponent,
                ha_per_h_per_kmh,
            } => {
                let all_positive = [*base_l_per_ha, *reference_speed_kmh, *ha_per_h_per_kmh]
                    .iter()
                    .all(|v| v.is_finite() && *v > 0.0);
                if !all_positive || !exponent.is_finite() {
                    return Err(ModelError::parameter(
                        "fuel_curve",
                        "per-hectare curve needs finite positive base, speed and coverage",
                    ));
                }
            }
        }
        Ok(())
    }
}

fn interpolate(points: &[(f64, f64)], speed: f64) -> f64 {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return f64::NAN,
    };
    if speed <= first.0 {
        return first.1;
    }
    if speed >= last.0 {
        return last.1;
    }
    points
        .windows(2)
        .find(|w| w[0].0 <= speed && speed <= w[1].0)
        .map(|w| {
            let alpha = (speed - w[0].0) / (w[1].0 - w[0].0);
            w[0].1 + alpha * (w[1].1 - w[0].1)
        })
        .unwrap_or(last.1)
}

/// Field operations with published fuel-use reference figures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Ploughing,
    Harrowing,
    Rotavating,
    Ridging,
    Planting,
    Spraying,
    FertilizerSpreading,
    Harvesting,
    Transport,
}

/// Reference fuel figures for an [`Operation`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperationProfile {
    pub label: &'static str,
    /// Typical consumption at the reference speed
    pub base_l_per_ha: f64,
    /// Observed consumption range (l/ha)
    pub fuel_range_l_per_ha: (f64, f64),
    pub reference_speed_kmh: f64,
    /// Recommended working speed range (km/h)
    pub speed_range_kmh: (f64, f64),
    pub remarks: &'static str,
}

/// Where a value falls relative to a reference range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangePosition {
    Below,
    Within,
    Above,
}

impl RangePosition {
    fn of(value: f64, (low, high): (f64, f64)) -> Self {
        if value < low {
            RangePosition::Below
        } else if value > high {
            RangePosition::Above
        } else {
            RangePosition::Within
        }
    }
}

impl fmt::Display for RangePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangePosition::Below => "below",
            RangePosition::Within => "within",
            RangePosition::Above => "above",
        })
    }
}

impl OperationProfile {
    /// Compare a computed fuel use (l/ha) with the typical range.
    pub fn fuel_position(&self, fuel_per_ha_l: f64) -> RangePosition {
        RangePosition::of(fuel_per_ha_l, self.fuel_range_l_per_ha)
    }

    /// Compare a working speed with the recommended range.
    pub fn speed_position(&self, speed_kmh: f64) -> RangePosition {
        RangePosition::of(speed_kmh, self.speed_range_kmh)
    }
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Ploughing,
        Operation::Harrowing,
        Operation::Rotavating,
        Operation::Ridging,
        Operation::Planting,
        Operation::Spraying,
        Operation::FertilizerSpreading,
        Operation::Harvesting,
        Operation::Transport,
    ];

    pub fn profile(self) -> OperationProfile {
        match self {
            Operation::Ploughing => OperationProfile {
                label: "Ploughing (moldboard/disc)",
                base_l_per_ha: 35.0,
                fuel_range_l_per_ha: (25.0, 45.0),
                reference_speed_kmh: 5.0,
                speed_range_kmh: (4.0, 6.0),
                remarks: "Deep tillage; slower speeds reduce slippage and wear.",
            },
            Operation::Harrowing => OperationProfile {
                label: "Harrowing (disc/tine)",
                base_l_per_ha: 15.0,
                fuel_range_l_per_ha: (10.0, 20.0),
                reference_speed_kmh: 7.0,
                speed_range_kmh: (6.0, 8.0),
                remarks: "Second pass after ploughing; moderate depth.",
            },
            Operation::Rotavating => OperationProfile {
                label: "Rotary tillage",
                base_l_per_ha: 27.5,
                fuel_range_l_per_ha: (20.0, 35.0),
                reference_speed_kmh: 4.0,
                speed_range_kmh: (3.0, 5.0),
                remarks: "High PTO load; speed kept low for effective soil pulverization.",
            },
            Operation::Ridging => OperationProfile {
                label: "Ridging/bed forming",
                base_l_per_ha: 15.0,
                fuel_range_l_per_ha: (10.0, 20.0),
                reference_speed_kmh: 6.0,
                speed_range_kmh: (5.0, 7.0),
                remarks: "Depends on ridge height and implement width.",
            },
            Operation::Planting => OperationProfile {
                label: "Planting/seeding",
                base_l_per_ha: 5.5,
                fuel_range_l_per_ha: (3.0, 8.0),
                reference_speed_kmh: 5.0,
                speed_range_kmh: (4.0, 6.0),
                remarks: "Controlled, uniform seed placement.",
            },
            Operation::Spraying => OperationProfile {
                label: "Spraying",
                base_l_per_ha: 2.0,
                fuel_range_l_per_ha: (1.0, 3.0),
                reference_speed_kmh: 8.0,
                speed_range_kmh: (6.0, 10.0),
                remarks: "High speed possible; low drawbar load.",
            },
            Operation::FertilizerSpreading => OperationProfile {
                label: "Fertilizer spreading",
                base_l_per_ha: 2.0,
                fuel_range_l_per_ha: (1.0, 3.0),
                reference_speed_kmh: 10.0,
                speed_range_kmh: (8.0, 12.0),
                remarks: "Uniform distribution; wide swath width increases efficiency.",
            },
            Operation::Harvesting => OperationProfile {
                label: "Harvesting (combine)",
                base_l_per_ha: 22.5,
                fuel_range_l_per_ha: (15.0, 30.0),
                reference_speed_kmh: 4.5,
                speed_range_kmh: (3.0, 6.0),
                remarks: "Slower speeds maintain threshing efficiency and reduce grain loss.",
            },
            Operation::Transport => OperationProfile {
                label: "Transport (field to yard)",
                base_l_per_ha: 12.5,
                fuel_range_l_per_ha: (5.0, 20.0),
                reference_speed_kmh: 15.0,
                speed_range_kmh: (10.0, 20.0),
                remarks: "Depends on load, terrain, and road condition.",
            },
        }
    }
}
