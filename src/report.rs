//! # Plan Reports
//!
//! Text and JSON presentation of a [`Plan`]. The JSON form carries the full
//! plan including both curves; the text form shows the scalar results only.
//!
//! When the fuel curve comes from an [`Operation`] preset, each result is
//! compared with that operation's typical fuel use and recommended speeds.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write as _;

use crate::fuel_curve::{Operation, OperationProfile};
use crate::params::UnitParameters;
use crate::plan::Plan;
use crate::OperationResult;

/// A plan stamped with the inputs and the time it was computed.
#[derive(Clone, Debug, Serialize)]
pub struct Report<'a> {
    pub generated_at: DateTime<Local>,
    pub parameters: &'a UnitParameters,
    pub sample_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    pub plan: &'a Plan,
}

impl<'a> Report<'a> {
    pub fn new(parameters: &'a UnitParameters, sample_count: usize, plan: &'a Plan) -> Self {
        Self::at(Local::now(), parameters, sample_count, plan)
    }

    pub fn at(
        generated_at: DateTime<Local>,
        parameters: &'a UnitParameters,
        sample_count: usize,
        plan: &'a Plan,
    ) -> Self {
        Report {
            generated_at,
            parameters,
            sample_count,
            operation: None,
            plan,
        }
    }

    /// Compare results against the reference figures of `operation`.
    pub fn with_operation(mut self, operation: Option<Operation>) -> Self {
        self.operation = operation;
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let p = self.parameters;
        let profile = self.operation.map(Operation::profile);
        let mut out = String::new();

        let _ = writeln!(
            out,
            "Field operation plan ({})",
            self.generated_at.format("%Y-%m-%d %H:%M")
        );
        let _ = writeln!(
            out,
            "  Field {:.2} ha, implement {:.2} m at {:.0}% efficiency, budget {:.2} h",
            p.area_ha(),
            p.width_m(),
            p.efficiency() * 100.0,
            p.time_budget_h()
        );
        let _ = writeln!(
            out,
            "  Fuel {:.2}/l, labor {:.2}/h, speeds {:.1}-{:.1} km/h over {} samples",
            p.fuel_price(),
            p.labor_rate(),
            p.speed_min(),
            p.speed_max(),
            self.sample_count
        );
        if let Some(profile) = &profile {
            let (fuel_low, fuel_high) = profile.fuel_range_l_per_ha;
            let (speed_low, speed_high) = profile.speed_range_kmh;
            let _ = writeln!(
                out,
                "  {}: typical {fuel_low:.1}-{fuel_high:.1} l/ha, \
                 recommended {speed_low:.1}-{speed_high:.1} km/h",
                profile.label
            );
            let _ = writeln!(out, "  {}", profile.remarks);
        }

        let _ = writeln!(out);
        match &self.plan.optimum {
            Ok(optimum) => {
                let _ = writeln!(
                    out,
                    "Optimal speed ({} of {} samples meet the budget)",
                    optimum.feasible_samples, optimum.samples_evaluated
                );
                write_result(&mut out, &optimum.result, profile.as_ref());
            }
            Err(error) => {
                let _ = writeln!(out, "No optimal speed: {error}");
                let _ = writeln!(
                    out,
                    "  Try a longer time budget, a higher maximum speed or a wider implement."
                );
            }
        }

        if let Some(custom) = &self.plan.at_speed {
            let _ = writeln!(out);
            let _ = writeln!(out, "Custom speed analysis");
            write_result(&mut out, custom, profile.as_ref());
        }
        out
    }
}

fn write_result(out: &mut String, r: &OperationResult, profile: Option<&OperationProfile>) {
    let _ = writeln!(out, "  Speed            {:>12.2} km/h", r.speed);
    let _ = writeln!(out, "  Coverage         {:>12.3} ha/h", r.coverage_rate_ha_per_h);
    let _ = writeln!(out, "  Time (1 tractor) {:>12.2} h", r.time_to_complete_h);
    let _ = writeln!(out, "  Fuel rate        {:>12.2} l/h", r.fuel_rate_l_per_h);
    let _ = writeln!(
        out,
        "  Fuel used        {:>12.2} l ({:.2} l/ha)",
        r.fuel_consumed_l, r.fuel_per_ha_l
    );
    let _ = writeln!(out, "  Fuel cost        {:>12.2}", r.fuel_cost);
    let _ = writeln!(out, "  Labor cost       {:>12.2}", r.labor_cost);
    let _ = writeln!(
        out,
        "  Total cost       {:>12.2} ({:.2}/ha)",
        r.total_cost, r.cost_per_ha
    );
    let _ = writeln!(
        out,
        "  Tractors needed  {:>12} (fleet finishes in {:.2} h)",
        r.tractors_required, r.fleet_completion_h
    );

    if let Some(profile) = profile {
        let (fuel_low, fuel_high) = profile.fuel_range_l_per_ha;
        let (speed_low, speed_high) = profile.speed_range_kmh;
        let _ = writeln!(
            out,
            "  Fuel vs typical  {:>12.1} l/ha ({} {fuel_low:.1}-{fuel_high:.1} l/ha)",
            r.fuel_per_ha_l,
            profile.fuel_position(r.fuel_per_ha_l)
        );
        let _ = writeln!(
            out,
            "  Speed vs advice  {:>12.1} km/h ({} {speed_low:.1}-{speed_high:.1} km/h)",
            r.speed,
            profile.speed_position(r.speed)
        );
    }
}

/// Reference figures for every operation preset, one row each.
pub fn operations_table() -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28} {:>11} {:>6} {:>9} {:>11}  Remarks",
        "Operation", "Fuel l/ha", "Base", "Ref km/h", "Speed km/h"
    );
    for operation in Operation::ALL {
        let profile = operation.profile();
        let (fuel_low, fuel_high) = profile.fuel_range_l_per_ha;
        let (speed_low, speed_high) = profile.speed_range_kmh;
        let _ = writeln!(
            out,
            "{:<28} {:>11} {:>6.1} {:>9.1} {:>11}  {}",
            profile.label,
            format!("{fuel_low:.0}-{fuel_high:.0}"),
            profile.base_l_per_ha,
            profile.reference_speed_kmh,
            format!("{speed_low:.0}-{speed_high:.0}"),
            profile.remarks
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel_curve::FuelCurve;
    use crate::params::tests::sample_input;
    use crate::params::ParameterInput;
    use chrono::TimeZone;

    fn fixture() -> (UnitParameters, Plan) {
        let params = UnitParameters::try_from(ParameterInput {
            time_budget_h: 20.0,
            ..sample_input()
        })
        .unwrap();
        let plan = Plan::build(&params, 7, Some(6.0)).unwrap();
        (params, plan)
    }

    #[test]
    fn text_report_lists_optimum_and_custom_speed() {
        let (params, plan) = fixture();
        let stamp = Local.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        let text = Report::at(stamp, &params, 7, &plan).to_text();

        assert!(text.contains("2025-03-14 09:30"));
        assert!(text.contains("Optimal speed (7 of 7 samples meet the budget)"));
        assert!(text.contains("Custom speed analysis"));
        assert!(text.contains("1.440 ha/h"));
        assert!(!text.contains("Fuel vs typical"));
    }

    #[test]
    fn json_report_contains_curves() {
        let (params, plan) = fixture();
        let json = Report::new(&params, 7, &plan).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["sample_count"], 7);
        assert_eq!(value["plan"]["curves"]["cost"].as_array().unwrap().len(), 7);
        assert_eq!(value["parameters"]["area_ha"], 10.0);
        assert_eq!(value["plan"]["at_speed"]["tractors_required"], 1);
        assert!(value.get("operation").is_none());
    }

    #[test]
    fn infeasible_report_still_shows_custom_speed() {
        let params = UnitParameters::try_from(ParameterInput {
            area_ha: 20.0,
            time_budget_h: 3.0,
            ..sample_input()
        })
        .unwrap();
        let plan = Plan::build(&params, 7, Some(6.0)).unwrap();
        let text = Report::new(&params, 7, &plan).to_text();

        assert!(text.contains("No optimal speed: no speed in 4..=10 km/h"));
        assert!(text.contains("Custom speed analysis"));
        assert!(text.contains("Tractors needed             5"));
    }

    #[test]
    fn operation_preset_adds_reference_comparison() {
        let params = UnitParameters::try_from(ParameterInput {
            fuel_curve: FuelCurve::for_operation(Operation::Ploughing, 3.0, 0.8),
            time_budget_h: 20.0,
            ..sample_input()
        })
        .unwrap();
        let plan = Plan::build(&params, 7, Some(6.0)).unwrap();
        let report = Report::new(&params, 7, &plan).with_operation(Some(Operation::Ploughing));
        let text = report.to_text();

        assert!(text.contains("Ploughing (moldboard/disc): typical 25.0-45.0 l/ha"));
        assert!(text.contains("Deep tillage"));
        // 35 l/ha * (6 / 5)^1.5 = 46 l/ha, above the typical range
        assert!(text.contains("46.0 l/ha (above 25.0-45.0 l/ha)"));
        assert!(text.contains("6.0 km/h (within 4.0-6.0 km/h)"));

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["operation"], "ploughing");
    }

    #[test]
    fn operations_table_lists_every_preset() {
        let table = operations_table();
        assert_eq!(table.lines().count(), Operation::ALL.len() + 1);
        assert!(table.contains("Transport (field to yard)"));
        assert!(table.contains("Slower speeds maintain threshing efficiency"));
        assert!(table.contains("25-45"));
    }
}
