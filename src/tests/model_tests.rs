//! # End-to-End Tests for the Field Cost Model
//!
//! Exercises the public library API the way the binary does: configuration
//! in, validated parameters, search, curves and reports out. The reference
//! scenarios use a 10 ha field worked with a 3 m implement at 80 % efficiency.

use approx::assert_relative_eq;
use std::fs;
use tempfile::NamedTempFile;

use field_cost_lib::config::{Config, FuelCurveConfig};
use field_cost_lib::coverage;
use field_cost_lib::curves::CurveGenerator;
use field_cost_lib::evaluate::evaluate;
use field_cost_lib::fuel_curve::{FuelCurve, Operation};
use field_cost_lib::optimizer::{OptimalSpeedSearch, SpeedGrid};
use field_cost_lib::plan::{Plan, PlanCache};
use field_cost_lib::report::Report;
use field_cost_lib::tractors::tractors_required;
use field_cost_lib::{chart, renderer, ModelError, ParameterInput, UnitParameters};

fn reference_input() -> ParameterInput {
    ParameterInput {
        area_ha: 10.0,
        width_m: 3.0,
        efficiency: 0.8,
        fuel_price: 1.5,
        fuel_curve: FuelCurve::linear(2.0, 0.1),
        labor_rate: 0.0,
        time_budget_h: 5.0,
        speed_min: 4.0,
        speed_max: 10.0,
    }
}

fn reference_params() -> UnitParameters {
    UnitParameters::try_from(reference_input()).expect("reference parameters are valid")
}

/// 6 km/h on the reference field: 1.44 ha/h and just under 7 hours.
#[test]
fn coverage_reference_scenario() {
    let cov = coverage::evaluate(&reference_params(), 6.0).unwrap();
    assert_relative_eq!(cov.rate_ha_per_h, 1.44, epsilon = 1e-12);
    assert_relative_eq!(cov.time_to_complete_h, 10.0 / 1.44, epsilon = 1e-12);
}

/// A 5 hour budget at 6 km/h needs two tractors.
#[test]
fn tractor_count_reference_scenario() {
    let result = evaluate(&reference_params(), 6.0).unwrap();
    assert_eq!(result.tractors_required, 2);
    assert_eq!(tractors_required(10.0, 1.44, 5.0).unwrap(), 2);
}

/// Linear 2 + 0.1 v curve at 6 km/h with fuel at 1.5.
#[test]
fn fuel_reference_scenario() {
    let result = evaluate(&reference_params(), 6.0).unwrap();
    assert_relative_eq!(result.fuel_rate_l_per_h, 2.6, epsilon = 1e-12);
    assert_relative_eq!(result.fuel_consumed_l, 18.06, epsilon = 1e-2);
    assert_relative_eq!(result.fuel_cost, 27.09, epsilon = 1e-2);
}

/// 20 ha in 3 hours needs about 27.8 km/h, far above the 10 km/h cap.
#[test]
fn infeasible_reference_scenario() {
    let params = UnitParameters::try_from(ParameterInput {
        area_ha: 20.0,
        time_budget_h: 3.0,
        ..reference_input()
    })
    .unwrap();

    let err = OptimalSpeedSearch::new(7).unwrap().search(&params).unwrap_err();
    let ModelError::Infeasible { required_speed, .. } = err else {
        panic!("expected Infeasible, got {err:?}");
    };
    assert!(required_speed > 27.7 && required_speed < 27.8);
}

#[test]
fn coverage_is_strictly_increasing_across_parameter_sets() {
    for width in [0.5, 1.8, 3.0, 12.0] {
        for efficiency in [0.5, 0.75, 1.0] {
            let params = UnitParameters::try_from(ParameterInput {
                width_m: width,
                efficiency,
                ..reference_input()
            })
            .unwrap();
            let grid = SpeedGrid::for_params(&params, 40).unwrap();
            let rates: Vec<f64> = grid
                .speeds()
                .map(|s| coverage::evaluate(&params, s).unwrap().rate_ha_per_h)
                .collect();
            assert!(rates.windows(2).all(|w| w[1] > w[0]));
        }
    }
}

#[test]
fn results_hold_invariants_for_every_operation_preset() {
    for op in Operation::ALL {
        for budget in [1.0, 4.0, 9.0] {
            let params = UnitParameters::try_from(ParameterInput {
                fuel_curve: FuelCurve::for_operation(op, 3.0, 0.8),
                labor_rate: 25.0,
                time_budget_h: budget,
                ..reference_input()
            })
            .unwrap();
            for speed in SpeedGrid::for_params(&params, 13).unwrap().speeds() {
                let r = evaluate(&params, speed).unwrap();
                assert_eq!(r.total_cost, r.fuel_cost + r.labor_cost);
                assert!(r.fuel_cost >= 0.0 && r.labor_cost >= 0.0);
                assert!(r.tractors_required >= 1);
                let n = r.tractors_required as f64;
                assert!(params.area_ha() <= n * r.coverage_rate_ha_per_h * budget);
                if r.tractors_required > 1 {
                    assert!(params.area_ha() > (n - 1.0) * r.coverage_rate_ha_per_h * budget);
                }
            }
        }
    }
}

/// With a per-hectare power-law curve fuel rises with speed while labor
/// falls, so the cheapest speed sits inside the range.
#[test]
fn preset_curve_with_labor_has_interior_optimum() {
    let params = UnitParameters::try_from(ParameterInput {
        fuel_curve: FuelCurve::for_operation(Operation::Ploughing, 3.0, 0.8),
        fuel_price: 1.0,
        labor_rate: 60.0,
        time_budget_h: 20.0,
        speed_min: 2.0,
        speed_max: 15.0,
        ..reference_input()
    })
    .unwrap();
    let found = OptimalSpeedSearch::new(131).unwrap().search(&params).unwrap();
    assert!(found.result.speed > 2.0 && found.result.speed < 15.0);
    assert!(found.result.time_to_complete_h <= 20.0);
}

#[test]
fn curves_and_search_share_the_grid() {
    let params = UnitParameters::try_from(ParameterInput {
        time_budget_h: 30.0,
        ..reference_input()
    })
    .unwrap();
    let generator = CurveGenerator::new(&params, 31).unwrap();
    let found = OptimalSpeedSearch::new(31).unwrap().search(&params).unwrap();
    let speeds: Vec<f64> = generator.points().map(|p| p.unwrap().speed).collect();
    assert!(speeds.contains(&found.result.speed));
    assert_eq!(speeds, generator.grid().speeds().collect::<Vec<_>>());
}

#[test]
fn config_file_drives_a_full_plan() {
    let file = NamedTempFile::new().unwrap();
    let mut config = Config::default();
    config.field.area_ha = 10.0;
    config.implement.width_m = 3.0;
    config.implement.efficiency = 0.8;
    config.costs.fuel_price = 1.5;
    config.costs.labor_rate = 0.0;
    config.schedule.time_budget_h = 5.0;
    config.speed.min_kmh = 4.0;
    config.speed.max_kmh = 10.0;
    config.speed.sample_count = 7;
    config.fuel_curve = FuelCurveConfig::Polynomial {
        coefficients: vec![2.0, 0.1],
    };
    config.save(file.path()).unwrap();

    let loaded = Config::load_from_path(file.path()).unwrap();
    let params = loaded.to_parameters().unwrap();
    assert_eq!(params, reference_params());

    let mut cache = PlanCache::new();
    let plan = cache.plan(&params, loaded.speed.sample_count, Some(6.0)).unwrap();
    assert_eq!(plan.at_speed.unwrap().tractors_required, 2);
    // only 9 and 10 km/h finish within 5 h; fuel per hectare falls with speed
    let optimum = plan.optimum.as_ref().unwrap();
    assert_eq!(optimum.result.speed, 10.0);
    assert_eq!(optimum.feasible_samples, 2);

    let text = Report::new(&params, 7, plan).to_text();
    assert!(text.contains("Tractors needed"));
}

/// Without a feasible speed the fleet-size answer for a chosen speed stands.
#[test]
fn infeasible_range_still_answers_custom_speed() {
    let params = UnitParameters::try_from(ParameterInput {
        area_ha: 20.0,
        time_budget_h: 3.0,
        ..reference_input()
    })
    .unwrap();
    let mut cache = PlanCache::new();
    let plan = cache.plan(&params, 7, Some(6.0)).unwrap();

    assert!(matches!(plan.optimum, Err(ModelError::Infeasible { .. })));
    let custom = plan.at_speed.unwrap();
    assert_eq!(custom.tractors_required, 5);
    assert_eq!(custom, evaluate(&params, 6.0).unwrap());

    let text = Report::new(&params, 7, plan).to_text();
    assert!(text.contains("No optimal speed"));
    assert!(text.contains("Custom speed analysis"));
}

/// A crawling lower bound gives astronomical fleet sizes at the slow end of
/// the grid; the search still returns the optimum at the fast end.
#[test]
fn crawling_speed_range_still_finds_optimum() {
    let params = UnitParameters::try_from(ParameterInput {
        area_ha: 100_000.0,
        width_m: 1.0,
        efficiency: 0.5,
        time_budget_h: 200_000.0,
        speed_min: 1e-9,
        speed_max: 20.0,
        ..reference_input()
    })
    .unwrap();
    let slowest = evaluate(&params, 1e-9).unwrap();
    assert!(slowest.tractors_required > u64::from(u32::MAX));

    let found = OptimalSpeedSearch::new(11).unwrap().search(&params).unwrap();
    assert!(found.result.speed >= 10.0);
    assert!(found.result.time_to_complete_h <= 200_000.0);
}

#[test]
fn malformed_config_withholds_results() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), "[field\narea_ha = 3").unwrap();
    assert!(Config::load_from_path(file.path()).is_err());
}

#[test]
fn plan_renders_to_ascii_and_bitmap() {
    let params = UnitParameters::try_from(ParameterInput {
        time_budget_h: 30.0,
        ..reference_input()
    })
    .unwrap();
    let plan = Plan::build(&params, 61, None).unwrap();
    let speed = plan.optimum_speed();
    assert!(speed.is_some());

    let text = renderer::render_curves(&plan.curves, speed);
    assert_eq!(text.matches('X').count(), 2);

    let bitmap = chart::render_curves(&plan.curves, speed);
    let pbm = bitmap.to_pbm();
    assert!(pbm.starts_with(b"P4\n"));
    assert!(bitmap.ink_count() > 0);
}

#[test]
fn invalid_inputs_are_rejected_not_clamped() {
    let cases: Vec<ParameterInput> = vec![
        ParameterInput { area_ha: -1.0, ..reference_input() },
        ParameterInput { width_m: 0.0, ..reference_input() },
        ParameterInput { efficiency: 1.5, ..reference_input() },
        ParameterInput { fuel_price: -2.0, ..reference_input() },
        ParameterInput { labor_rate: f64::NAN, ..reference_input() },
        ParameterInput { time_budget_h: -4.0, ..reference_input() },
        ParameterInput { speed_min: 0.0, ..reference_input() },
        ParameterInput { speed_min: 12.0, ..reference_input() },
    ];
    for input in cases {
        assert!(UnitParameters::try_from(input.clone()).is_err(), "{input:?} was accepted");
    }
}
