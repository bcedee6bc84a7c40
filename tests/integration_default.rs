//! Integration tests for full runs of the built-in scenarios.

mod common;

use common::{ENERGY_EPS, constant_weather, preset, run};
use vehicle_sim::config::Scenario;
use vehicle_sim::runner::run_scenario;
use vehicle_sim::sim::RunSummary;

fn model_energy(summary: &RunSummary, model: &str) -> f64 {
    summary
        .energy_by_model
        .iter()
        .find(|m| m.model == model)
        .map_or(0.0, |m| m.energy_j)
}

#[test]
fn baseline_covers_race_day() {
    let out = run(&preset("baseline"));
    // 8 hours in 30 minute steps
    assert_eq!(out.records.len(), 16);
    assert_eq!(out.config.total_steps, 16);

    let last = out.records.last().unwrap();
    assert!((last.time_s - 8.0 * 3600.0).abs() < 1e-9);
    assert!((out.summary.duration_s - 8.0 * 3600.0).abs() < 1e-9);
}

#[test]
fn time_and_distance_advance_every_step() {
    let out = run(&preset("baseline"));
    let dt = out.config.timestep_s;
    let velocity = out.params.get("velocity").unwrap();

    for (i, r) in out.records.iter().enumerate() {
        assert_eq!(r.step, i);
        assert!((r.time_s - (i + 1) as f64 * dt).abs() < 1e-9);
        assert!((r.distance_m - (i + 1) as f64 * dt * velocity).abs() < 1e-6);
    }
    assert!((out.params.get("timestamp").unwrap() - 17.0 * 3600.0).abs() < 1e-9);
}

#[test]
fn stored_energy_equals_sum_of_contributions() {
    for name in Scenario::PRESETS {
        let out = run(&preset(name));
        let net: f64 = out.records.iter().map(|r| r.net_energy_j).sum();
        let by_model: f64 = out.summary.energy_by_model.iter().map(|m| m.energy_j).sum();
        let last = out.records.last().unwrap().total_energy_j;

        assert!(
            (last - (out.summary.start_energy_j + net)).abs() < ENERGY_EPS * last.abs().max(1.0),
            "{name}: energy not conserved"
        );
        assert!((by_model - net).abs() < ENERGY_EPS * net.abs().max(1.0));
        assert_eq!(out.params.get("total_energy"), Some(last));
    }
}

#[test]
fn loss_models_never_add_energy() {
    let out = run(&preset("baseline"));
    assert!(model_energy(&out.summary, "drag") < 0.0);
    assert!(model_energy(&out.summary, "rolling_resistance") < 0.0);
    assert!(model_energy(&out.summary, "motor") <= 0.0);
    assert!(model_energy(&out.summary, "battery") <= 0.0);
    assert!(model_energy(&out.summary, "lv_draw") <= 0.0);
    assert!(model_energy(&out.summary, "array") > 0.0);
    assert_eq!(model_energy(&out.summary, "weather"), 0.0);
}

#[test]
fn battery_runs_last_each_step() {
    let scenario = preset("baseline");
    let vehicle = scenario.build_vehicle(None).unwrap();
    assert_eq!(vehicle.model_names().last(), Some(&"battery"));
}

#[test]
fn runs_are_deterministic() {
    for name in Scenario::PRESETS {
        let a = run(&preset(name));
        let b = run(&preset(name));
        assert_eq!(a.records, b.records, "{name} differs between runs");
        assert_eq!(a.summary, b.summary);
    }
}

#[test]
fn overcast_harvests_less_than_baseline() {
    let base = run(&preset("baseline"));
    let overcast = run(&preset("overcast"));
    assert!(model_energy(&overcast.summary, "array") < model_energy(&base.summary, "array"));
}

#[test]
fn weather_table_drives_array_and_drag() {
    let scenario = preset("baseline");
    let clear = run_scenario(&scenario, Some(constant_weather(0.0, 0.0))).unwrap();
    let cloudy = run_scenario(&scenario, Some(constant_weather(100.0, 0.0))).unwrap();
    let windy = run_scenario(&scenario, Some(constant_weather(0.0, 6.0))).unwrap();

    let clear_array = model_energy(&clear.summary, "array");
    assert!(model_energy(&cloudy.summary, "array") < clear_array);
    // headwind from due north against a northbound car
    assert!(model_energy(&windy.summary, "drag") < model_energy(&clear.summary, "drag"));
    assert_eq!(cloudy.params.get("weather_cloud_cover"), Some(100.0));
}

#[test]
fn headwind_preset_raises_drag_per_metre() {
    let base = run(&preset("baseline"));
    let headwind = run(&preset("headwind"));
    let per_m = |out: &vehicle_sim::runner::RunOutput| {
        model_energy(&out.summary, "drag") / out.summary.distance_m
    };
    assert!(per_m(&headwind) < per_m(&base));
}

#[test]
fn summary_reports_final_soc() {
    let out = run(&preset("baseline"));
    let soc = out.summary.final_soc.unwrap();
    let expected = out.summary.final_energy_j / out.params.get("battery_capacity").unwrap();
    assert!((soc - expected).abs() < 1e-12);
    assert_eq!(out.params.get("battery_soc"), Some(soc));
}

#[test]
fn logged_columns_follow_scenario() {
    let mut scenario = preset("baseline");
    scenario.log = vec!["drag_power".to_string(), "not_a_param".to_string()];
    let out = run(&scenario);
    assert_eq!(out.columns, scenario.log);
    assert!(out.records.iter().all(|r| r.values[0].is_some_and(|p| p < 0.0)));
    assert!(out.records.iter().all(|r| r.values[1].is_none()));
}
