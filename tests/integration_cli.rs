//! End-to-end runs of the `vehicle-sim` binary.

mod common;

use std::fs;
use std::process::{Command, Output};

fn vehicle_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vehicle-sim"))
        .args(args)
        .output()
        .expect("vehicle-sim process should run")
}

fn parse_metric(stdout: &str, label: &str, unit: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing summary line `{label}` in output: {stdout}"));
    let raw = line
        .split_once(':')
        .map(|(_, right)| right.trim())
        .unwrap_or_else(|| panic!("invalid summary format for line `{line}`"));
    let numeric = raw.strip_suffix(unit).unwrap_or(raw).trim();
    numeric
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("failed parsing `{numeric}` from line `{line}`"))
}

#[test]
fn missing_config_prints_usage_error() {
    let output = vehicle_sim(&[]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Please input a YAML config!"), "stderr={stderr}");
    #[cfg(unix)]
    assert_eq!(output.status.code(), Some(255));
}

#[test]
fn preset_run_prints_steps_and_summary() {
    let output = vehicle_sim(&["--preset", "baseline"]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    let steps = stdout.lines().filter(|l| l.starts_with("step=")).count();
    assert_eq!(steps, 16);
    assert!(stdout.contains("velocity="));
    assert!(stdout.contains("--- Run Summary ---"));
    assert_eq!(parse_metric(&stdout, "Steps:", ""), 16.0);
    assert!(parse_metric(&stdout, "Distance:", "km") > 0.0);
}

#[test]
fn unknown_preset_fails() {
    let output = vehicle_sim(&["--preset", "moonbase"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown preset"));
}

#[test]
fn config_file_runs_and_exports_telemetry() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("car.yaml");
    let telemetry = dir.path().join("telemetry.csv");
    fs::write(&config, common::MINIMAL_YAML).unwrap();

    let output = vehicle_sim(&[
        config.to_str().unwrap(),
        "--telemetry-out",
        telemetry.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let mut rdr = csv::Reader::from_path(&telemetry).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        [
            "step",
            "time_s",
            "distance_m",
            "total_energy_j",
            "velocity",
            "drag_power",
            "rr_power",
            "array_power"
        ]
    );
    // 2 hours in 10 minute steps
    assert_eq!(rdr.records().count(), 12);
}

#[test]
fn invalid_config_reports_every_problem() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.yaml");
    let yaml = common::MINIMAL_YAML
        .replace("timestep: 10 minutes", "timestep: 0")
        .replace("cell_efficiency: 0.25", "cell_efficiency: 1.7");
    fs::write(&config, yaml).unwrap();

    let output = vehicle_sim(&[config.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("timestep"), "stderr={stderr}");
    assert!(stderr.contains("cell_efficiency"), "stderr={stderr}");
}

#[test]
fn model_and_log_flags_override_scenario() {
    let output = vehicle_sim(&[
        "--preset",
        "baseline",
        "-m",
        "drag",
        "-l",
        "drag_power,array_power",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("drag_power="));
    // array model not attached, so its output never appears
    assert!(stdout.contains("array_power=n/a"));
    assert!(!stdout.contains("  array "));
}

#[test]
fn sample_scenarios_run() {
    for path in ["scenarios/baseline.yaml", "scenarios/sunny_sprint.toml"] {
        let output = vehicle_sim(&[path]);
        assert!(
            output.status.success(),
            "{path} failed: stderr={}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let output = vehicle_sim(&[
        "scenarios/baseline.yaml",
        "--weather",
        "scenarios/weather_cloudy.csv",
    ]);
    assert!(output.status.success());
}

#[test]
fn weather_file_applies_without_weather_model() {
    let dir = tempfile::tempdir().unwrap();
    let weather = dir.path().join("overcast.csv");
    let mut csv = String::from("hour,temperature,cloud_cover,wind_speed,wind_direction,precipitation\n");
    for hour in 0..24 {
        csv.push_str(&format!("{hour},25,100,0,0,0\n"));
    }
    fs::write(&weather, csv).unwrap();

    let clear = vehicle_sim(&["scenarios/sunny_sprint.toml"]);
    let cloudy = vehicle_sim(&[
        "scenarios/sunny_sprint.toml",
        "--weather",
        weather.to_str().unwrap(),
    ]);
    assert!(clear.status.success());
    assert!(
        cloudy.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&cloudy.stderr)
    );

    let clear = String::from_utf8(clear.stdout).unwrap();
    let cloudy = String::from_utf8(cloudy.stdout).unwrap();
    let harvested_clear = parse_metric(&clear, "Harvested:", "Wh");
    let harvested_cloudy = parse_metric(&cloudy, "Harvested:", "Wh");
    assert!(
        harvested_cloudy < harvested_clear,
        "clear={harvested_clear} cloudy={harvested_cloudy}"
    );
    assert!(cloudy.contains("  weather "));
}
