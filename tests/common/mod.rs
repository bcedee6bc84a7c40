//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use vehicle_sim::config::Scenario;
use vehicle_sim::io::weather::{WeatherRow, WeatherTable};
use vehicle_sim::runner::{RunOutput, run_scenario};

/// Tolerance for comparing accumulated energies (J).
pub const ENERGY_EPS: f64 = 1e-6;

/// Built-in preset by name.
pub fn preset(name: &str) -> Scenario {
    Scenario::from_preset(name).expect("built-in preset loads")
}

/// Runs a scenario without a weather table.
pub fn run(scenario: &Scenario) -> RunOutput {
    run_scenario(scenario, None).expect("scenario runs")
}

/// Small scenario file: two hours in ten-minute steps with the default
/// model set.
pub const MINIMAL_YAML: &str = "\
timestep: 10 minutes
raceday_len: 2 hours
timestamp: 10 hours
velocity: 40 km/h
total_energy: 5000 Wh
battery_capacity: 5000 Wh
weight: 320 kg
drag_coeff: 0.14
frontal_area: 1.2 m^2
air_density: 1.225 kg/m^3
mu_rr: 0.002
mu2_rr: 0.00003 h/km
latitude_deg: 39.09
num_cells: 258
p_mpp: 3.98 W
cell_efficiency: 0.25
n_cover: 1.5
t_cover: 0.5 mm
alpha_cover: 4 1/m
t_eva: 0.45 mm
alpha_eva: 20 1/m
ar_gain: 0
tau_misc: 0.98
cell_internal_impedance: 0.03 ohm
cells_in_series: 32
cells_in_parallel: 12
battery_voltage_nominal: 115.2 V
log: [velocity, drag_power, rr_power, array_power]
";

/// Weather table with the same conditions at every hour of the race day.
pub fn constant_weather(cloud_cover: f64, wind_speed: f64) -> WeatherTable {
    let rows = (0..24)
        .map(|h| WeatherRow {
            hour: f64::from(h),
            temperature: 25.0,
            cloud_cover,
            wind_speed,
            wind_direction: 0.0,
            precipitation: 0.0,
        })
        .collect();
    WeatherTable::new(rows)
}
