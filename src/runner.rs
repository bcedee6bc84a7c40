//! End-to-end run of a scenario: validate, build, simulate, summarize.

use tracing::info;

use crate::config::Scenario;
use crate::error::{Result, SimError};
use crate::io::weather::WeatherTable;
use crate::params::Params;
use crate::sim::{Engine, RunSummary, SimConfig, StepRecord};

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub scenario: String,
    pub config: SimConfig,
    /// Logged parameter names, aligned with each record's values.
    pub columns: Vec<String>,
    pub records: Vec<StepRecord>,
    pub summary: RunSummary,
    /// Parameter dictionary after the last step.
    pub params: Params,
}

/// Validates and runs `scenario` for one race day.
///
/// # Errors
///
/// Returns [`SimError::Invalid`] with every validation failure, or the first
/// sub-model error raised while stepping.
pub fn run_scenario(scenario: &Scenario, weather: Option<WeatherTable>) -> Result<RunOutput> {
    let errors = scenario.validate();
    if !errors.is_empty() {
        return Err(SimError::Invalid(errors));
    }

    let vehicle = scenario.build_vehicle(weather)?;
    let mut engine = Engine::new(vehicle, scenario.log.clone())?;
    let records = engine.run()?;

    let config = *engine.config();
    let columns = engine.columns().to_vec();
    let vehicle = engine.into_vehicle();
    let summary = RunSummary::from_records(
        &records,
        vehicle.energy_by_model(),
        vehicle.params().get("battery_capacity"),
    );
    info!(
        scenario = %scenario.name,
        distance_m = summary.distance_m,
        final_energy_j = summary.final_energy_j,
        "scenario complete"
    );

    Ok(RunOutput {
        scenario: scenario.name.clone(),
        config,
        columns,
        records,
        summary,
        params: vehicle.into_params(),
    })
}
