//! Simulation engine that steps the vehicle through a race day.

use tracing::{debug, info, warn};

use crate::error::ModelError;

use super::clock::Clock;
use super::types::{SimConfig, StepRecord};
use super::vehicle::VehicleModel;

/// Drives a [`VehicleModel`] one timestep at a time and records the
/// requested parameters after each step.
#[derive(Debug)]
pub struct Engine {
    vehicle: VehicleModel,
    config: SimConfig,
    clock: Clock,
    columns: Vec<String>,
}

impl Engine {
    /// Creates an engine for a full race day.
    ///
    /// # Arguments
    ///
    /// * `vehicle` - Vehicle with its sub-models attached
    /// * `log_params` - Parameter names recorded after every step
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] when `timestep` or `raceday_len` is missing or
    /// out of range.
    pub fn new(vehicle: VehicleModel, log_params: Vec<String>) -> Result<Self, ModelError> {
        let config = SimConfig::from_params(vehicle.params())?;
        Ok(Self {
            vehicle,
            clock: Clock::new(config.total_steps),
            config,
            columns: log_params,
        })
    }

    /// Executes one timestep.
    ///
    /// # Returns
    ///
    /// `Ok(None)` once the race day is complete.
    ///
    /// # Errors
    ///
    /// Propagates the first sub-model failure.
    pub fn step(&mut self) -> Result<Option<StepRecord>, ModelError> {
        let Some(step) = self.clock.tick() else {
            return Ok(None);
        };
        let energy = self.vehicle.update()?;

        let params = self.vehicle.params();
        let record = StepRecord {
            step,
            time_s: params.get_or("elapsed", 0.0),
            distance_m: params.get_or("distance", 0.0),
            total_energy_j: params.get_or("total_energy", 0.0),
            net_energy_j: energy.net(),
            values: self.columns.iter().map(|c| params.get(c)).collect(),
        };
        debug!(step, energy_j = record.total_energy_j, "step complete");
        Ok(Some(record))
    }

    /// Executes every remaining timestep and returns their records.
    ///
    /// # Errors
    ///
    /// Propagates the first sub-model failure.
    pub fn run(&mut self) -> Result<Vec<StepRecord>, ModelError> {
        info!(
            steps = self.config.total_steps,
            timestep_s = self.config.timestep_s,
            models = ?self.vehicle.model_names(),
            "starting run"
        );
        let mut records = Vec::with_capacity(self.clock.total() - self.clock.elapsed());
        while let Some(record) = self.step()? {
            records.push(record);
        }
        for column in self.missing_columns(&records) {
            warn!(param = column, "logged parameter was never set");
        }
        info!(steps = records.len(), "run finished");
        Ok(records)
    }

    /// Logged parameters that produced no value in any of `records`.
    pub fn missing_columns(&self, records: &[StepRecord]) -> Vec<&str> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                records
                    .iter()
                    .all(|r| r.values.get(*i).copied().flatten().is_none())
            })
            .map(|(_, c)| c.as_str())
            .collect()
    }

    pub fn vehicle(&self) -> &VehicleModel {
        &self.vehicle
    }

    pub fn vehicle_mut(&mut self) -> &mut VehicleModel {
        &mut self.vehicle
    }

    pub fn into_vehicle(self) -> VehicleModel {
        self.vehicle
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Steps taken so far.
    pub fn steps_taken(&self) -> usize {
        self.clock.elapsed()
    }

    pub fn is_finished(&self) -> bool {
        self.clock.is_done()
    }
}
