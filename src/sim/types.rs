//! Core simulation types: run configuration and per-step records.

use std::fmt;

use serde::Serialize;

use crate::error::ModelError;
use crate::params::Params;
use crate::units::JOULES_PER_WH;

/// Largest number of steps a single run may take.
pub const MAX_STEPS: usize = 1_000_000;

/// Timing of a run, derived from the `timestep` and `raceday_len` parameters.
///
/// # Examples
///
/// ```
/// use vehicle_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(1800.0, 8.0 * 3600.0).unwrap();
/// assert_eq!(cfg.total_steps, 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimConfig {
    /// Duration of one step (s).
    pub timestep_s: f64,
    /// Length of the simulated race day (s).
    pub raceday_len_s: f64,
    /// Steps needed to cover the race day, rounded up.
    pub total_steps: usize,
}

impl SimConfig {
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidParam`] unless `timestep_s > 0`,
    /// `raceday_len_s >= 0` and the day fits in [`MAX_STEPS`] steps.
    pub fn new(timestep_s: f64, raceday_len_s: f64) -> Result<Self, ModelError> {
        if timestep_s.is_nan() || timestep_s <= 0.0 {
            return Err(invalid("timestep", "must be > 0"));
        }
        if !raceday_len_s.is_finite() || raceday_len_s < 0.0 {
            return Err(invalid("raceday_len", "must be a finite value >= 0"));
        }
        let steps = (raceday_len_s / timestep_s).ceil();
        if !steps.is_finite() || steps > MAX_STEPS as f64 {
            return Err(invalid(
                "raceday_len",
                &format!("needs more than {MAX_STEPS} steps of the given timestep"),
            ));
        }
        Ok(Self {
            timestep_s,
            raceday_len_s,
            total_steps: steps as usize,
        })
    }

    /// Reads `timestep` and `raceday_len` from the dictionary.
    ///
    /// # Errors
    ///
    /// Fails when either is missing or out of range.
    pub fn from_params(params: &Params) -> Result<Self, ModelError> {
        Self::new(
            params.require("sim", "timestep")?,
            params.require("sim", "raceday_len")?,
        )
    }
}

fn invalid(key: &str, reason: &str) -> ModelError {
    ModelError::InvalidParam {
        model: "sim",
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Energy contributed by each model during one vehicle update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepEnergy {
    /// `(model name, joules)` in execution order, battery last.
    pub contributions: Vec<(&'static str, f64)>,
}

impl StepEnergy {
    /// Net energy change of the step (J).
    pub fn net(&self) -> f64 {
        self.contributions.iter().map(|(_, e)| e).sum()
    }

    /// Energy of one model this step, if it ran.
    pub fn of(&self, name: &str) -> Option<f64> {
        self.contributions
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, e)| *e)
    }
}

/// State of the vehicle at the end of one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// Step index.
    pub step: usize,
    /// Time since the start of the run (s).
    pub time_s: f64,
    /// Distance covered since the start of the run (m).
    pub distance_m: f64,
    /// Stored energy after the step (J).
    pub total_energy_j: f64,
    /// Net energy change during the step (J).
    pub net_energy_j: f64,
    /// Logged parameter values, aligned with the engine's columns.
    /// `None` when the parameter did not exist at this step.
    pub values: Vec<Option<f64>>,
}

impl StepRecord {
    /// Pairs the record with its column names for display.
    pub fn with_columns<'a>(&'a self, columns: &'a [String]) -> LabelledRecord<'a> {
        LabelledRecord {
            record: self,
            columns,
        }
    }
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step={:>4} ({:>6.2}h) | dist={:>8.2} km | energy={:>8.1} Wh (net {:>+7.1} Wh)",
            self.step,
            self.time_s / 3600.0,
            self.distance_m / 1000.0,
            self.total_energy_j / JOULES_PER_WH,
            self.net_energy_j / JOULES_PER_WH,
        )
    }
}

/// A [`StepRecord`] displayed with `name=value` pairs for its logged values.
pub struct LabelledRecord<'a> {
    record: &'a StepRecord,
    columns: &'a [String],
}

impl fmt::Display for LabelledRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record)?;
        for (name, value) in self.columns.iter().zip(&self.record.values) {
            match value {
                Some(v) => write!(f, " | {name}={v:.4}")?,
                None => write!(f, " | {name}=n/a")?,
            }
        }
        Ok(())
    }
}
