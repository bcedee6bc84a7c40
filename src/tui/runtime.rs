//! Simulation stepping and TUI application state.

use std::collections::VecDeque;
use std::time::Instant;

use tracing::warn;

use crate::config::Scenario;
use crate::error::{Result, SimError};
use crate::io::weather::WeatherTable;
use crate::sim::{Engine, StepRecord};
use crate::units::JOULES_PER_WH;

/// Maximum number of history entries kept for the rolling chart.
const MAX_HISTORY: usize = 200;

/// Tick interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 6] = [500, 250, 100, 50, 20, 5];

/// Default speed index (100 ms).
const DEFAULT_SPEED_IDX: usize = 2;

/// Chart series always available, ahead of the logged parameters.
const ENERGY_SERIES: &str = "total_energy (Wh)";

/// TUI application state.
pub struct App {
    engine: Engine,
    /// Scenario behind the engine, kept for restart and preset switching.
    scenario: Scenario,
    weather: Option<WeatherTable>,
    /// Rolling history of step records for the chart.
    pub history: VecDeque<StepRecord>,
    pub paused: bool,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    /// Chart series: 0 is stored energy, `i > 0` is logged column `i - 1`.
    pub series_idx: usize,
    pub quit: bool,
    /// When the last simulation tick was executed.
    pub last_tick: Instant,
    /// Sub-model failure that stopped the run.
    pub error: Option<String>,
}

impl App {
    /// Validates `scenario` and builds a fresh engine for it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Invalid`] with every validation failure, or the
    /// model error raised while building the vehicle.
    pub fn new(scenario: Scenario, weather: Option<WeatherTable>) -> Result<Self> {
        let engine = build_engine(&scenario, weather.clone())?;
        Ok(Self {
            engine,
            scenario,
            weather,
            history: VecDeque::with_capacity(MAX_HISTORY),
            paused: false,
            speed_idx: DEFAULT_SPEED_IDX,
            series_idx: 0,
            quit: false,
            last_tick: Instant::now(),
            error: None,
        })
    }

    /// Advances the simulation by one step if not finished.
    ///
    /// A sub-model failure pauses the run and is shown in the status panel.
    pub fn tick(&mut self) {
        if self.error.is_some() {
            return;
        }
        match self.engine.step() {
            Ok(Some(record)) => {
                if self.history.len() >= MAX_HISTORY {
                    self.history.pop_front();
                }
                self.history.push_back(record);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "run stopped");
                self.error = Some(e.to_string());
                self.paused = true;
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Increases simulation speed (shorter tick interval).
    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
        }
    }

    /// Decreases simulation speed (longer tick interval).
    pub fn speed_down(&mut self) {
        if self.speed_idx > 0 {
            self.speed_idx -= 1;
        }
    }

    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }

    /// Cycles the chart through stored energy and each logged parameter.
    pub fn next_series(&mut self) {
        self.series_idx = (self.series_idx + 1) % (self.engine.columns().len() + 1);
    }

    /// Name of the charted series.
    pub fn series_name(&self) -> &str {
        match self.series_idx {
            0 => ENERGY_SERIES,
            i => self
                .engine
                .columns()
                .get(i - 1)
                .map_or(ENERGY_SERIES, String::as_str),
        }
    }

    /// `(time in hours, value)` points of the charted series. Steps where a
    /// logged parameter was absent are skipped.
    pub fn series_points(&self) -> Vec<(f64, f64)> {
        let column = self.series_idx.checked_sub(1);
        self.history
            .iter()
            .filter_map(|r| {
                let y = match column {
                    None => Some(r.total_energy_j / JOULES_PER_WH),
                    Some(i) => r.values.get(i).copied().flatten(),
                };
                y.map(|y| (r.time_s / 3600.0, y))
            })
            .collect()
    }

    /// Switches to a built-in preset, resetting simulation state.
    ///
    /// Unknown names and presets that fail to build leave the current run
    /// untouched.
    pub fn switch_preset(&mut self, name: &str) {
        let Ok(scenario) = Scenario::from_preset(name) else {
            return;
        };
        if !scenario.validate().is_empty() {
            return;
        }
        self.reset(scenario);
    }

    /// Restarts the current scenario from the beginning.
    pub fn restart(&mut self) {
        self.reset(self.scenario.clone());
    }

    fn reset(&mut self, scenario: Scenario) {
        match build_engine(&scenario, self.weather.clone()) {
            Ok(engine) => {
                self.engine = engine;
                self.scenario = scenario;
                self.history.clear();
                self.paused = false;
                self.series_idx = 0;
                self.error = None;
            }
            Err(e) => {
                warn!(scenario = %scenario.name, error = %e, "could not rebuild run");
            }
        }
    }

    pub fn scenario_name(&self) -> &str {
        &self.scenario.name
    }

    /// Steps executed so far.
    pub fn timestep(&self) -> usize {
        self.engine.steps_taken()
    }

    pub fn total_steps(&self) -> usize {
        self.engine.config().total_steps
    }

    /// Current state of charge, when the scenario has a battery capacity.
    pub fn battery_soc(&self) -> Option<f64> {
        self.engine.vehicle().params().get("battery_soc")
    }

    /// Current value of a parameter in the live dictionary.
    pub fn param(&self, key: &str) -> Option<f64> {
        self.engine.vehicle().params().get(key)
    }

    /// Cumulative energy per model so far (J).
    pub fn energy_by_model(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.engine
            .vehicle()
            .energy_by_model()
            .iter()
            .map(|(name, e)| (*name, *e))
    }

    /// Returns `true` when every timestep has been executed.
    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    pub fn last_record(&self) -> Option<&StepRecord> {
        self.history.back()
    }
}

fn build_engine(scenario: &Scenario, weather: Option<WeatherTable>) -> Result<Engine> {
    let errors = scenario.validate();
    if !errors.is_empty() {
        return Err(SimError::Invalid(errors));
    }
    let vehicle = scenario.build_vehicle(weather)?;
    Ok(Engine::new(vehicle, scenario.log.clone())?)
}
