//! The vehicle: a parameter dictionary plus an ordered set of sub-models.

use std::fmt;

use indexmap::IndexMap;
use tracing::trace;

use crate::error::ModelError;
use crate::models::EnergyModel;
use crate::params::Params;
use crate::units::Unit;

use super::types::StepEnergy;

const NAME: &str = "vehicle";

/// Aggregate owning the parameter dictionary and the sub-models acting on it.
///
/// Sub-models run in the order they were added. The battery model is held
/// apart and always runs last, after `net_power` for the step is published.
///
/// # Examples
///
/// ```
/// use vehicle_sim::models::DragModel;
/// use vehicle_sim::params::Params;
/// use vehicle_sim::sim::vehicle::VehicleModel;
/// use vehicle_sim::units::Unit;
///
/// let mut params = Params::new();
/// params.set("timestep", 10.0, Unit::Seconds);
/// params.set("velocity", 10.0, Unit::MetersPerSecond);
/// params.set("air_density", 1.2, Unit::KilogramsPerCubicMeter);
/// params.set("drag_coeff", 0.2, Unit::Dimensionless);
/// params.set("frontal_area", 1.0, Unit::SquareMeters);
///
/// let mut vehicle = VehicleModel::new(params).unwrap();
/// vehicle.add_model(Box::new(DragModel));
/// vehicle.update().unwrap();
///
/// assert_eq!(vehicle.params().get("distance"), Some(100.0));
/// assert!(vehicle.params().get("total_energy").unwrap() < 0.0);
/// ```
pub struct VehicleModel {
    params: Params,
    models: Vec<Box<dyn EnergyModel>>,
    battery: Option<Box<dyn EnergyModel>>,
    energy_by_model: IndexMap<&'static str, f64>,
}

impl VehicleModel {
    /// Takes ownership of `params` and seeds the state keys.
    ///
    /// `total_energy`, `timestamp`, `distance` and `elapsed` start at 0 unless
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] when `timestep` is missing or not positive.
    pub fn new(mut params: Params) -> Result<Self, ModelError> {
        let dt = params.require(NAME, "timestep")?;
        if dt.is_nan() || dt <= 0.0 {
            return Err(ModelError::InvalidParam {
                model: NAME,
                key: "timestep".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        params.set_default("total_energy", 0.0, Unit::Joules);
        params.set_default("timestamp", 0.0, Unit::Seconds);
        params.set_default("distance", 0.0, Unit::Meters);
        params.set_default("elapsed", 0.0, Unit::Seconds);

        Ok(Self {
            params,
            models: Vec::new(),
            battery: None,
            energy_by_model: IndexMap::new(),
        })
    }

    /// Appends a sub-model. A model named `battery` replaces the battery slot.
    pub fn add_model(&mut self, model: Box<dyn EnergyModel>) {
        if model.name() == "battery" {
            self.set_battery_model(model);
        } else {
            self.models.push(model);
        }
    }

    /// Installs the model that runs last each step.
    pub fn set_battery_model(&mut self, model: Box<dyn EnergyModel>) {
        self.battery = Some(model);
    }

    /// Sub-models in execution order, excluding the battery.
    pub fn models(&self) -> &[Box<dyn EnergyModel>] {
        &self.models
    }

    pub fn battery_model(&self) -> Option<&dyn EnergyModel> {
        self.battery.as_deref()
    }

    /// Names of every model that runs each step, battery last.
    pub fn model_names(&self) -> Vec<&'static str> {
        self.models
            .iter()
            .chain(self.battery.iter())
            .map(|m| m.name())
            .collect()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn into_params(self) -> Params {
        self.params
    }

    /// Cumulative energy per model over every update so far (J).
    pub fn energy_by_model(&self) -> &IndexMap<&'static str, f64> {
        &self.energy_by_model
    }

    /// Advances the vehicle by one `timestep`.
    ///
    /// Every model runs in order and its energy is added to `total_energy`.
    /// The net power of those models is published as `net_power` before the
    /// battery model runs. Time and distance then advance.
    ///
    /// # Errors
    ///
    /// Returns the first [`ModelError`] raised by a model. The dictionary may
    /// hold partial outputs of the failed step.
    pub fn update(&mut self) -> Result<StepEnergy, ModelError> {
        let dt = self.params.require(NAME, "timestep")?;
        let mut energy = StepEnergy {
            contributions: Vec::with_capacity(self.models.len() + 1),
        };

        for model in &mut self.models {
            let joules = model.update(&mut self.params, dt)?;
            Self::account(&mut self.params, &mut self.energy_by_model, model.name(), joules);
            energy.contributions.push((model.name(), joules));
        }

        self.params.set("net_power", energy.net() / dt, Unit::Watts);

        if let Some(battery) = &mut self.battery {
            let joules = battery.update(&mut self.params, dt)?;
            Self::account(&mut self.params, &mut self.energy_by_model, battery.name(), joules);
            energy.contributions.push((battery.name(), joules));
        }

        let velocity = self.params.get_or("velocity", 0.0);
        self.params.add("timestamp", dt, Unit::Seconds);
        self.params.add("elapsed", dt, Unit::Seconds);
        self.params.add("distance", velocity * dt, Unit::Meters);

        if let Some(capacity) = self.params.get("battery_capacity").filter(|c| *c > 0.0) {
            let soc = self.params.get_or("total_energy", 0.0) / capacity;
            self.params.set("battery_soc", soc, Unit::Dimensionless);
        }

        Ok(energy)
    }

    fn account(
        params: &mut Params,
        tally: &mut IndexMap<&'static str, f64>,
        name: &'static str,
        joules: f64,
    ) {
        trace!(model = name, energy_j = joules, "model updated");
        params.add("total_energy", joules, Unit::Joules);
        *tally.entry(name).or_insert(0.0) += joules;
    }
}

impl fmt::Debug for VehicleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VehicleModel")
            .field("models", &self.model_names())
            .field("params", &self.params.len())
            .finish()
    }
}
