//! Scenario configuration: flat parameter files and built-in presets.
//!
//! A scenario file is a mapping of parameter names to values. A value is
//! either a bare number or a `"<number> <unit>"` string, converted to SI on
//! load. Two reserved keys hold lists of names instead:
//!
//! * `models` - sub-models to attach, in execution order
//! * `log` - parameters recorded after every step
//!
//! ```yaml
//! timestep: 30 minutes
//! raceday_len: 8 hours
//! velocity: 20 mph
//! drag_coeff: 0.14
//! models: [rolling_resistance, drag, array, battery]
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::ModelError;
use crate::io::weather::WeatherTable;
use crate::models::{self, EnergyModel, ModelKind, WeatherModel};
use crate::params::Params;
use crate::sim::{MAX_STEPS, VehicleModel};
use crate::units::{Unit, UnitError, parse_quantity};

/// Parameters logged when a scenario does not name any.
pub const DEFAULT_LOG: [&str; 3] = ["velocity", "total_energy", "array_power"];

/// Parameters that must lie in (0, 1].
const FRACTIONS: [&str; 3] = ["cell_efficiency", "tau_misc", "motor_eta_C"];

/// Failure to load a scenario from a file, a string or a preset name.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("value for \"{key}\" is not convertible to float")]
    NotFloat { key: String },

    #[error("value for \"{key}\": {source}")]
    BadUnit {
        key: String,
        #[source]
        source: UnitError,
    },

    #[error("\"{key}\" must be a list of names")]
    NotAList { key: String },

    #[error("{0}")]
    UnknownModel(String),

    #[error("unknown preset \"{0}\", available: {available}", available = Scenario::PRESETS.join(", "))]
    UnknownPreset(String),

    #[error("no scenario file or preset given")]
    NoSource,
}

/// Validation failure with the offending parameter and the constraint.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Parameter name (e.g., `"timestep"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Format-neutral value read from a scenario file.
#[derive(Debug, Clone, PartialEq)]
enum RawEntry {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// A loaded scenario: parameters plus the models and columns to run with.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Preset name or file stem.
    pub name: String,
    pub params: Params,
    /// Models in execution order. The battery always runs last.
    pub models: Vec<ModelKind>,
    /// Parameters recorded after every step.
    pub log: Vec<String>,
}

impl Scenario {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "overcast", "headwind"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnknownPreset`] if the name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, LoadError> {
        let overrides: &[(&str, &str)] = match name {
            "baseline" => &[],
            "overcast" => OVERCAST,
            "headwind" => HEADWIND,
            _ => return Err(LoadError::UnknownPreset(name.to_string())),
        };
        let mut entries = preset_entries(BASELINE);
        entries.extend(preset_entries(overrides));
        let mut scenario = Self::from_entries(name, entries)?;
        scenario.models = ModelKind::ALL.to_vec();
        Ok(scenario)
    }

    /// Loads a scenario file. `.toml` files are read as TOML, anything else
    /// as YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file cannot be read or parsed, or a
    /// value cannot be converted.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map_or_else(|| "scenario".to_string(), |s| s.to_string_lossy().into_owned());
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let scenario = if is_toml {
            Self::from_toml_str(&name, &content)?
        } else {
            Self::from_yaml_str(&name, &content)?
        };
        info!(
            path = %path.display(),
            params = scenario.params.len(),
            models = scenario.models.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    /// Parses a scenario from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the YAML is invalid or a value cannot be
    /// converted.
    pub fn from_yaml_str(name: &str, s: &str) -> Result<Self, LoadError> {
        use serde_yaml::Value;

        let doc: IndexMap<String, Value> = serde_yaml::from_str(s)?;
        let mut entries = IndexMap::with_capacity(doc.len());
        for (key, value) in doc {
            let entry = match value {
                Value::Number(n) => n
                    .as_f64()
                    .map(RawEntry::Number)
                    .ok_or_else(|| LoadError::NotFloat { key: key.clone() })?,
                Value::String(text) => RawEntry::Text(text),
                Value::Sequence(items) => RawEntry::List(
                    items
                        .into_iter()
                        .map(|item| match item {
                            Value::String(text) => Ok(text),
                            _ => Err(LoadError::NotAList { key: key.clone() }),
                        })
                        .collect::<Result<_, _>>()?,
                ),
                _ => return Err(LoadError::NotFloat { key }),
            };
            entries.insert(key, entry);
        }
        Self::from_entries(name, entries)
    }

    /// Parses a scenario from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the TOML is invalid or a value cannot be
    /// converted.
    pub fn from_toml_str(name: &str, s: &str) -> Result<Self, LoadError> {
        use toml::Value;

        let doc: IndexMap<String, Value> = toml::from_str(s)?;
        let mut entries = IndexMap::with_capacity(doc.len());
        for (key, value) in doc {
            let entry = match value {
                Value::Float(f) => RawEntry::Number(f),
                Value::Integer(i) => RawEntry::Number(i as f64),
                Value::String(text) => RawEntry::Text(text),
                Value::Array(items) => RawEntry::List(
                    items
                        .into_iter()
                        .map(|item| match item {
                            Value::String(text) => Ok(text),
                            _ => Err(LoadError::NotAList { key: key.clone() }),
                        })
                        .collect::<Result<_, _>>()?,
                ),
                _ => return Err(LoadError::NotFloat { key }),
            };
            entries.insert(key, entry);
        }
        Self::from_entries(name, entries)
    }

    fn from_entries(name: &str, entries: IndexMap<String, RawEntry>) -> Result<Self, LoadError> {
        let mut params = Params::new();
        let mut models = None;
        let mut log = None;

        for (key, entry) in entries {
            match key.as_str() {
                "models" => {
                    let names = into_names(&key, entry)?;
                    models = Some(
                        names
                            .iter()
                            .map(|n| n.parse::<ModelKind>().map_err(LoadError::UnknownModel))
                            .collect::<Result<Vec<_>, _>>()?,
                    );
                }
                "log" => log = Some(into_names(&key, entry)?),
                _ => {
                    let (value, unit) = match entry {
                        RawEntry::Number(v) => (v, Unit::Dimensionless),
                        RawEntry::Text(text) => parse_quantity(&text).map_err(|e| match e {
                            UnitError::NotANumber(_) => LoadError::NotFloat { key: key.clone() },
                            source @ UnitError::UnknownUnit(_) => LoadError::BadUnit {
                                key: key.clone(),
                                source,
                            },
                        })?,
                        RawEntry::List(_) => return Err(LoadError::NotFloat { key }),
                    };
                    debug!(key = %key, value, unit = %unit, "parameter");
                    params.set(&key, value, unit);
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            params,
            models: models.unwrap_or_else(|| ModelKind::DEFAULT_SET.to_vec()),
            log: log.unwrap_or_else(|| DEFAULT_LOG.iter().map(ToString::to_string).collect()),
        })
    }

    /// Checks the parameters against the selected models.
    ///
    /// Returns every problem found; an empty vector means the scenario can run.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let p = &self.params;

        for key in ["timestep", "raceday_len"] {
            match p.get(key) {
                None => errors.push(ConfigError::new(key, "is required")),
                Some(v) if v.is_nan() || v <= 0.0 => {
                    errors.push(ConfigError::new(key, "must be > 0"));
                }
                Some(_) => {}
            }
        }
        if let (Some(dt), Some(len)) = (p.get("timestep"), p.get("raceday_len")) {
            if dt > 0.0 && len > 0.0 && (len / dt).ceil() > MAX_STEPS as f64 {
                errors.push(ConfigError::new(
                    "raceday_len",
                    format!("needs more than {MAX_STEPS} steps of the given timestep"),
                ));
            }
        }
        if p.get("velocity").is_some_and(|v| v.is_nan() || v < 0.0) {
            errors.push(ConfigError::new("velocity", "must be >= 0"));
        }
        for key in FRACTIONS {
            if p.get(key).is_some_and(|v| !(v > 0.0 && v <= 1.0)) {
                errors.push(ConfigError::new(key, "must be in (0.0, 1.0]"));
            }
        }
        if p.get("cloud_cover").is_some_and(|v| !(0.0..=100.0).contains(&v)) {
            errors.push(ConfigError::new("cloud_cover", "must be in [0, 100]"));
        }
        if p.get("cloud_alpha").is_some_and(|v| !(0.0..=1.0).contains(&v)) {
            errors.push(ConfigError::new("cloud_alpha", "must be in [0.0, 1.0]"));
        }
        for (key, param) in p.iter() {
            if param.unit == Unit::Dimensionless {
                continue;
            }
            let Some(allowed) = expected_units(key) else {
                continue;
            };
            if !allowed.contains(&param.unit) {
                let names: Vec<String> = allowed.iter().map(|u| format!("\"{u}\"")).collect();
                errors.push(ConfigError::new(
                    key,
                    format!("has unit \"{}\", expected {}", param.unit, names.join(" or ")),
                ));
            }
        }

        for kind in &self.models {
            let model = models::build(*kind);
            for key in model.required_params() {
                if !p.contains(key) {
                    errors.push(ConfigError::new(
                        *key,
                        format!("is required by the {kind} model"),
                    ));
                }
            }
        }

        errors
    }

    /// Builds a vehicle with this scenario's parameters and models.
    ///
    /// When `weather` is given, the weather model reads conditions from it.
    /// A table supplied for a scenario without a weather model attaches one
    /// ahead of the listed models.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if `timestep` is missing or not positive.
    pub fn build_vehicle(&self, weather: Option<WeatherTable>) -> Result<VehicleModel, ModelError> {
        let mut vehicle = VehicleModel::new(self.params.clone())?;
        let mut weather = weather;
        if !self.models.contains(&ModelKind::Weather) {
            if let Some(table) = weather.take() {
                info!(scenario = %self.name, "weather table given, attaching weather model");
                vehicle.add_model(Box::new(WeatherModel::with_table(table)));
            }
        }
        for kind in &self.models {
            let model: Box<dyn EnergyModel> = match kind {
                ModelKind::Weather => match weather.take() {
                    Some(table) => Box::new(WeatherModel::with_table(table)),
                    None => models::build(*kind),
                },
                _ => models::build(*kind),
            };
            vehicle.add_model(model);
        }
        Ok(vehicle)
    }
}

/// Stored units accepted for known inputs. Bare numbers are always accepted.
fn expected_units(key: &str) -> Option<&'static [Unit]> {
    let units: &'static [Unit] = match key {
        "timestep" | "raceday_len" | "timestamp" => &[Unit::Seconds],
        "velocity" | "wind_speed" => &[Unit::MetersPerSecond],
        "total_energy" | "battery_capacity" => &[Unit::Joules],
        "weight" => &[Unit::Kilograms, Unit::Newtons],
        "grav_accel" => &[Unit::MetersPerSecondSquared],
        "frontal_area" => &[Unit::SquareMeters],
        "air_density" => &[Unit::KilogramsPerCubicMeter],
        "mu2_rr" => &[Unit::SecondsPerMeter],
        "latitude_deg" | "wind_direction" | "vehicle_heading" => &[Unit::Radians],
        "p_mpp" => &[Unit::Watts],
        "t_cover" | "t_eva" | "wheel_diameter" => &[Unit::Meters],
        "alpha_cover" | "alpha_eva" => &[Unit::PerMeter],
        "cell_internal_impedance" | "motor_R_A" | "motor_R_B" => &[Unit::Ohms],
        "battery_voltage_nominal" | "lv_bus_voltage" => &[Unit::Volts],
        "motor_k_H_default" | "motor_k_B1_default" => &[Unit::WattsPerRpm],
        "motor_k_E_default" | "motor_k_B2_default" => &[Unit::WattsPerRpm2],
        "motor_k_D_default" => &[Unit::WattsPerRpm3],
        "motor_k_S" => &[Unit::NewtonMetersPerAmpere],
        "ambient_temperature" => &[Unit::Celsius],
        "cloud_cover" | "cloud_noise_std" => &[Unit::Percent],
        "precipitation" => &[Unit::MillimetersPerHour],
        "current_draw_override" => &[Unit::Amperes],
        k if k.starts_with("lv_") && (k.ends_with("_current") || k.ends_with("_current_peak")) => {
            &[Unit::Amperes]
        }
        _ => return None,
    };
    Some(units)
}

fn into_names(key: &str, entry: RawEntry) -> Result<Vec<String>, LoadError> {
    match entry {
        RawEntry::List(names) => Ok(names),
        RawEntry::Text(text) => Ok(text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()),
        RawEntry::Number(_) => Err(LoadError::NotAList {
            key: key.to_string(),
        }),
    }
}

fn preset_entries(table: &[(&str, &str)]) -> IndexMap<String, RawEntry> {
    table
        .iter()
        .map(|(k, v)| ((*k).to_string(), RawEntry::Text((*v).to_string())))
        .collect()
}

/// A single race day at constant speed with every sub-model enabled.
const BASELINE: &[(&str, &str)] = &[
    ("timestep", "30 minutes"),
    ("raceday_len", "8 hours"),
    ("timestamp", "9 hours"),
    ("day_of_year", "172"),
    ("velocity", "20 mph"),
    ("total_energy", "5240 Wh"),
    ("battery_capacity", "5240 Wh"),
    ("weight", "328 kg"),
    ("grav_accel", "9.81 m/s^2"),
    // aero
    ("drag_coeff", "0.141589419"),
    ("frontal_area", "1.268 m^2"),
    ("air_density", "1.225 kg/m^3"),
    // tyres
    ("mu_rr", "0.00175"),
    ("mu2_rr", "0.0000311 h/km"),
    // array
    ("latitude_deg", "39.09"),
    ("num_cells", "258"),
    ("p_mpp", "3.98 W"),
    ("cell_efficiency", "0.254"),
    ("n_cover", "1.5"),
    ("t_cover", "0.5 mm"),
    ("alpha_cover", "4 1/m"),
    ("t_eva", "0.45 mm"),
    ("alpha_eva", "20 1/m"),
    ("ar_gain", "0"),
    ("tau_misc", "0.98"),
    // pack
    ("cell_internal_impedance", "0.03 ohm"),
    ("cells_in_series", "32"),
    ("cells_in_parallel", "12"),
    ("battery_voltage_nominal", "115.2 V"),
    // motor
    ("wheel_diameter", "0.55 m"),
    ("motor_R_A", "0.0765 ohm"),
    ("motor_R_B", "0.0148 ohm"),
    ("motor_k_H_default", "0.0185 W/rpm"),
    ("motor_k_E_default", "0.000103 W/rpm^2"),
    ("motor_k_B1_default", "0.00336 W/rpm"),
    ("motor_k_B2_default", "0.0000067 W/rpm^2"),
    ("motor_k_D_default", "0.00000002 W/rpm^3"),
    ("motor_k_S", "0.85 N*m/A"),
    ("motor_eta_C", "0.97"),
    // low voltage
    ("lv_bus_voltage", "12 V"),
    ("lv_peak_mode", "0"),
    ("lv_vcu_current", "0.15 A"),
    ("lv_controls_leader_current", "0.1 A"),
    ("lv_horn_current", "0 A"),
    ("lv_horn_current_peak", "2 A"),
    ("lv_lighting_current", "0.5 A"),
    ("lv_lighting_current_peak", "1.5 A"),
    ("lv_pi_display_current", "0.6 A"),
    ("lv_pedals_current", "0.05 A"),
    ("lv_camera_hub_current", "0.4 A"),
    ("lv_battery_box_current", "0.2 A"),
    ("lv_mppt_a_current", "0.05 A"),
    ("lv_mppt_b_current", "0.05 A"),
    ("lv_mppt_c_current", "0.05 A"),
    ("lv_motor_controller_current", "0.3 A"),
    ("lv_telemetry_leader_current", "0.25 A"),
    ("lv_pump_current", "0.8 A"),
    ("lv_pump_current_peak", "1.2 A"),
    // weather
    ("ambient_temperature", "25 degC"),
    ("cloud_cover", "0 %"),
    ("wind_speed", "0 m/s"),
    ("wind_direction", "0 deg"),
    ("precipitation", "0 mm/h"),
    ("vehicle_heading", "0 deg"),
];

/// Heavy, drifting cloud with light rain.
const OVERCAST: &[(&str, &str)] = &[
    ("ambient_temperature", "18 degC"),
    ("cloud_cover", "75 %"),
    ("precipitation", "1.5 mm/h"),
    ("cloud_alpha", "0.9"),
    ("cloud_noise_std", "8 %"),
    ("weather_seed", "42"),
];

/// Steady headwind at a reduced cruising speed.
const HEADWIND: &[(&str, &str)] = &[
    ("velocity", "18 mph"),
    ("wind_speed", "6 m/s"),
    ("wind_direction", "0 deg"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let scenario = Scenario::from_preset("baseline").unwrap();
        let errors = scenario.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
        assert_eq!(scenario.models, ModelKind::ALL.to_vec());
    }

    #[test]
    fn all_presets_are_valid() {
        for name in Scenario::PRESETS {
            let scenario = Scenario::from_preset(name);
            assert!(scenario.is_ok(), "preset \"{name}\" should load");
            let errors = scenario.as_ref().map(Scenario::validate).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = Scenario::from_preset("nonexistent").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown preset"));
        assert!(msg.contains("baseline, overcast, headwind"));
    }

    #[test]
    fn baseline_units_are_converted() {
        let p = Scenario::from_preset("baseline").unwrap().params;
        assert!((p.get("velocity").unwrap() - 8.9408).abs() < 1e-9);
        assert_eq!(p.get("timestep"), Some(1800.0));
        assert_eq!(p.get("total_energy"), Some(5240.0 * 3600.0));
        assert_eq!(p.unit("total_energy"), Some(Unit::Joules));
        assert!((p.get("t_cover").unwrap() - 5e-4).abs() < 1e-15);
    }

    #[test]
    fn presets_differ_from_baseline() {
        let base = Scenario::from_preset("baseline").unwrap().params;
        let overcast = Scenario::from_preset("overcast").unwrap().params;
        let headwind = Scenario::from_preset("headwind").unwrap().params;
        assert!(overcast.get("cloud_cover") > base.get("cloud_cover"));
        assert!(headwind.get("wind_speed") > base.get("wind_speed"));
        assert!(headwind.get("velocity") < base.get("velocity"));
    }

    #[test]
    fn yaml_numbers_and_quantities_parse() {
        let yaml = "\
timestep: 60
raceday_len: 2 hours
velocity: 36 km/h
drag_coeff: 0.14
";
        let scenario = Scenario::from_yaml_str("test", yaml).unwrap();
        let p = &scenario.params;
        assert_eq!(p.get("timestep"), Some(60.0));
        assert_eq!(p.get("raceday_len"), Some(7200.0));
        assert!((p.get("velocity").unwrap() - 10.0).abs() < 1e-9);
        let keys: Vec<&str> = p.keys().collect();
        assert_eq!(keys, vec!["timestep", "raceday_len", "velocity", "drag_coeff"]);
        assert_eq!(scenario.models, ModelKind::DEFAULT_SET.to_vec());
        assert_eq!(scenario.log, vec!["velocity", "total_energy", "array_power"]);
    }

    #[test]
    fn yaml_models_and_log_lists() {
        let yaml = "\
timestep: 60
models: [weather, rr, drag]
log: velocity, drag_power
";
        let scenario = Scenario::from_yaml_str("test", yaml).unwrap();
        assert_eq!(
            scenario.models,
            vec![ModelKind::Weather, ModelKind::RollingResistance, ModelKind::Drag]
        );
        assert_eq!(scenario.log, vec!["velocity", "drag_power"]);
        assert!(!scenario.params.contains("models"));
    }

    #[test]
    fn non_float_value_names_key() {
        let err = Scenario::from_yaml_str("test", "velocity: fast\n").unwrap_err();
        assert!(matches!(err, LoadError::NotFloat { ref key } if key == "velocity"));
        assert!(err.to_string().contains("\"velocity\""));

        let err = Scenario::from_yaml_str("test", "velocity: true\n").unwrap_err();
        assert!(matches!(err, LoadError::NotFloat { .. }));
    }

    #[test]
    fn unknown_unit_is_an_error() {
        let err = Scenario::from_yaml_str("test", "velocity: 20 furlongs\n").unwrap_err();
        assert!(matches!(err, LoadError::BadUnit { ref key, .. } if key == "velocity"));
    }

    #[test]
    fn unknown_model_is_an_error() {
        let err = Scenario::from_yaml_str("test", "models: [drag, warp]\n").unwrap_err();
        assert!(matches!(err, LoadError::UnknownModel(_)));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
timestep = 30
raceday_len = "1 h"
velocity = "20 mph"
models = ["drag", "array"]
"#;
        let scenario = Scenario::from_toml_str("test", toml).unwrap();
        assert_eq!(scenario.params.get("timestep"), Some(30.0));
        assert_eq!(scenario.params.get("raceday_len"), Some(3600.0));
        assert_eq!(scenario.models, vec![ModelKind::Drag, ModelKind::Array]);
    }

    #[test]
    fn toml_table_is_rejected() {
        let toml = "[drag]\ncoeff = 0.1\n";
        let err = Scenario::from_toml_str("test", toml).unwrap_err();
        assert!(matches!(err, LoadError::NotFloat { ref key } if key == "drag"));
    }

    #[test]
    fn validation_catches_zero_timestep() {
        let mut scenario = Scenario::from_preset("baseline").unwrap();
        scenario.params.set("timestep", 0.0, Unit::Seconds);
        let errors = scenario.validate();
        assert!(errors.iter().any(|e| e.field == "timestep"));
    }

    #[test]
    fn validation_catches_bad_efficiency_and_cloud() {
        let mut scenario = Scenario::from_preset("baseline").unwrap();
        scenario.params.set("cell_efficiency", 1.5, Unit::Dimensionless);
        scenario.params.set("cloud_cover", 120.0, Unit::Percent);
        let errors = scenario.validate();
        assert!(errors.iter().any(|e| e.field == "cell_efficiency"));
        assert!(errors.iter().any(|e| e.field == "cloud_cover"));
    }

    #[test]
    fn validation_catches_too_many_steps() {
        let mut scenario = Scenario::from_preset("baseline").unwrap();
        scenario.params.set("raceday_len", 1e30, Unit::Seconds);
        let errors = scenario.validate();
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(errors[0].field, "raceday_len");

        scenario.params.set("raceday_len", f64::INFINITY, Unit::Seconds);
        assert!(scenario.validate().iter().any(|e| e.field == "raceday_len"));
    }

    #[test]
    fn validation_reports_missing_model_inputs() {
        let scenario = Scenario::from_yaml_str("test", "timestep: 60\nraceday_len: 60\nmodels: [drag]\n")
            .unwrap();
        let errors = scenario.validate();
        for key in ["air_density", "velocity", "drag_coeff", "frontal_area"] {
            assert!(errors.iter().any(|e| e.field == key), "missing {key}");
        }
        assert!(errors[0].to_string().starts_with("config error: "));
    }

    #[test]
    fn validation_rejects_mismatched_units() {
        let yaml = "\
timestep: 5 m
raceday_len: 60 V
velocity: 10 ohm
weight: 220 lbf
mu2_rr: 0.00003 h/km
drag_coeff: 0.14
models: []
";
        let scenario = Scenario::from_yaml_str("test", yaml).unwrap();
        let errors = scenario.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["timestep", "raceday_len", "velocity"]);
        assert!(errors[0].to_string().contains("has unit \"m\", expected \"s\""));
    }

    #[test]
    fn build_vehicle_orders_battery_last() {
        let scenario = Scenario::from_preset("baseline").unwrap();
        let vehicle = scenario.build_vehicle(None).unwrap();
        let names = vehicle.model_names();
        assert_eq!(names.first(), Some(&"weather"));
        assert_eq!(names.last(), Some(&"battery"));
        assert_eq!(names.len(), ModelKind::ALL.len());
    }

    #[test]
    fn weather_table_attaches_missing_weather_model() {
        let scenario =
            Scenario::from_yaml_str("test", "timestep: 60\nmodels: [drag, battery]\n").unwrap();
        let table = WeatherTable::new(Vec::new());

        let without = scenario.build_vehicle(None).unwrap();
        assert_eq!(without.model_names(), vec!["drag", "battery"]);

        let with = scenario.build_vehicle(Some(table)).unwrap();
        assert_eq!(with.model_names(), vec!["weather", "drag", "battery"]);
    }

    #[test]
    fn reads_yaml_and_toml_files() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("car.yaml");
        std::fs::write(&yaml, "timestep: 60\n").unwrap();
        let toml = dir.path().join("car.toml");
        std::fs::write(&toml, "timestep = 60\n").unwrap();

        let a = Scenario::from_path(&yaml).unwrap();
        let b = Scenario::from_path(&toml).unwrap();
        assert_eq!(a.name, "car");
        assert_eq!(a.params, b.params);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Scenario::from_path(Path::new("/nonexistent/car.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
