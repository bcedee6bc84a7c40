//! Weather conditions and the modifiers they apply to other sub-models.
//!
//! Conditions come from an attached [`WeatherTable`] or from the parameter
//! dictionary. Cloud cover can additionally follow a seeded AR(1) process:
//!
//! ```text
//! offset(t) = alpha * offset(t-1) + epsilon(t)
//! ```
//!
//! where `epsilon` is Gaussian with standard deviation `cloud_noise_std`
//! (percentage points). The perturbed cover is clamped to \[0, 100\].

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::ModelError;
use crate::io::weather::WeatherTable;
use crate::models::types::EnergyModel;
use crate::params::Params;
use crate::units::Unit;

const NAME: &str = "weather";

/// Temperature at which the array is rated (°C).
pub const REFERENCE_TEMPERATURE: f64 = 25.0;
/// Relative array power change per °C above the reference.
pub const TEMPERATURE_COEFFICIENT: f64 = -0.005;
/// Fraction of irradiance lost under full overcast.
pub const CLOUD_ATTENUATION: f64 = 0.8;
/// Precipitation rate at which the rolling resistance penalty saturates (mm/h).
pub const RAIN_SATURATION: f64 = 5.0;
/// Rolling resistance increase at saturation.
pub const RAIN_RR_PENALTY: f64 = 0.2;

const DEFAULT_CLOUD_ALPHA: f64 = 0.9;

/// Ambient conditions at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherConditions {
    /// Ambient temperature (°C).
    pub temperature: f64,
    /// Cloud cover (%).
    pub cloud_cover: f64,
    /// Wind speed (m/s).
    pub wind_speed: f64,
    /// Direction the wind blows from (deg).
    pub wind_direction: f64,
    /// Precipitation rate (mm/h).
    pub precipitation: f64,
}

impl Default for WeatherConditions {
    fn default() -> Self {
        Self {
            temperature: REFERENCE_TEMPERATURE,
            cloud_cover: 0.0,
            wind_speed: 0.0,
            wind_direction: 0.0,
            precipitation: 0.0,
        }
    }
}

impl WeatherConditions {
    fn from_params(params: &Params) -> Self {
        let defaults = Self::default();
        Self {
            temperature: params.get_or("ambient_temperature", defaults.temperature),
            cloud_cover: params.get_or("cloud_cover", defaults.cloud_cover),
            wind_speed: params.get_or("wind_speed", defaults.wind_speed),
            wind_direction: angle_deg(params, "wind_direction").unwrap_or(defaults.wind_direction),
            precipitation: params.get_or("precipitation", defaults.precipitation),
        }
    }
}

/// Reads an angle in degrees, converting values stored in radians.
fn angle_deg(params: &Params, key: &str) -> Option<f64> {
    let value = params.get(key)?;
    Some(match params.unit(key) {
        Some(Unit::Radians) => value.to_degrees(),
        _ => value,
    })
}

/// Array power multiplier from cell temperature.
pub fn temperature_modifier(temperature: f64) -> f64 {
    1.0 + (temperature - REFERENCE_TEMPERATURE) * TEMPERATURE_COEFFICIENT
}

/// Array power multiplier from cloud cover (%).
pub fn cloud_modifier(cloud_cover: f64) -> f64 {
    1.0 - cloud_cover / 100.0 * CLOUD_ATTENUATION
}

/// Drag multiplier from wind.
///
/// Drag scales with the square of airspeed; the headwind component of a wind
/// from `wind_direction_deg` is added to the vehicle speed. A stationary
/// vehicle gets no modifier.
pub fn wind_modifier(
    velocity: f64,
    wind_speed: f64,
    wind_direction_deg: f64,
    heading_deg: f64,
) -> f64 {
    if velocity <= 0.0 {
        return 1.0;
    }
    let headwind = wind_speed * (wind_direction_deg - heading_deg).to_radians().cos();
    let airspeed = (velocity + headwind).max(0.0);
    (airspeed / velocity).powi(2)
}

/// Rolling resistance multiplier from precipitation (mm/h).
pub fn rain_modifier(precipitation: f64) -> f64 {
    1.0 + precipitation.clamp(0.0, RAIN_SATURATION) / RAIN_SATURATION * RAIN_RR_PENALTY
}

/// Box-Muller sample with the given standard deviation.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos() * std_dev
}

/// Applies weather to the array, drag and rolling resistance models.
///
/// Writes the effective conditions as `weather_temperature`,
/// `weather_cloud_cover`, `weather_wind_speed`, `weather_wind_direction` and
/// `weather_precipitation`, and the modifiers `weather_array_modifier`,
/// `weather_drag_modifier` and `weather_rr_modifier`. Contributes no energy.
#[derive(Debug, Clone, Default)]
pub struct WeatherModel {
    table: Option<WeatherTable>,
    cloud_offset: f64,
    rng: Option<StdRng>,
}

impl WeatherModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weather model driven by an hourly table instead of parameters.
    pub fn with_table(table: WeatherTable) -> Self {
        Self {
            table: Some(table),
            ..Self::default()
        }
    }

    pub fn table(&self) -> Option<&WeatherTable> {
        self.table.as_ref()
    }

    fn advance_cloud(&mut self, params: &Params) -> f64 {
        let std_dev = params.get_or("cloud_noise_std", 0.0);
        if std_dev <= 0.0 {
            return 0.0;
        }
        let alpha = params
            .get_or("cloud_alpha", DEFAULT_CLOUD_ALPHA)
            .clamp(0.0, 1.0);
        let rng = self.rng.get_or_insert_with(|| {
            let seed = params.get_or("weather_seed", 0.0).max(0.0) as u64;
            StdRng::seed_from_u64(seed)
        });
        let epsilon = gaussian_noise(rng, std_dev);
        self.cloud_offset = alpha * self.cloud_offset + epsilon;
        self.cloud_offset
    }
}

impl EnergyModel for WeatherModel {
    fn update(&mut self, params: &mut Params, _dt_s: f64) -> Result<f64, ModelError> {
        let mut conditions = match &self.table {
            Some(table) => table.at(params.get_or("timestamp", 0.0)),
            None => WeatherConditions::from_params(params),
        };
        let offset = self.advance_cloud(params);
        conditions.cloud_cover = (conditions.cloud_cover + offset).clamp(0.0, 100.0);

        let velocity = params.get_or("velocity", 0.0);
        let heading = angle_deg(params, "vehicle_heading").unwrap_or(0.0);

        let array_modifier =
            temperature_modifier(conditions.temperature) * cloud_modifier(conditions.cloud_cover);
        let drag_modifier = wind_modifier(
            velocity,
            conditions.wind_speed,
            conditions.wind_direction,
            heading,
        );
        let rr_modifier = rain_modifier(conditions.precipitation);

        params.set("weather_temperature", conditions.temperature, Unit::Celsius);
        params.set("weather_cloud_cover", conditions.cloud_cover, Unit::Percent);
        params.set("weather_wind_speed", conditions.wind_speed, Unit::MetersPerSecond);
        params.set(
            "weather_wind_direction",
            conditions.wind_direction.to_radians(),
            Unit::Radians,
        );
        params.set(
            "weather_precipitation",
            conditions.precipitation,
            Unit::MillimetersPerHour,
        );
        params.set("weather_array_modifier", array_modifier, Unit::Dimensionless);
        params.set("weather_drag_modifier", drag_modifier, Unit::Dimensionless);
        params.set("weather_rr_modifier", rr_modifier, Unit::Dimensionless);
        Ok(0.0)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
