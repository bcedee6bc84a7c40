//! Optics-only solar array model.
//!
//! Only lamination light losses are modelled (reflection at the cover,
//! absorption in the cover and EVA, and a lumped dirt/misc factor). Cell
//! temperature effects are left to the weather modifier.

use std::f64::consts::PI;

use crate::error::ModelError;
use crate::models::types::EnergyModel;
use crate::params::Params;
use crate::units::Unit;

const NAME: &str = "array";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Lamination stack in front of the cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lamination {
    /// Refractive index of the cover.
    pub n_cover: f64,
    /// Cover thickness (m).
    pub t_cover: f64,
    /// Cover absorption coefficient (1/m).
    pub alpha_cover: f64,
    /// EVA thickness (m).
    pub t_eva: f64,
    /// EVA absorption coefficient (1/m).
    pub alpha_eva: f64,
    /// Fractional reflectance reduction from an anti-reflective coating.
    pub ar_gain: f64,
    /// Lumped transmittance for dirt and other losses.
    pub tau_misc: f64,
}

impl Lamination {
    fn from_params(params: &Params) -> Result<Self, ModelError> {
        Ok(Self {
            n_cover: params.require(NAME, "n_cover")?,
            t_cover: params.require(NAME, "t_cover")?,
            alpha_cover: params.require(NAME, "alpha_cover")?,
            t_eva: params.require(NAME, "t_eva")?,
            alpha_eva: params.require(NAME, "alpha_eva")?,
            ar_gain: params.get_or("ar_gain", 0.0),
            tau_misc: params.get_or("tau_misc", 1.0),
        })
    }

    /// Fraction of light reaching the cells at incidence angle `theta` (rad).
    ///
    /// Snell refraction into the cover, unpolarised Fresnel reflectance at the
    /// air/cover interface, then Beer-Lambert absorption along the refracted
    /// path. The result is clamped to `[0, 1]`.
    pub fn transmittance(&self, theta: f64) -> f64 {
        let n0 = 1.0;
        let n1 = self.n_cover;

        let theta1 = (theta.sin() / n1).clamp(-1.0, 1.0).asin();
        let c0 = theta.cos();
        let c1 = theta1.cos();

        let rs = ((n0 * c0 - n1 * c1) / (n0 * c0 + n1 * c1)).powi(2);
        let rp = ((n0 * c1 - n1 * c0) / (n0 * c1 + n1 * c0)).powi(2);
        let reflectance = 0.5 * (rs + rp) * (1.0 - self.ar_gain);
        let t_interface = (1.0 - reflectance).max(0.0);

        let path_scale = 1.0 / c1.max(1e-6);
        let t_abs = (-self.alpha_cover * self.t_cover * path_scale).exp()
            * (-self.alpha_eva * self.t_eva * path_scale).exp();

        (t_interface * t_abs * self.tau_misc).clamp(0.0, 1.0)
    }
}

/// Solar declination (rad) for a day of the year, Cooper's approximation.
pub fn solar_declination(day_of_year: f64) -> f64 {
    23.45_f64.to_radians() * (2.0 * PI * (284.0 + day_of_year) / 365.0).sin()
}

/// Sine of the solar elevation, or 0 when the sun is below the horizon.
///
/// # Arguments
///
/// * `latitude` - Site latitude (rad)
/// * `time_of_day_s` - Seconds since local solar midnight
/// * `declination` - Solar declination (rad)
pub fn incidence_factor(latitude: f64, time_of_day_s: f64, declination: f64) -> f64 {
    let hours = time_of_day_s.rem_euclid(SECONDS_PER_DAY) / 3600.0;
    let hour_angle = (hours - 12.0) * (PI / 12.0);
    let sin_alpha = (latitude.sin() * declination.sin()
        + latitude.cos() * declination.cos() * hour_angle.cos())
    .clamp(-1.0, 1.0);
    if sin_alpha <= 0.0 { 0.0 } else { sin_alpha }
}

/// Reads an angle stored either in radians or as a bare number of degrees.
fn angle_rad(params: &Params, key: &str) -> Result<f64, ModelError> {
    let value = params.require(NAME, key)?;
    Ok(match params.unit(key) {
        Some(Unit::Radians) => value,
        _ => value.to_radians(),
    })
}

/// Flat solar array with lamination losses.
///
/// Writes `array_power` (W), `array_energy` (J), accumulates
/// `total_array_energy` (J), and records `tau` and `theta_rad` for debugging.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayModel;

impl EnergyModel for ArrayModel {
    fn update(&mut self, params: &mut Params, dt_s: f64) -> Result<f64, ModelError> {
        let latitude = angle_rad(params, "latitude_deg")?;
        let timestamp = params.get_or("timestamp", 0.0);
        let declination = params.get("day_of_year").map_or(0.0, solar_declination);
        let base_power = params.require(NAME, "num_cells")?
            * params.require(NAME, "p_mpp")?
            * params.require(NAME, "cell_efficiency")?;
        let lamination = Lamination::from_params(params)?;
        let modifier = params.get_or("weather_array_modifier", 1.0);

        let inc = incidence_factor(latitude, timestamp, declination);
        if inc <= 0.0 {
            params.set("array_power", 0.0, Unit::Watts);
            params.set("array_energy", 0.0, Unit::Joules);
            params.add("total_array_energy", 0.0, Unit::Joules);
            return Ok(0.0);
        }

        let theta = inc.clamp(0.0, 1.0).acos();
        let tau = lamination.transmittance(theta);
        let power = base_power * inc * tau * modifier;
        let energy = power * dt_s;

        params.set("array_power", power, Unit::Watts);
        params.set("array_energy", energy, Unit::Joules);
        params.add("total_array_energy", energy, Unit::Joules);
        params.set("tau", tau, Unit::Dimensionless);
        params.set("theta_rad", theta, Unit::Radians);
        Ok(energy)
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn required_params(&self) -> &'static [&'static str] {
        &[
            "latitude_deg",
            "num_cells",
            "p_mpp",
            "cell_efficiency",
            "n_cover",
            "t_cover",
            "alpha_cover",
            "t_eva",
            "alpha_eva",
        ]
    }
}
