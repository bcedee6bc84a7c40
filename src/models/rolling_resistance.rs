use crate::error::ModelError;
use crate::models::types::EnergyModel;
use crate::params::Params;
use crate::units::Unit;

const NAME: &str = "rolling_resistance";

/// Standard gravity used when `grav_accel` is not configured (m/s^2).
pub const STANDARD_GRAVITY: f64 = 9.806_65;

/// Speed-dependent rolling resistance of the whole vehicle.
///
/// `mu_rr` is the static coefficient and `mu2_rr` (s/m) its growth with
/// speed. `weight` is a mass (kg) scaled by `grav_accel`, or already a
/// force when stored in newtons. Writes `total_mu`, `normal_force`,
/// `rr_force` and `rr_power`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingResistanceModel;

impl EnergyModel for RollingResistanceModel {
    fn update(&mut self, params: &mut Params, dt_s: f64) -> Result<f64, ModelError> {
        let mu = params.require(NAME, "mu_rr")?;
        let mu2 = params.get_or("mu2_rr", 0.0);
        let velocity = params.require(NAME, "velocity")?;
        let weight = params.require(NAME, "weight")?;
        let g = params.get_or("grav_accel", STANDARD_GRAVITY);
        let modifier = params.get_or("weather_rr_modifier", 1.0);

        let total_mu = mu + mu2 * velocity;
        let normal_force = match params.unit("weight") {
            Some(Unit::Newtons) => weight,
            _ => weight * g,
        };
        let force = normal_force * total_mu * modifier;
        let power = -(force * velocity);

        params.set("total_mu", total_mu, Unit::Dimensionless);
        params.set("normal_force", normal_force, Unit::Newtons);
        params.set("rr_force", force, Unit::Newtons);
        params.set("rr_power", power, Unit::Watts);
        Ok(power * dt_s)
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn required_params(&self) -> &'static [&'static str] {
        &["mu_rr", "velocity", "weight"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Params {
        let mut p = Params::new();
        p.set("mu_rr", 0.00175, Unit::Dimensionless);
        p.set("mu2_rr", 0.0000311 * 3.6, Unit::SecondsPerMeter);
        p.set("velocity", 10.0, Unit::MetersPerSecond);
        p.set("weight", 328.0, Unit::Kilograms);
        p
    }

    #[test]
    fn power_uses_speed_dependent_coefficient() {
        let mut p = params();
        let energy = RollingResistanceModel.update(&mut p, 2.0).unwrap();
        let total_mu = 0.00175 + 0.0000311 * 3.6 * 10.0;
        let expected = -(328.0 * STANDARD_GRAVITY * total_mu * 10.0);
        assert!((p.get("total_mu").unwrap() - total_mu).abs() < 1e-12);
        assert!((p.get("rr_power").unwrap() - expected).abs() < 1e-9);
        assert!((energy - 2.0 * expected).abs() < 1e-9);
    }

    #[test]
    fn configured_gravity_overrides_standard() {
        let mut p = params();
        p.set("grav_accel", 3.71, Unit::MetersPerSecondSquared);
        RollingResistanceModel.update(&mut p, 1.0).unwrap();
        assert!((p.get("normal_force").unwrap() - 328.0 * 3.71).abs() < 1e-9);
    }

    #[test]
    fn weight_given_as_force_is_not_scaled_by_gravity() {
        let mut mass = params();
        mass.set("weight", 100.0, Unit::Kilograms);
        let mut force = params();
        force.set("weight", 100.0 * STANDARD_GRAVITY, Unit::Newtons);

        RollingResistanceModel.update(&mut mass, 1.0).unwrap();
        RollingResistanceModel.update(&mut force, 1.0).unwrap();
        let expected = 100.0 * STANDARD_GRAVITY;
        assert!((mass.get("normal_force").unwrap() - expected).abs() < 1e-9);
        assert!((force.get("normal_force").unwrap() - expected).abs() < 1e-9);
        assert_eq!(mass.get("rr_power"), force.get("rr_power"));
    }

    #[test]
    fn wet_road_increases_force() {
        let mut dry = params();
        let mut wet = params();
        wet.set("weather_rr_modifier", 1.2, Unit::Dimensionless);
        RollingResistanceModel.update(&mut dry, 1.0).unwrap();
        RollingResistanceModel.update(&mut wet, 1.0).unwrap();
        let ratio = wet.get("rr_force").unwrap() / dry.get("rr_force").unwrap();
        assert!((ratio - 1.2).abs() < 1e-12);
    }

    #[test]
    fn energy_is_never_positive() {
        let mut p = params();
        p.set("velocity", 0.0, Unit::MetersPerSecond);
        let energy = RollingResistanceModel.update(&mut p, 1.0).unwrap();
        assert!(energy <= 0.0);
    }
}
