use std::f64::consts::PI;

use serde::Serialize;

use crate::error::ModelError;
use crate::models::types::EnergyModel;
use crate::params::Params;
use crate::units::Unit;

const NAME: &str = "motor";

/// Loss coefficients of the hub motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorConstants {
    /// Armature resistance (ohm).
    pub r_a: f64,
    /// Commutation resistance (ohm).
    pub r_b: f64,
    /// Hysteresis coefficient (W/rpm).
    pub k_h: f64,
    /// Eddy-current coefficient (W/rpm^2).
    pub k_e: f64,
    /// Bearing coefficients (W/rpm, W/rpm^2).
    pub k_b1: f64,
    pub k_b2: f64,
    /// Windage coefficient (W/rpm^3).
    pub k_d: f64,
}

impl MotorConstants {
    pub fn from_params(params: &Params) -> Result<Self, ModelError> {
        Ok(Self {
            r_a: params.require(NAME, "motor_R_A")?,
            r_b: params.require(NAME, "motor_R_B")?,
            k_h: params.require(NAME, "motor_k_H_default")?,
            k_e: params.require(NAME, "motor_k_E_default")?,
            k_b1: params.require(NAME, "motor_k_B1_default")?,
            k_b2: params.require(NAME, "motor_k_B2_default")?,
            k_d: params.require(NAME, "motor_k_D_default")?,
        })
    }

    /// Breaks down motor losses at `current` (A) and `speed_rpm`.
    pub fn losses(&self, current: f64, speed_rpm: f64) -> MotorLosses {
        let armature = current * current * self.r_a;
        let commutation = current * current * self.r_b;
        let hysteresis = self.k_h * speed_rpm;
        let eddy = self.k_e * speed_rpm * speed_rpm;
        let bearing = (self.k_b1 + self.k_b2 * speed_rpm) * speed_rpm;
        let air_drag = self.k_d * speed_rpm.powi(3);
        MotorLosses {
            armature,
            commutation,
            hysteresis,
            eddy,
            bearing,
            air_drag,
        }
    }
}

/// Individual loss terms (W).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotorLosses {
    pub armature: f64,
    pub commutation: f64,
    pub hysteresis: f64,
    pub eddy: f64,
    pub bearing: f64,
    pub air_drag: f64,
}

impl MotorLosses {
    /// Current-dependent losses.
    pub fn copper(&self) -> f64 {
        self.armature + self.commutation
    }

    /// Speed-dependent losses.
    pub fn stray(&self) -> f64 {
        self.hysteresis + self.eddy + self.bearing + self.air_drag
    }

    pub fn total(&self) -> f64 {
        self.copper() + self.stray()
    }
}

/// Steady-state operating point of motor and controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotorOperatingPoint {
    pub current: f64,
    pub speed_rpm: f64,
    pub torque: f64,
    pub shaft_power: f64,
    pub motor_input_power: f64,
    pub battery_input_power: f64,
    pub controller_loss: f64,
    pub motor_efficiency: f64,
    pub system_efficiency: f64,
    pub losses: MotorLosses,
}

/// Converts a mechanical speed in rpm to rad/s.
pub fn rpm_to_rad_per_s(rpm: f64) -> f64 {
    rpm * 2.0 * PI / 60.0
}

/// Computes motor and system efficiency for a shaft torque (N*m) and speed.
///
/// Current follows from the torque constant `motor_k_S` (N*m/A); the
/// controller efficiency is `motor_eta_C`.
///
/// # Errors
///
/// Returns a [`ModelError`] if a motor constant is missing or `motor_k_S`
/// or `motor_eta_C` is not positive.
pub fn motor_efficiency(
    torque: f64,
    speed_rpm: f64,
    params: &Params,
) -> Result<MotorOperatingPoint, ModelError> {
    let k_s = params.require(NAME, "motor_k_S")?;
    let eta_c = params.require(NAME, "motor_eta_C")?;
    for (key, value) in [("motor_k_S", k_s), ("motor_eta_C", eta_c)] {
        if value <= 0.0 {
            return Err(ModelError::InvalidParam {
                model: NAME,
                key: key.to_string(),
                reason: "must be > 0".to_string(),
            });
        }
    }
    let constants = MotorConstants::from_params(params)?;

    let current = torque / k_s;
    let shaft_power = torque * rpm_to_rad_per_s(speed_rpm);
    let losses = constants.losses(current, speed_rpm);
    let motor_input_power = shaft_power + losses.total();
    let motor_efficiency = if motor_input_power > 0.0 {
        shaft_power / motor_input_power
    } else {
        0.0
    };
    let controller_loss = motor_input_power * (1.0 / eta_c - 1.0);
    let battery_input_power = motor_input_power / eta_c;
    let system_efficiency = if battery_input_power > 0.0 {
        shaft_power / battery_input_power
    } else {
        0.0
    };

    Ok(MotorOperatingPoint {
        current,
        speed_rpm,
        torque,
        shaft_power,
        motor_input_power,
        battery_input_power,
        controller_loss,
        motor_efficiency,
        system_efficiency,
        losses,
    })
}

/// Motor loss model driven by the road-load power of the current step.
///
/// Must run after the drag and rolling resistance models, whose
/// `drag_power` and `rr_power` outputs set the motor current.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotorLossModel;

impl EnergyModel for MotorLossModel {
    fn update(&mut self, params: &mut Params, dt_s: f64) -> Result<f64, ModelError> {
        let velocity = params.require(NAME, "velocity")?;
        let wheel_diameter = params.require(NAME, "wheel_diameter")?;
        let voltage = params.require(NAME, "battery_voltage_nominal")?;
        if wheel_diameter <= 0.0 || voltage <= 0.0 {
            let key = if wheel_diameter <= 0.0 {
                "wheel_diameter"
            } else {
                "battery_voltage_nominal"
            };
            return Err(ModelError::InvalidParam {
                model: NAME,
                key: key.to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        let road_power = params.get_or("drag_power", 0.0) + params.get_or("rr_power", 0.0);
        let constants = MotorConstants::from_params(params)?;

        let speed_rpm = velocity / (PI * wheel_diameter) * 60.0;
        let current = road_power.abs() / voltage;
        let losses = constants.losses(current, speed_rpm);

        params.set("motor_current", current, Unit::Amperes);
        params.set("motor_speed", speed_rpm, Unit::Rpm);
        for (key, value) in [
            ("motor_P_armature", losses.armature),
            ("motor_P_commutation", losses.commutation),
            ("motor_P_copper_total", losses.copper()),
            ("motor_P_hysteresis", losses.hysteresis),
            ("motor_P_eddy", losses.eddy),
            ("motor_P_bearing", losses.bearing),
            ("motor_P_air_drag", losses.air_drag),
            ("motor_P_stray_total", losses.stray()),
            ("motor_P_total", losses.total()),
        ] {
            params.set(key, value, Unit::Watts);
        }

        Ok(-losses.total() * dt_s)
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn required_params(&self) -> &'static [&'static str] {
        &[
            "velocity",
            "wheel_diameter",
            "battery_voltage_nominal",
            "motor_R_A",
            "motor_R_B",
            "motor_k_H_default",
            "motor_k_E_default",
            "motor_k_B1_default",
            "motor_k_B2_default",
            "motor_k_D_default",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Params {
        let mut p = Params::new();
        p.set("velocity", 10.0, Unit::MetersPerSecond);
        p.set("wheel_diameter", 0.5, Unit::Meters);
        p.set("battery_voltage_nominal", 100.0, Unit::Volts);
        p.set("drag_power", -150.0, Unit::Watts);
        p.set("rr_power", -50.0, Unit::Watts);
        p.set("motor_R_A", 0.05, Unit::Ohms);
        p.set("motor_R_B", 0.01, Unit::Ohms);
        p.set("motor_k_H_default", 0.02, Unit::WattsPerRpm);
        p.set("motor_k_E_default", 1e-5, Unit::WattsPerRpm2);
        p.set("motor_k_B1_default", 0.004, Unit::WattsPerRpm);
        p.set("motor_k_B2_default", 2e-7, Unit::WattsPerRpm2);
        p.set("motor_k_D_default", 1e-9, Unit::WattsPerRpm3);
        p.set("motor_k_S", 0.8, Unit::NewtonMetersPerAmpere);
        p.set("motor_eta_C", 0.98, Unit::Dimensionless);
        p
    }

    #[test]
    fn current_follows_road_load() {
        let mut p = params();
        MotorLossModel.update(&mut p, 1.0).unwrap();
        assert!((p.get("motor_current").unwrap() - 2.0).abs() < 1e-12);
        let rpm = 10.0 / (PI * 0.5) * 60.0;
        assert!((p.get("motor_speed").unwrap() - rpm).abs() < 1e-9);
    }

    #[test]
    fn total_is_sum_of_terms() {
        let mut p = params();
        let energy = MotorLossModel.update(&mut p, 5.0).unwrap();
        let copper = p.get("motor_P_copper_total").unwrap();
        let stray = p.get("motor_P_stray_total").unwrap();
        let total = p.get("motor_P_total").unwrap();
        assert!((copper + stray - total).abs() < 1e-12);
        assert!((energy + total * 5.0).abs() < 1e-9);
        assert!(energy < 0.0);
    }

    #[test]
    fn copper_loss_is_i_squared_r() {
        let losses = MotorConstants::from_params(&params()).unwrap().losses(10.0, 0.0);
        assert!((losses.armature - 5.0).abs() < 1e-12);
        assert!((losses.commutation - 1.0).abs() < 1e-12);
        assert_eq!(losses.stray(), 0.0);
    }

    #[test]
    fn zero_wheel_diameter_is_invalid() {
        let mut p = params();
        p.set("wheel_diameter", 0.0, Unit::Meters);
        let err = MotorLossModel.update(&mut p, 1.0).unwrap_err();
        assert!(matches!(err, ModelError::InvalidParam { ref key, .. } if key == "wheel_diameter"));
    }

    #[test]
    fn efficiency_chain_is_consistent() {
        let p = params();
        let op = motor_efficiency(8.0, 400.0, &p).unwrap();
        assert!((op.current - 10.0).abs() < 1e-12);
        assert!((op.shaft_power - 8.0 * rpm_to_rad_per_s(400.0)).abs() < 1e-9);
        assert!(op.motor_efficiency > 0.0 && op.motor_efficiency < 1.0);
        assert!(op.system_efficiency < op.motor_efficiency);
        assert!((op.battery_input_power - op.motor_input_power - op.controller_loss).abs() < 1e-9);
    }

    #[test]
    fn zero_torque_has_zero_efficiency() {
        let op = motor_efficiency(0.0, 0.0, &params()).unwrap();
        assert_eq!(op.motor_efficiency, 0.0);
        assert_eq!(op.system_efficiency, 0.0);
    }
}
