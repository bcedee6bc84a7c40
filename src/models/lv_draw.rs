use crate::error::ModelError;
use crate::models::types::EnergyModel;
use crate::params::Params;
use crate::units::Unit;

const NAME: &str = "lv_draw";

/// Low-voltage components powered from the auxiliary bus.
pub const LV_COMPONENTS: [&str; 14] = [
    "vcu",
    "controls_leader",
    "horn",
    "lighting",
    "pi_display",
    "pedals",
    "camera_hub",
    "battery_box",
    "mppt_a",
    "mppt_b",
    "mppt_c",
    "motor_controller",
    "telemetry_leader",
    "pump",
];

/// Auxiliary load of the low-voltage system.
///
/// Each component draws `lv_<name>_current` (A). With `lv_peak_mode` set to a
/// non-zero value, `lv_<name>_current_peak` is used where configured.
/// Components with no configured current draw nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LvDrawModel;

impl LvDrawModel {
    fn component_current(params: &Params, component: &str, peak_mode: bool) -> f64 {
        let steady = params.get_or(&format!("lv_{component}_current"), 0.0);
        if peak_mode {
            params
                .get(&format!("lv_{component}_current_peak"))
                .unwrap_or(steady)
        } else {
            steady
        }
    }
}

impl EnergyModel for LvDrawModel {
    fn update(&mut self, params: &mut Params, dt_s: f64) -> Result<f64, ModelError> {
        let voltage = params.require(NAME, "lv_bus_voltage")?;
        let peak_mode = params.get_or("lv_peak_mode", 0.0) != 0.0;

        let current: f64 = LV_COMPONENTS
            .iter()
            .map(|c| Self::component_current(params, c, peak_mode))
            .sum();
        let power = current * voltage;

        params.set("lv_draw_current", current, Unit::Amperes);
        params.set("lv_draw_power", power, Unit::Watts);
        Ok(-power * dt_s)
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn required_params(&self) -> &'static [&'static str] {
        &["lv_bus_voltage"]
    }
}
