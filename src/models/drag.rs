use crate::error::ModelError;
use crate::models::types::EnergyModel;
use crate::params::Params;
use crate::units::Unit;

const NAME: &str = "drag";

/// Aerodynamic drag on the whole vehicle.
///
/// ```text
/// F_drag = 0.5 * rho * v^2 * Cd * A * weather_drag_modifier
/// P_drag = -F_drag * v
/// ```
///
/// Writes `drag_force` (N) and `drag_power` (W, non-positive).
#[derive(Debug, Clone, Copy, Default)]
pub struct DragModel;

impl EnergyModel for DragModel {
    fn update(&mut self, params: &mut Params, dt_s: f64) -> Result<f64, ModelError> {
        let rho = params.require(NAME, "air_density")?;
        let velocity = params.require(NAME, "velocity")?;
        let cd = params.require(NAME, "drag_coeff")?;
        let area = params.require(NAME, "frontal_area")?;
        let modifier = params.get_or("weather_drag_modifier", 1.0);

        let force = 0.5 * rho * velocity * velocity * cd * area * modifier;
        let power = -(force * velocity);

        params.set("drag_force", force, Unit::Newtons);
        params.set("drag_power", power, Unit::Watts);
        Ok(power * dt_s)
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn required_params(&self) -> &'static [&'static str] {
        &["air_density", "velocity", "drag_coeff", "frontal_area"]
    }
}
