//! Physical sub-models composed by the vehicle.

/// Solar array optics and generation.
pub mod array;
/// ESR battery loss model.
pub mod battery;
/// Aerodynamic drag.
pub mod drag;
/// Low-voltage auxiliary draw.
pub mod lv_draw;
/// Motor copper and stray losses.
pub mod motor;
/// Rolling resistance.
pub mod rolling_resistance;
pub mod types;
/// Weather conditions and their modifiers.
pub mod weather;

pub use array::ArrayModel;
pub use battery::BatteryModel;
pub use drag::DragModel;
pub use lv_draw::LvDrawModel;
pub use motor::MotorLossModel;
pub use rolling_resistance::RollingResistanceModel;
pub use types::{EnergyModel, ModelKind};
pub use weather::WeatherModel;

/// Builds a boxed sub-model of the given kind with its default settings.
///
/// The weather model is built without a weather table; attach one with
/// [`WeatherModel::with_table`] and add it directly when needed.
pub fn build(kind: ModelKind) -> Box<dyn EnergyModel> {
    match kind {
        ModelKind::Drag => Box::new(DragModel),
        ModelKind::RollingResistance => Box::new(RollingResistanceModel),
        ModelKind::Array => Box::new(ArrayModel),
        ModelKind::Motor => Box::new(MotorLossModel),
        ModelKind::Battery => Box::new(BatteryModel),
        ModelKind::LvDraw => Box::new(LvDrawModel),
        ModelKind::Weather => Box::new(WeatherModel::new()),
    }
}
