//! Common trait and identifiers for sub-models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::params::Params;

/// A physical sub-model that contributes energy each timestep.
///
/// Implementations read their inputs from `params`, write their intermediate
/// outputs (forces, powers, modifiers) back into it, and return the energy
/// contributed over the step.
pub trait EnergyModel {
    /// Returns the energy contributed over `dt_s` seconds, in joules.
    ///
    /// Positive values are harvested energy (array), negative values are
    /// consumed energy (drag, rolling resistance, losses).
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] when a required parameter is missing or invalid.
    fn update(&mut self, params: &mut Params, dt_s: f64) -> Result<f64, ModelError>;

    /// Short stable identifier used in logs and energy breakdowns.
    fn name(&self) -> &'static str;

    /// Configuration parameters this model reads and never writes itself.
    fn required_params(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Identifier for every built-in sub-model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Drag,
    RollingResistance,
    Array,
    Motor,
    Battery,
    LvDraw,
    Weather,
}

impl ModelKind {
    /// Every kind, in a valid execution order.
    pub const ALL: [ModelKind; 7] = [
        ModelKind::Weather,
        ModelKind::RollingResistance,
        ModelKind::Drag,
        ModelKind::Array,
        ModelKind::Motor,
        ModelKind::LvDraw,
        ModelKind::Battery,
    ];

    /// The set added by default when a scenario does not name its models.
    pub const DEFAULT_SET: [ModelKind; 4] = [
        ModelKind::RollingResistance,
        ModelKind::Drag,
        ModelKind::Array,
        ModelKind::Battery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drag => "drag",
            Self::RollingResistance => "rolling_resistance",
            Self::Array => "array",
            Self::Motor => "motor",
            Self::Battery => "battery",
            Self::LvDraw => "lv_draw",
            Self::Weather => "weather",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "drag" => Ok(Self::Drag),
            "rolling_resistance" | "rr" => Ok(Self::RollingResistance),
            "array" => Ok(Self::Array),
            "motor" => Ok(Self::Motor),
            "battery" => Ok(Self::Battery),
            "lv_draw" | "lv" => Ok(Self::LvDraw),
            "weather" => Ok(Self::Weather),
            other => Err(format!(
                "unknown model \"{other}\", available: {}",
                ModelKind::ALL.map(ModelKind::as_str).join(", ")
            )),
        }
    }
}
