use crate::error::ModelError;
use crate::models::types::EnergyModel;
use crate::params::Params;
use crate::units::Unit;

const NAME: &str = "battery";

/// Pack resistance from cell impedance and topology (ohm).
///
/// Parallel strings divide the cell impedance; series cells add it.
pub fn pack_resistance(cell_impedance: f64, cells_in_parallel: f64, cells_in_series: f64) -> f64 {
    cell_impedance / cells_in_parallel * cells_in_series
}

/// Equivalent-series-resistance battery loss model.
///
/// The pack current is `|net_power| / battery_voltage_nominal`, where
/// `net_power` is published by the vehicle from the other models' energy this
/// step. Setting `current_draw_override` pins the current instead. The loss
/// `I^2 R` is written to `battery_power_loss`.
///
/// The vehicle runs this model after every other one.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatteryModel;

impl EnergyModel for BatteryModel {
    fn update(&mut self, params: &mut Params, dt_s: f64) -> Result<f64, ModelError> {
        let impedance = params.require(NAME, "cell_internal_impedance")?;
        let parallel = params.require(NAME, "cells_in_parallel")?;
        let series = params.require(NAME, "cells_in_series")?;
        if parallel <= 0.0 {
            return Err(ModelError::InvalidParam {
                model: NAME,
                key: "cells_in_parallel".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        let resistance = pack_resistance(impedance, parallel, series);

        let current = match params.get("current_draw_override") {
            Some(pinned) => pinned,
            None => {
                let voltage = params.require(NAME, "battery_voltage_nominal")?;
                if voltage <= 0.0 {
                    return Err(ModelError::InvalidParam {
                        model: NAME,
                        key: "battery_voltage_nominal".to_string(),
                        reason: "must be > 0".to_string(),
                    });
                }
                params.get_or("net_power", 0.0).abs() / voltage
            }
        };
        let loss = current * current * resistance;

        params.set("pack_resistance", resistance, Unit::Ohms);
        params.set("current_draw", current, Unit::Amperes);
        params.set("battery_power_loss", loss, Unit::Watts);
        Ok(-loss * dt_s)
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn required_params(&self) -> &'static [&'static str] {
        &[
            "cell_internal_impedance",
            "cells_in_parallel",
            "cells_in_series",
            "battery_voltage_nominal",
        ]
    }
}
