//! Step-based energy simulation of a solar race car.
//!
//! A flat [`params::Params`] dictionary, loaded from a scenario file or a
//! preset, configures a [`sim::VehicleModel`]. Each timestep the vehicle's
//! sub-models ([`models`]) read the dictionary, write their outputs back, and
//! return the energy they contributed; the [`sim::Engine`] steps the vehicle
//! through one race day and records the requested parameters.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
/// Scenario files, presets and validation.
pub mod config;
pub mod error;
/// Telemetry export and weather input.
pub mod io;
pub mod logging;
pub mod models;
pub mod params;
pub mod runner;
/// Vehicle, engine, clock and run summary.
pub mod sim;
#[cfg(feature = "tui")]
pub mod tui;
pub mod units;
