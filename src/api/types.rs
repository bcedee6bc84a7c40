//! API response and query types.
//!
//! Telemetry field names match the CSV export columns.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::params::Params;
use crate::sim::{RunSummary, SimConfig, StepRecord};

/// Combined state response: timing, summary and latest step.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub scenario: String,
    pub config: SimConfig,
    pub summary: RunSummary,
    /// Last step of the run, absent when the run had no steps.
    pub latest_step: Option<TelemetryRecord>,
}

/// Single step record with logged values keyed by parameter name.
#[derive(Debug, Serialize)]
pub struct TelemetryRecord {
    pub step: usize,
    pub time_s: f64,
    pub distance_m: f64,
    pub total_energy_j: f64,
    pub net_energy_j: f64,
    /// `null` when the parameter did not exist at this step.
    pub values: IndexMap<String, Option<f64>>,
}

impl TelemetryRecord {
    pub fn new(record: &StepRecord, columns: &[String]) -> Self {
        Self {
            step: record.step,
            time_s: record.time_s,
            distance_m: record.distance_m,
            total_energy_j: record.total_energy_j,
            net_energy_j: record.net_energy_j,
            values: columns
                .iter()
                .cloned()
                .zip(record.values.iter().copied())
                .collect(),
        }
    }
}

/// One dictionary entry with its stored unit symbol.
#[derive(Debug, PartialEq, Serialize)]
pub struct ParamEntry {
    pub value: f64,
    pub unit: &'static str,
}

/// Maps the dictionary to `name -> {value, unit}` in insertion order.
pub fn param_entries(params: &Params) -> IndexMap<String, ParamEntry> {
    params
        .iter()
        .map(|(name, p)| {
            (
                name.to_string(),
                ParamEntry {
                    value: p.value,
                    unit: p.unit.symbol(),
                },
            )
        })
        .collect()
}

/// Optional range query parameters for the telemetry endpoint.
#[derive(Debug, Deserialize)]
pub struct TelemetryQuery {
    /// First step (inclusive).
    pub from: Option<usize>,
    /// Last step (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
