//! Error types shared across the simulator.

use std::io;

use thiserror::Error;

use crate::config::{ConfigError, LoadError};

/// Failure raised by a sub-model or by the vehicle while stepping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A parameter the model reads is absent from the dictionary.
    #[error("{model}: missing parameter \"{key}\"")]
    MissingParam { model: &'static str, key: String },

    /// A parameter is present but its value cannot be used.
    #[error("{model}: invalid parameter \"{key}\": {reason}")]
    InvalidParam {
        model: &'static str,
        key: String,
        reason: String,
    },
}

/// Top-level error for a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("{} invalid configuration value(s):\n{}", .0.len(), join_lines(.0))]
    Invalid(Vec<ConfigError>),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn join_lines(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
