//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::config::{LoadError, Scenario};
use crate::models::ModelKind;

/// Printed when no configuration source is given.
pub const USAGE_ERROR: &str = "Please input a YAML config!";

/// Exit code for a wrong invocation (255 on Unix).
pub const USAGE_EXIT_CODE: i32 = -1;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "vehicle-sim",
    version,
    about = "Step-based energy simulation of a solar race car over one race day."
)]
#[command(group(ArgGroup::new("source").required(true).args(["config", "preset"])))]
pub struct Cli {
    /// Scenario file (YAML, or TOML when the extension is .toml)
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Use a built-in scenario instead of a file (baseline, overcast, headwind)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Sub-model to attach, in order; repeat to add several. Replaces the
    /// scenario's model list.
    #[arg(short, long = "model", value_name = "MODEL")]
    pub models: Vec<ModelKind>,

    /// Parameters to record each step, comma separated. Replaces the
    /// scenario's log list.
    #[arg(short, long, value_name = "PARAM", value_delimiter = ',')]
    pub log: Vec<String>,

    /// Hourly weather CSV driving the weather model
    #[arg(long, value_name = "PATH")]
    pub weather: Option<PathBuf>,

    /// Export step records to CSV
    #[arg(long, value_name = "PATH")]
    pub telemetry_out: Option<PathBuf>,

    /// Print the parameter dictionary before and after the run
    #[arg(long)]
    pub print_params: bool,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a file in addition to stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Start the REST API server after the run
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Watch the run live in a terminal dashboard
    #[cfg(feature = "tui")]
    #[arg(long)]
    pub tui: bool,
}

impl Cli {
    /// Loads the selected scenario and applies `--model` and `--log`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file or preset cannot be loaded, or
    /// [`LoadError::NoSource`] when neither is set.
    pub fn load_scenario(&self) -> Result<Scenario, LoadError> {
        let mut scenario = match (&self.config, &self.preset) {
            (Some(path), _) => Scenario::from_path(path)?,
            (None, Some(name)) => Scenario::from_preset(name)?,
            (None, None) => return Err(LoadError::NoSource),
        };
        if !self.models.is_empty() {
            scenario.models = self.models.clone();
        }
        if !self.log.is_empty() {
            scenario.log = self.log.clone();
        }
        Ok(scenario)
    }
}
