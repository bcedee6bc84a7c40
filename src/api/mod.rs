//! REST API over a completed run.
//!
//! Provides three GET endpoints:
//! - `/state` returns the run timing, summary and latest step
//! - `/telemetry` returns step records, optionally filtered by step range
//! - `/params` returns the final parameter dictionary with units

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::params::Params;
use crate::runner::RunOutput;
use crate::sim::{RunSummary, SimConfig, StepRecord};

pub use types::{ErrorResponse, ParamEntry, StateResponse, TelemetryQuery, TelemetryRecord};

/// Immutable application state shared across all request handlers.
///
/// Built once after the run completes and wrapped in `Arc`; handlers only
/// read from it.
#[derive(Debug)]
pub struct AppState {
    pub scenario: String,
    pub config: SimConfig,
    pub summary: RunSummary,
    /// Logged parameter names, aligned with each record's values.
    pub columns: Vec<String>,
    pub records: Vec<StepRecord>,
    /// Parameter dictionary after the last step.
    pub params: Params,
}

impl From<RunOutput> for AppState {
    fn from(out: RunOutput) -> Self {
        Self {
            scenario: out.scenario,
            config: out.config,
            summary: out.summary,
            columns: out.columns,
            records: out.records,
            params: out.params,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/telemetry", get(handlers::get_telemetry))
        .route("/params", get(handlers::get_params))
        .with_state(state)
}

/// Binds to `addr` and serves the API until the process is stopped.
///
/// # Errors
///
/// Returns the I/O error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
