//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use indexmap::IndexMap;

use super::AppState;
use super::types::{
    ErrorResponse, ParamEntry, StateResponse, TelemetryQuery, TelemetryRecord, param_entries,
};

/// Returns run timing, summary and the latest step record.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let latest = state
        .records
        .last()
        .map(|r| TelemetryRecord::new(r, &state.columns));

    Json(StateResponse {
        scenario: state.scenario.clone(),
        config: state.config,
        summary: state.summary.clone(),
        latest_step: latest,
    })
}

/// Returns step records, optionally filtered by step range.
///
/// `GET /telemetry` → 200 + `Vec<TelemetryRecord>` JSON
/// `GET /telemetry?from=N&to=M` → filtered range (inclusive)
/// `GET /telemetry?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_telemetry(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TelemetryQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<TelemetryRecord> = state
        .records
        .iter()
        .filter(|r| r.step >= from && r.step <= to)
        .map(|r| TelemetryRecord::new(r, &state.columns))
        .collect();

    Ok(Json(records))
}

/// Returns the parameter dictionary as it stood after the last step.
///
/// `GET /params` → 200 + `{name: {value, unit}}` JSON
pub async fn get_params(State(state): State<Arc<AppState>>) -> Json<IndexMap<String, ParamEntry>> {
    Json(param_entries(&state.params))
}
