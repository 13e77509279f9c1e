//! Liveness endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Bars scored per ticker request.
    score_window: usize,
    yahoo_enabled: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        score_window: state.config.score_window,
        yahoo_enabled: state.config.yahoo_enabled,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
