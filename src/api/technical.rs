//! Scoring for caller-supplied bars.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::error::Result;
use crate::types::{PriceBar, ScoreReport};
use crate::AppState;

/// Request body for ad-hoc scoring.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub bars: Vec<PriceBar>,
}

/// Create the technical router.
pub fn router() -> Router<AppState> {
    Router::new().route("/score", post(score_bars))
}

/// Score the posted bars with the server's engine configuration.
async fn score_bars(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreReport>> {
    let report = state.technical.score_bars(request.bars)?;
    Ok(Json(report))
}
