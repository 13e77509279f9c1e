//! Per-ticker endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::error::Result;
use crate::types::{Recommendation, Score, ScoreReport};
use crate::AppState;

/// Headline technical score for a ticker.
#[derive(Debug, Serialize)]
pub struct TechnicalResponse {
    pub ticker: String,
    pub recommendation: Recommendation,
    pub score: Score,
}

/// Full per-rule breakdown for a ticker.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub ticker: String,
    pub report: ScoreReport,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub ticker: String,
    pub inserted: usize,
}

/// Create the stock router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:ticker/technical", get(get_technical))
        .route("/:ticker/technical/report", get(get_report))
        .route("/:ticker/refresh", post(refresh))
}

/// Get the recommendation and score for a ticker.
async fn get_technical(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<TechnicalResponse>> {
    let (ticker, recommendation, score) = state.technical.score_ticker(&ticker).await?;
    Ok(Json(TechnicalResponse {
        ticker,
        recommendation,
        score,
    }))
}

/// Get every rule's vote and readings for a ticker.
async fn get_report(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<ReportResponse>> {
    let (ticker, report) = state.technical.report(&ticker).await?;
    Ok(Json(ReportResponse { ticker, report }))
}

/// Pull new daily bars for a ticker.
async fn refresh(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<RefreshResponse>> {
    let (ticker, inserted) = state.technical.refresh(&ticker).await?;
    Ok(Json(RefreshResponse { ticker, inserted }))
}
