//! Stockscore - technical-analysis scoring service for stock tickers

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use std::sync::Arc;

pub use config::Config;
pub use error::{AppError, Result, ScoreError};
pub use services::{compute_score, SignalEngine};
pub use types::{PriceBar, PriceSeries, Recommendation, Score, ScoreReport};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub technical: Arc<services::TechnicalService>,
}
