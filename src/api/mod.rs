pub mod health;
pub mod stock;
pub mod technical;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/stock", stock::router())
        .nest("/api/technical", technical::router())
}
