use axum::Router;
use std::sync::Arc;
use stockscore::services::{
    BarStore, MarketDataIngestor, SignalEngine, SqliteSeriesStore, TechnicalService,
};
use stockscore::sources::YahooFinanceClient;
use stockscore::{api, AppState, Config};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockscore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting stockscore server on {}:{}", config.host, config.port);
    info!("Scoring rules: {:?}", config.scoring);

    // Open the bar store
    let store: Arc<dyn BarStore> = Arc::new(SqliteSeriesStore::new(&config.database_path)?);
    info!("Using bar store at {}", config.database_path);

    // Wire up scoring, with Yahoo ingestion when enabled
    let engine = SignalEngine::new(config.scoring);
    let mut technical = TechnicalService::new(store.clone(), engine, config.score_window);
    if config.yahoo_enabled {
        let client = Arc::new(YahooFinanceClient::new()?);
        let ingestor = MarketDataIngestor::new(store.clone(), client);
        technical = technical.with_ingestor(ingestor, config.refresh_on_request);
        info!(
            "Yahoo Finance ingestion enabled (refresh on request: {})",
            config.refresh_on_request
        );
    }

    // Create application state
    let state = AppState {
        config: config.clone(),
        technical: Arc::new(technical),
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("stockscore server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
