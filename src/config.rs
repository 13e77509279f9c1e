use std::env;
use tracing::warn;

use crate::services::signals::{ScoringConfig, SignalLineSource, MIN_BARS};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Path of the SQLite bar store.
    pub database_path: String,
    /// Number of most recent bars scored per request (at least 200).
    pub score_window: usize,
    /// Pull new bars from Yahoo before scoring a ticker.
    pub refresh_on_request: bool,
    /// Enable the Yahoo Finance client at all.
    pub yahoo_enabled: bool,
    /// Rule switches for the scoring engine.
    pub scoring: ScoringConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_path: "stockscore.db".to_string(),
            score_window: MIN_BARS,
            refresh_on_request: true,
            yahoo_enabled: true,
            scoring: ScoringConfig::default(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_flag(key: &str, value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => parse_bool(&v).unwrap_or_else(|| {
            warn!("Ignoring unknown {}={:?}, using {}", key, v, default);
            default
        }),
        None => default,
    }
}

fn parse_source(key: &str, value: Option<String>, default: SignalLineSource) -> SignalLineSource {
    match value {
        Some(v) => SignalLineSource::parse(&v).unwrap_or_else(|| {
            warn!("Ignoring unknown {}={:?}, using {:?}", key, v, default);
            default
        }),
        None => default,
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| parse_flag(key, lookup(key), default);

        let scoring = ScoringConfig {
            macd_signal: parse_source(
                "MACD_SIGNAL_SOURCE",
                lookup("MACD_SIGNAL_SOURCE"),
                defaults.scoring.macd_signal,
            ),
            stochastic_signal: parse_source(
                "STOCHASTIC_SIGNAL_SOURCE",
                lookup("STOCHASTIC_SIGNAL_SOURCE"),
                defaults.scoring.stochastic_signal,
            ),
            donchian_exclude_current: flag(
                "DONCHIAN_EXCLUDE_CURRENT",
                defaults.scoring.donchian_exclude_current,
            ),
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_path: lookup("DATABASE_PATH").unwrap_or(defaults.database_path),
            score_window: lookup("SCORE_WINDOW")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.score_window)
                .max(MIN_BARS),
            refresh_on_request: flag("REFRESH_ON_REQUEST", defaults.refresh_on_request),
            yahoo_enabled: flag("YAHOO_ENABLED", defaults.yahoo_enabled),
            scoring,
        }
    }
}
