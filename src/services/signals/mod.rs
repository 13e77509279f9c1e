//! Technical scoring engine.
//!
//! Computes indicator readings over a daily price series, turns them into
//! one vote per rule and classifies the summed score into a recommendation.
//! Everything in here is pure: no I/O, no shared state.

pub mod indicators;
pub mod rules;
pub mod score;

#[cfg(test)]
pub(crate) mod test_util;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScoreError;
use crate::types::{PriceBar, PriceSeries, Recommendation, Score, ScoreReport};

/// Trait for implementing technical indicators.
pub trait Indicator {
    /// Reading produced at the last bar.
    type Output;

    /// Human-readable name.
    fn name(&self) -> &'static str;

    /// Minimum number of bars required for calculation.
    fn min_periods(&self) -> usize;

    /// Calculate the reading at the last bar.
    /// Returns None if there are fewer than `min_periods` bars.
    fn calculate(&self, bars: &[PriceBar]) -> Option<Self::Output>;
}

/// Series a signal line is smoothed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalLineSource {
    /// Smooth the closing price.
    #[default]
    Price,
    /// Smooth the indicator's own series.
    Indicator,
}

impl SignalLineSource {
    /// Parse from a config string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "price" | "close" => Some(Self::Price),
            "indicator" | "macd" | "k" | "percent_k" => Some(Self::Indicator),
            _ => None,
        }
    }
}

/// Tunable behaviour of the scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// MACD signal line: EMA(9) of price, or EMA(9) of the MACD line.
    pub macd_signal: SignalLineSource,
    /// Stochastic smoothing: SMA(3) of %K, or SMA(3) of price.
    pub stochastic_signal: SignalLineSource,
    /// Build the Donchian channel from the bars before the last one.
    pub donchian_exclude_current: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            macd_signal: SignalLineSource::Price,
            stochastic_signal: SignalLineSource::Indicator,
            donchian_exclude_current: false,
        }
    }
}

/// Shortest series the engine accepts: the 200-bar moving averages.
pub const MIN_BARS: usize = 200;

/// Scores price series with a fixed rule configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalEngine {
    config: ScoringConfig,
}

impl SignalEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Number of bars a series needs before every rule is defined.
    pub fn required_bars(&self) -> usize {
        rules::required_bars(&self.config).max(MIN_BARS)
    }

    /// Score a series and return the full per-rule breakdown.
    pub fn evaluate(&self, series: &PriceSeries) -> Result<ScoreReport, ScoreError> {
        let required = self.required_bars();
        if series.len() < required {
            return Err(ScoreError::InsufficientData {
                required,
                actual: series.len(),
            });
        }

        let bars = series.bars();
        let votes = rules::evaluate(bars, &self.config)?;
        let (recommendation, score) = score::aggregate(&votes);

        let as_of = series
            .last()
            .map(|b| b.date)
            .ok_or(ScoreError::InsufficientData {
                required,
                actual: 0,
            })?;

        debug!(
            "Scored {} bars up to {}: {} ({})",
            bars.len(),
            as_of,
            recommendation.label(),
            score
        );

        Ok(ScoreReport {
            recommendation,
            score,
            votes,
            bars: bars.len(),
            as_of,
        })
    }
}

/// Score a series with the default rule configuration.
pub fn compute_score(series: &PriceSeries) -> Result<(Recommendation, Score), ScoreError> {
    let report = SignalEngine::default().evaluate(series)?;
    Ok((report.recommendation, report.score))
}

#[cfg(test)]
mod tests {
    use super::test_util::{rising_bars, series};
    use super::*;

    #[test]
    fn test_signal_line_source_parse() {
        assert_eq!(SignalLineSource::parse("price"), Some(SignalLineSource::Price));
        assert_eq!(SignalLineSource::parse(" MACD "), Some(SignalLineSource::Indicator));
        assert_eq!(SignalLineSource::parse("k"), Some(SignalLineSource::Indicator));
        assert_eq!(SignalLineSource::parse("nope"), None);
    }

    #[test]
    fn test_required_bars() {
        assert_eq!(SignalEngine::default().required_bars(), 200);
        let engine = SignalEngine::new(ScoringConfig {
            donchian_exclude_current: true,
            ..ScoringConfig::default()
        });
        assert_eq!(engine.required_bars(), 200);
    }

    #[test]
    fn test_insufficient_data_boundary() {
        let short = series(rising_bars(199));
        assert_eq!(
            compute_score(&short),
            Err(ScoreError::InsufficientData {
                required: 200,
                actual: 199
            })
        );

        let exact = series(rising_bars(200));
        assert!(compute_score(&exact).is_ok());
    }

    #[test]
    fn test_report_shape() {
        let s = series(rising_bars(220));
        let report = SignalEngine::default().evaluate(&s).unwrap();
        assert_eq!(report.votes.len(), 9);
        assert_eq!(report.bars, 220);
        assert_eq!(report.as_of, s.last().unwrap().date);
        let sum: i8 = report.votes.iter().map(|v| v.vote.value()).sum();
        assert_eq!(report.score.value(), sum);
        assert_eq!(report.recommendation, Recommendation::from_score(report.score));
    }

    #[test]
    fn test_idempotent() {
        let s = series(rising_bars(260));
        let engine = SignalEngine::default();
        assert_eq!(engine.evaluate(&s).unwrap(), engine.evaluate(&s).unwrap());
        assert_eq!(compute_score(&s).unwrap(), compute_score(&s).unwrap());
    }
}
