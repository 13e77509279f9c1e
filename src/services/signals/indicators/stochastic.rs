//! Stochastic Oscillator indicator.

use super::sma::trailing_mean;
use crate::services::signals::{Indicator, SignalLineSource};
use crate::types::PriceBar;

/// %K at the last bar and the line it is compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticReading {
    pub percent_k: f64,
    pub smoothed: f64,
}

/// Stochastic Oscillator.
///
/// Compares closing price to price range over a period:
/// %K = (Current Close - Lowest Low) / (Highest High - Lowest Low) * 100
///
/// The smoothed line is the `d_period` SMA of %K, or of the close when the
/// signal source is [`SignalLineSource::Price`]. A window with no range
/// reads 50.
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    signal_source: SignalLineSource,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
            signal_source: SignalLineSource::Indicator,
        }
    }
}

impl Stochastic {
    pub fn with_signal_source(signal_source: SignalLineSource) -> Self {
        Self {
            signal_source,
            ..Self::default()
        }
    }

    /// %K for the window ending at `bars[end]`.
    fn percent_k_at(&self, bars: &[PriceBar], end: usize) -> f64 {
        let window = &bars[(end + 1 - self.k_period)..=end];

        let lowest_low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let highest_high = window
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);

        if highest_high > lowest_low {
            ((bars[end].close - lowest_low) / (highest_high - lowest_low)) * 100.0
        } else {
            50.0
        }
    }

    /// %K for each of the last `count` bars, oldest first.
    pub fn percent_k_series(&self, bars: &[PriceBar], count: usize) -> Option<Vec<f64>> {
        if self.k_period == 0 || bars.len() < self.k_period + count.saturating_sub(1) {
            return None;
        }
        let first = bars.len() - count;
        Some((first..bars.len()).map(|end| self.percent_k_at(bars, end)).collect())
    }
}

impl Indicator for Stochastic {
    type Output = StochasticReading;

    fn name(&self) -> &'static str {
        "Stochastic"
    }

    fn min_periods(&self) -> usize {
        match self.signal_source {
            SignalLineSource::Indicator => self.k_period + self.d_period.saturating_sub(1),
            SignalLineSource::Price => self.k_period.max(self.d_period),
        }
    }

    fn calculate(&self, bars: &[PriceBar]) -> Option<StochasticReading> {
        if self.k_period == 0 || self.d_period == 0 || bars.len() < self.min_periods() {
            return None;
        }

        match self.signal_source {
            SignalLineSource::Indicator => {
                let k_values = self.percent_k_series(bars, self.d_period)?;
                Some(StochasticReading {
                    percent_k: *k_values.last()?,
                    smoothed: trailing_mean(&k_values, self.d_period)?,
                })
            }
            SignalLineSource::Price => {
                let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
                Some(StochasticReading {
                    percent_k: self.percent_k_at(bars, bars.len() - 1),
                    smoothed: trailing_mean(&closes, self.d_period)?,
                })
            }
        }
    }
}
