//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::{ema_latest, ema_series};
use crate::services::signals::{Indicator, SignalLineSource};
use crate::types::PriceBar;

/// MACD line and its signal line at the last bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
}

/// MACD indicator.
///
/// - MACD Line = EMA(12) - EMA(26), both seeded at the first close
/// - Signal Line = EMA(9) of either the close or the MACD line
///
/// Smoothing the close is the historical behaviour of this score and stays
/// the default; [`SignalLineSource::Indicator`] gives the textbook line.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    signal_source: SignalLineSource,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            signal_source: SignalLineSource::Price,
        }
    }
}

impl Macd {
    pub fn with_signal_source(signal_source: SignalLineSource) -> Self {
        Self {
            signal_source,
            ..Self::default()
        }
    }
}

impl Indicator for Macd {
    type Output = MacdReading;

    fn name(&self) -> &'static str {
        "MACD"
    }

    fn min_periods(&self) -> usize {
        self.slow_period.max(self.fast_period)
    }

    fn calculate(&self, bars: &[PriceBar]) -> Option<MacdReading> {
        if bars.len() < self.min_periods() {
            return None;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        match self.signal_source {
            SignalLineSource::Price => {
                let fast = ema_latest(&closes, self.fast_period)?;
                let slow = ema_latest(&closes, self.slow_period)?;
                Some(MacdReading {
                    macd: fast - slow,
                    signal: ema_latest(&closes, self.signal_period)?,
                })
            }
            SignalLineSource::Indicator => {
                let fast = ema_series(&closes, self.fast_period);
                let slow = ema_series(&closes, self.slow_period);
                let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
                Some(MacdReading {
                    macd: *macd_line.last()?,
                    signal: ema_latest(&macd_line, self.signal_period)?,
                })
            }
        }
    }
}
