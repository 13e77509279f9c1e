//! Relative Strength Index (RSI) indicator.

use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// RSI (Relative Strength Index) indicator.
///
/// Compares the simple average of gains to the simple average of losses over
/// the last `period` close-to-close changes. Values range from 0-100:
/// - Below 30: Oversold (potential buy signal)
/// - Above 70: Overbought (potential sell signal)
///
/// A window without losses reads 100.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate RSI value from the last `period` price changes.
    fn calculate_rsi(bars: &[PriceBar], period: usize) -> Option<f64> {
        if period == 0 || bars.len() < period + 1 {
            return None;
        }

        let window = &bars[bars.len() - (period + 1)..];
        let (gains, losses) = window
            .windows(2)
            .map(|pair| pair[1].close - pair[0].close)
            .fold((0.0, 0.0), |(gains, losses), change| {
                if change > 0.0 {
                    (gains + change, losses)
                } else {
                    (gains, losses - change)
                }
            });

        let avg_gain = gains / period as f64;
        let avg_loss = losses / period as f64;

        if avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn name(&self) -> &'static str {
        "RSI"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[PriceBar]) -> Option<f64> {
        Self::calculate_rsi(bars, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_util::{
        assert_close, bars_from_closes, falling_bars, rising_bars,
    };

    #[test]
    fn test_rsi_min_periods() {
        let rsi = Rsi::default();
        assert_eq!(rsi.min_periods(), 15);
        assert!(rsi.calculate(&rising_bars(14)).is_none());
        assert!(rsi.calculate(&rising_bars(15)).is_some());
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        assert_eq!(Rsi::default().calculate(&rising_bars(50)), Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses_is_0() {
        assert_eq!(Rsi::default().calculate(&falling_bars(50)), Some(0.0));
    }

    #[test]
    fn test_rsi_flat_window_reads_100() {
        let bars = bars_from_closes(&[10.0; 20]);
        assert_eq!(Rsi::default().calculate(&bars), Some(100.0));
    }

    #[test]
    fn test_rsi_hand_computed() {
        // changes: +2, -1, +2, -1 -> avg gain 1.0, avg loss 0.5, RS 2
        let bars = bars_from_closes(&[10.0, 12.0, 11.0, 13.0, 12.0]);
        let rsi = Rsi::new(4).calculate(&bars).unwrap();
        assert_close!(rsi, 100.0 - 100.0 / 3.0);
    }

    #[test]
    fn test_rsi_only_uses_trailing_window() {
        // a large early loss falls outside the 14-change window
        let mut closes = vec![500.0];
        closes.extend((0..20).map(|i| 100.0 + i as f64));
        let bars = bars_from_closes(&closes);
        assert_eq!(Rsi::default().calculate(&bars), Some(100.0));
    }

    #[test]
    fn test_rsi_value_range() {
        let closes: Vec<f64> = (0..100)
            .map(|i| 100.0 + ((i * 7919) % 23) as f64 - 11.0)
            .collect();
        let bars = bars_from_closes(&closes);
        for end in 15..=bars.len() {
            let rsi = Rsi::default().calculate(&bars[..end]).unwrap();
            assert!((0.0..=100.0).contains(&rsi), "rsi {rsi} out of range");
        }
    }
}
