//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// EMA (Exponential Moving Average) indicator.
///
/// Seeded with the first close of the window and smoothed forward through
/// every bar with `alpha = 2 / (period + 1)`. The whole window contributes,
/// so the reading depends on how much history the caller passes in.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Smoothing factor for a period.
pub fn alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// EMA at every position of `values`, seeded with the first value.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let multiplier = alpha(period);
    let mut out = Vec::with_capacity(values.len());

    let mut iter = values.iter();
    let Some(&seed) = iter.next() else {
        return out;
    };

    let mut ema = seed;
    out.push(ema);
    for &value in iter {
        // Written as a correction so a constant input never drifts.
        ema += (value - ema) * multiplier;
        out.push(ema);
    }

    out
}

/// EMA at the last position of `values`.
pub fn ema_latest(values: &[f64], period: usize) -> Option<f64> {
    let multiplier = alpha(period);
    let (&seed, rest) = values.split_first()?;
    Some(
        rest.iter()
            .fold(seed, |ema, &value| ema + (value - ema) * multiplier),
    )
}

impl Indicator for Ema {
    type Output = f64;

    fn name(&self) -> &'static str {
        "EMA"
    }

    fn min_periods(&self) -> usize {
        self.period.max(1)
    }

    fn calculate(&self, bars: &[PriceBar]) -> Option<f64> {
        if bars.len() < self.min_periods() {
            return None;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_latest(&closes, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_util::{assert_close, bars_from_closes, rising_bars};

    #[test]
    fn test_ema_constant_series_is_exact() {
        for &value in &[0.0, 1.0, 37.125, 101.37, 98765.4321] {
            for period in [2, 9, 12, 26, 50, 200] {
                let bars = bars_from_closes(&vec![value; 250]);
                let ema = Ema::new(period).calculate(&bars).unwrap();
                assert_eq!(ema, value, "period {period}");
            }
        }
    }

    #[test]
    fn test_ema_hand_computed() {
        // alpha = 0.5 for period 3
        let values = [10.0, 20.0, 10.0];
        let series = ema_series(&values, 3);
        assert_eq!(series, vec![10.0, 15.0, 12.5]);
        assert_eq!(ema_latest(&values, 3), Some(12.5));
    }

    #[test]
    fn test_ema_series_matches_latest() {
        let closes: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let series = ema_series(&closes, 12);
        assert_eq!(series.len(), closes.len());
        assert_close!(*series.last().unwrap(), ema_latest(&closes, 12).unwrap());
    }

    #[test]
    fn test_ema_insufficient_data() {
        let ema = Ema::new(50);
        assert!(ema.calculate(&rising_bars(49)).is_none());
        assert!(ema.calculate(&rising_bars(50)).is_some());
    }

    #[test]
    fn test_shorter_ema_tracks_uptrend_closer() {
        let bars = rising_bars(250);
        let fast = Ema::new(50).calculate(&bars).unwrap();
        let slow = Ema::new(200).calculate(&bars).unwrap();
        let last = bars.last().unwrap().close;
        assert!(fast > slow);
        assert!(fast < last);
    }

    #[test]
    fn test_empty_input() {
        assert!(ema_series(&[], 5).is_empty());
        assert_eq!(ema_latest(&[], 5), None);
    }
}
