//! Per-rule vote evaluation.
//!
//! Each rule compares indicator readings at the last bar and casts one vote.
//! Confirmation rules always lean one way; extremity rules stay neutral
//! unless the indicator is at an extreme.

use super::indicators::{
    BollingerBands, Donchian, Ema, Macd, Obv, Rsi, Sma, Stochastic, Vwap,
};
use super::{Indicator, ScoringConfig};
use crate::error::ScoreError;
use crate::types::{PriceBar, Rule, RuleVote, Vote};

const SHORT_TREND: usize = 50;
const LONG_TREND: usize = 200;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const STOCH_OVERSOLD: f64 = 20.0;
const STOCH_OVERBOUGHT: f64 = 80.0;

/// Bars needed before every rule under `config` is defined.
pub fn required_bars(config: &ScoringConfig) -> usize {
    [
        Sma::new(LONG_TREND).min_periods(),
        Ema::new(LONG_TREND).min_periods(),
        Macd::with_signal_source(config.macd_signal).min_periods(),
        Rsi::default().min_periods(),
        Stochastic::with_signal_source(config.stochastic_signal).min_periods(),
        BollingerBands::default().min_periods(),
        Vwap.min_periods(),
        Obv.min_periods(),
        Donchian::new(20, config.donchian_exclude_current).min_periods(),
    ]
    .into_iter()
    .max()
    .unwrap_or(LONG_TREND)
}

/// Run an indicator, turning a missing reading into `InsufficientData`.
fn reading<I: Indicator>(indicator: &I, bars: &[PriceBar]) -> Result<I::Output, ScoreError> {
    indicator
        .calculate(bars)
        .ok_or(ScoreError::InsufficientData {
            required: indicator.min_periods(),
            actual: bars.len(),
        })
}

/// Evaluate every rule at the last bar, in [`Rule::ALL`] order.
pub fn evaluate(bars: &[PriceBar], config: &ScoringConfig) -> Result<Vec<RuleVote>, ScoreError> {
    Rule::ALL
        .iter()
        .map(|&rule| evaluate_rule(rule, bars, config))
        .collect()
}

/// Evaluate a single rule at the last bar.
pub fn evaluate_rule(
    rule: Rule,
    bars: &[PriceBar],
    config: &ScoringConfig,
) -> Result<RuleVote, ScoreError> {
    let close = bars
        .last()
        .map(|b| b.close)
        .ok_or(ScoreError::InsufficientData {
            required: 1,
            actual: 0,
        })?;

    let vote = match rule {
        Rule::SmaCross => {
            let short = reading(&Sma::new(SHORT_TREND), bars)?;
            let long = reading(&Sma::new(LONG_TREND), bars)?;
            RuleVote::new(rule, Vote::binary(short > long))
                .with("sma_50", short)
                .with("sma_200", long)
        }
        Rule::EmaCross => {
            let short = reading(&Ema::new(SHORT_TREND), bars)?;
            let long = reading(&Ema::new(LONG_TREND), bars)?;
            RuleVote::new(rule, Vote::binary(short > long))
                .with("ema_50", short)
                .with("ema_200", long)
        }
        Rule::MacdCross => {
            let macd = reading(&Macd::with_signal_source(config.macd_signal), bars)?;
            RuleVote::new(rule, Vote::binary(macd.macd > macd.signal))
                .with("macd", macd.macd)
                .with("signal", macd.signal)
        }
        Rule::Rsi => {
            let rsi = reading(&Rsi::default(), bars)?;
            RuleVote::new(
                rule,
                Vote::extremity(rsi < RSI_OVERSOLD, rsi > RSI_OVERBOUGHT),
            )
            .with("rsi_14", rsi)
        }
        Rule::Stochastic => {
            let stoch = reading(
                &Stochastic::with_signal_source(config.stochastic_signal),
                bars,
            )?;
            let k = stoch.percent_k;
            RuleVote::new(
                rule,
                Vote::extremity(
                    k < STOCH_OVERSOLD && k > stoch.smoothed,
                    k > STOCH_OVERBOUGHT && k < stoch.smoothed,
                ),
            )
            .with("percent_k", k)
            .with("smoothed_k", stoch.smoothed)
        }
        Rule::Bollinger => {
            let bands = reading(&BollingerBands::default(), bars)?;
            RuleVote::new(
                rule,
                Vote::extremity(close <= bands.lower_band, close >= bands.upper_band),
            )
            .with("close", close)
            .with("sma_20", bands.sma)
            .with("upper_band", bands.upper_band)
            .with("lower_band", bands.lower_band)
        }
        Rule::Vwap => {
            let vwap = reading(&Vwap, bars)?;
            RuleVote::new(rule, Vote::binary(close < vwap))
                .with("close", close)
                .with("vwap", vwap)
        }
        Rule::Obv => {
            let obv = reading(&Obv, bars)?;
            RuleVote::new(rule, Vote::binary(obv.current > obv.previous))
                .with("obv", obv.current as f64)
                .with("obv_previous", obv.previous as f64)
        }
        Rule::Donchian => {
            let channel = reading(&Donchian::new(20, config.donchian_exclude_current), bars)?;
            RuleVote::new(
                rule,
                Vote::extremity(close > channel.upper, close < channel.lower),
            )
            .with("close", close)
            .with("upper_channel", channel.upper)
            .with("lower_channel", channel.lower)
        }
    };

    Ok(vote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_util::{bar, bars_from_closes, falling_bars, rising_bars};
    use crate::services::signals::SignalLineSource;

    fn vote_of(rule: Rule, bars: &[PriceBar]) -> Vote {
        evaluate_rule(rule, bars, &ScoringConfig::default())
            .unwrap()
            .vote
    }

    #[test]
    fn test_required_bars_default() {
        assert_eq!(required_bars(&ScoringConfig::default()), 200);
    }

    #[test]
    fn test_short_series_reports_insufficient_data() {
        let err = evaluate(&rising_bars(120), &ScoringConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ScoreError::InsufficientData {
                required: 200,
                actual: 120
            }
        );
    }

    #[test]
    fn test_trend_rules_follow_direction() {
        let up = rising_bars(250);
        assert_eq!(vote_of(Rule::SmaCross, &up), Vote::Bullish);
        assert_eq!(vote_of(Rule::EmaCross, &up), Vote::Bullish);

        let down = falling_bars(250);
        assert_eq!(vote_of(Rule::SmaCross, &down), Vote::Bearish);
        assert_eq!(vote_of(Rule::EmaCross, &down), Vote::Bearish);
    }

    #[test]
    fn test_flat_trend_is_bearish() {
        // ties fall on the bearish side for confirmation rules
        let flat = bars_from_closes(&[50.0; 220]);
        assert_eq!(vote_of(Rule::SmaCross, &flat), Vote::Bearish);
        assert_eq!(vote_of(Rule::EmaCross, &flat), Vote::Bearish);
        assert_eq!(vote_of(Rule::MacdCross, &flat), Vote::Bearish);
        assert_eq!(vote_of(Rule::Obv, &flat), Vote::Bearish);
        assert_eq!(vote_of(Rule::Vwap, &flat), Vote::Bearish);
    }

    #[test]
    fn test_rsi_extremes() {
        assert_eq!(vote_of(Rule::Rsi, &rising_bars(220)), Vote::Bearish);
        assert_eq!(vote_of(Rule::Rsi, &falling_bars(220)), Vote::Bullish);

        // alternating +1/-1 changes keep RSI at 50
        let closes: Vec<f64> = (0..220).map(|i| 100.0 + (i % 2) as f64).collect();
        assert_eq!(vote_of(Rule::Rsi, &bars_from_closes(&closes)), Vote::Neutral);
    }

    #[test]
    fn test_macd_price_signal_is_bearish_for_positive_prices() {
        // EMA(9) of price dwarfs a MACD line in the single digits
        assert_eq!(vote_of(Rule::MacdCross, &rising_bars(220)), Vote::Bearish);
    }

    #[test]
    fn test_macd_textbook_signal_in_uptrend() {
        let config = ScoringConfig {
            macd_signal: SignalLineSource::Indicator,
            ..ScoringConfig::default()
        };
        // accelerating rise: MACD keeps widening above its own average
        let closes: Vec<f64> = (0..220).map(|i| 100.0 + (i * i) as f64 / 100.0).collect();
        let vote = evaluate_rule(Rule::MacdCross, &bars_from_closes(&closes), &config).unwrap();
        assert_eq!(vote.vote, Vote::Bullish);
        assert!(vote.readings["macd"] > vote.readings["signal"]);
    }

    #[test]
    fn test_obv_direction() {
        assert_eq!(vote_of(Rule::Obv, &rising_bars(220)), Vote::Bullish);
        assert_eq!(vote_of(Rule::Obv, &falling_bars(220)), Vote::Bearish);
    }

    #[test]
    fn test_vwap_rule() {
        // close above the window's average price
        assert_eq!(vote_of(Rule::Vwap, &rising_bars(220)), Vote::Bearish);
        assert_eq!(vote_of(Rule::Vwap, &falling_bars(220)), Vote::Bullish);
    }

    #[test]
    fn test_bollinger_breaks() {
        let mut closes = vec![100.0; 219];
        closes.push(130.0);
        assert_eq!(vote_of(Rule::Bollinger, &bars_from_closes(&closes)), Vote::Bearish);

        let mut closes = vec![100.0; 219];
        closes.push(70.0);
        assert_eq!(vote_of(Rule::Bollinger, &bars_from_closes(&closes)), Vote::Bullish);
    }

    #[test]
    fn test_bollinger_flat_prices_touch_lower_band() {
        let flat = bars_from_closes(&[50.0; 220]);
        assert_eq!(vote_of(Rule::Bollinger, &flat), Vote::Bullish);
    }

    #[test]
    fn test_donchian_inclusive_window_stays_neutral() {
        assert_eq!(vote_of(Rule::Donchian, &rising_bars(220)), Vote::Neutral);
        assert_eq!(vote_of(Rule::Donchian, &falling_bars(220)), Vote::Neutral);
    }

    #[test]
    fn test_donchian_breakout_when_excluding_current() {
        let config = ScoringConfig {
            donchian_exclude_current: true,
            ..ScoringConfig::default()
        };
        // two-point steps clear the previous bar's one-point range
        let closes: Vec<f64> = (0..220).map(|i| 100.0 + 2.0 * i as f64).collect();
        let up = evaluate_rule(Rule::Donchian, &bars_from_closes(&closes), &config).unwrap();
        assert_eq!(up.vote, Vote::Bullish);

        let closes: Vec<f64> = (0..220).map(|i| 600.0 - 2.0 * i as f64).collect();
        let down = evaluate_rule(Rule::Donchian, &bars_from_closes(&closes), &config).unwrap();
        assert_eq!(down.vote, Vote::Bearish);
    }

    #[test]
    fn test_donchian_close_above_high() {
        // close may print above the bar's high; the inclusive channel sees it
        let mut bars = rising_bars(219);
        let mut last = bar(219, 400.0);
        last.high = 330.0;
        last.low = 300.0;
        bars.push(last);
        assert_eq!(vote_of(Rule::Donchian, &bars), Vote::Bullish);
    }

    #[test]
    fn test_stochastic_oversold_turn() {
        // long slide, then the last bar closes off its low
        let mut bars = falling_bars(219);
        let mut last = bar(219, 181.0);
        last.low = 178.0;
        bars.push(last);
        let vote = evaluate_rule(Rule::Stochastic, &bars, &ScoringConfig::default()).unwrap();
        assert!(vote.readings["percent_k"] < 20.0);
        assert!(vote.readings["percent_k"] > vote.readings["smoothed_k"]);
        assert_eq!(vote.vote, Vote::Bullish);
    }

    #[test]
    fn test_stochastic_price_source_compares_against_price() {
        let config = ScoringConfig {
            stochastic_signal: SignalLineSource::Price,
            ..ScoringConfig::default()
        };
        let vote = evaluate_rule(Rule::Stochastic, &rising_bars(220), &config).unwrap();
        // %K ~93 is below a smoothed close near 318
        assert_eq!(vote.vote, Vote::Bearish);
    }

    #[test]
    fn test_every_vote_has_readings() {
        let votes = evaluate(&rising_bars(230), &ScoringConfig::default()).unwrap();
        assert_eq!(votes.len(), Rule::ALL.len());
        for (vote, rule) in votes.iter().zip(Rule::ALL) {
            assert_eq!(vote.rule, rule);
            assert!(!vote.readings.is_empty());
        }
    }
}
