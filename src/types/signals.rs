use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One rule's opinion on the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Bearish,
    Neutral,
    Bullish,
}

impl Vote {
    /// Vote for a rule that always leans one way.
    pub fn binary(bullish: bool) -> Self {
        if bullish {
            Vote::Bullish
        } else {
            Vote::Bearish
        }
    }

    /// Vote for a rule that only fires at extremes. The bullish condition wins
    /// when both hold.
    pub fn extremity(bullish: bool, bearish: bool) -> Self {
        if bullish {
            Vote::Bullish
        } else if bearish {
            Vote::Bearish
        } else {
            Vote::Neutral
        }
    }

    pub fn value(&self) -> i8 {
        match self {
            Vote::Bearish => -1,
            Vote::Neutral => 0,
            Vote::Bullish => 1,
        }
    }
}

/// Whether a rule always votes or only at extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Always +1 or -1.
    Confirmation,
    /// 0 unless the indicator is at an extreme.
    Extremity,
}

/// The fixed set of scoring rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    SmaCross,
    EmaCross,
    MacdCross,
    Rsi,
    Stochastic,
    Bollinger,
    Vwap,
    Obv,
    Donchian,
}

impl Rule {
    pub const ALL: [Rule; 9] = [
        Rule::SmaCross,
        Rule::EmaCross,
        Rule::MacdCross,
        Rule::Rsi,
        Rule::Stochastic,
        Rule::Bollinger,
        Rule::Vwap,
        Rule::Obv,
        Rule::Donchian,
    ];

    /// Get display name for this rule.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::SmaCross => "SMA (50/200)",
            Rule::EmaCross => "EMA (50/200)",
            Rule::MacdCross => "MACD",
            Rule::Rsi => "RSI (14)",
            Rule::Stochastic => "Stochastic",
            Rule::Bollinger => "Bollinger Bands",
            Rule::Vwap => "VWAP",
            Rule::Obv => "OBV",
            Rule::Donchian => "Donchian Channel",
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::SmaCross | Rule::EmaCross | Rule::MacdCross | Rule::Vwap | Rule::Obv => {
                RuleKind::Confirmation
            }
            Rule::Rsi | Rule::Stochastic | Rule::Bollinger | Rule::Donchian => RuleKind::Extremity,
        }
    }
}

/// A rule's vote together with the indicator readings behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleVote {
    pub rule: Rule,
    pub kind: RuleKind,
    pub vote: Vote,
    /// Indicator values at the last bar, keyed by name (e.g. `sma_50`).
    pub readings: BTreeMap<String, f64>,
}

impl RuleVote {
    pub fn new(rule: Rule, vote: Vote) -> Self {
        Self {
            rule,
            kind: rule.kind(),
            vote,
            readings: BTreeMap::new(),
        }
    }

    /// Attach a named reading.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.readings.insert(name.to_string(), value);
        self
    }
}

/// Sum of all rule votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub struct Score(i8);

impl Score {
    /// Largest magnitude a score can reach with every rule agreeing.
    pub const MAX: i8 = Rule::ALL.len() as i8;

    pub fn new(value: i8) -> Self {
        Self(value.clamp(-Self::MAX, Self::MAX))
    }

    pub fn value(&self) -> i8 {
        self.0
    }
}

impl TryFrom<i8> for Score {
    type Error = String;

    /// Accepts only values a real vote total can take.
    fn try_from(value: i8) -> Result<Self, Self::Error> {
        if (-Self::MAX..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "score {} is outside -{}..={}",
                value,
                Self::MAX,
                Self::MAX
            ))
        }
    }
}

impl From<Score> for i8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Five-level recommendation derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Sell")]
    StrongSell,
    #[serde(rename = "Sell")]
    Sell,
    #[serde(rename = "Hold")]
    Hold,
    #[serde(rename = "Buy")]
    Buy,
    #[serde(rename = "Strong Buy")]
    StrongBuy,
}

impl Recommendation {
    /// Classify a score into its band.
    ///
    /// - above 5: Strong Buy
    /// - 2 to 5: Buy
    /// - -2 to 1: Hold
    /// - -5 to -3: Sell
    /// - below -5: Strong Sell
    pub fn from_score(score: Score) -> Self {
        match score.value() {
            s if s > 5 => Recommendation::StrongBuy,
            s if s >= 2 => Recommendation::Buy,
            s if s >= -2 => Recommendation::Hold,
            s if s >= -5 => Recommendation::Sell,
            _ => Recommendation::StrongSell,
        }
    }

    /// Get display label for this recommendation.
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
            Recommendation::StrongSell => "Strong Sell",
        }
    }
}

/// Full result of scoring one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub recommendation: Recommendation,
    pub score: Score,
    pub votes: Vec<RuleVote>,
    /// Number of bars the score was computed over.
    pub bars: usize,
    /// Date of the bar the score refers to.
    pub as_of: NaiveDate,
}
