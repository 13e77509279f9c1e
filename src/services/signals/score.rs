//! Vote aggregation.

use crate::types::{Recommendation, RuleVote, Score};

/// Sum the votes and classify the total.
pub fn aggregate(votes: &[RuleVote]) -> (Recommendation, Score) {
    let total: i32 = votes.iter().map(|v| i32::from(v.vote.value())).sum();
    let score = Score::new(total.clamp(i8::MIN.into(), i8::MAX.into()) as i8);
    (Recommendation::from_score(score), score)
}
