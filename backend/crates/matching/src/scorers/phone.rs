use crate::contact::NormalizedContact;
use crate::trace::ScorerResult;

use super::{exact_match, Scorer, SubScoreKind};

pub struct PhoneExactScorer {
    pub weight: f64,
}

impl Scorer for PhoneExactScorer {
    fn kind(&self) -> SubScoreKind {
        SubScoreKind::Phone
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, a: &NormalizedContact, b: &NormalizedContact) -> Option<ScorerResult> {
        let (left, right) = (a.phone.as_deref()?, b.phone.as_deref()?);
        Some(self.result(
            exact_match(left, right),
            format!("left_phone={left} right_phone={right}"),
        ))
    }
}
