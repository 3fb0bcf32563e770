use crate::contact::NormalizedContact;
use crate::trace::ScorerResult;

use super::{exact_match, Scorer, SubScoreKind};

pub struct EmailExactScorer {
    pub weight: f64,
}

impl Scorer for EmailExactScorer {
    fn kind(&self) -> SubScoreKind {
        SubScoreKind::Email
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, a: &NormalizedContact, b: &NormalizedContact) -> Option<ScorerResult> {
        let (left, right) = (a.email.as_deref()?, b.email.as_deref()?);
        Some(self.result(
            exact_match(left, right),
            format!("left_email={left:?} right_email={right:?}"),
        ))
    }
}
