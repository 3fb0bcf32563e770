use crate::contact::NormalizedContact;
use crate::trace::ScorerResult;

use super::{edit_similarity, Scorer, SubScoreKind};

pub struct AddressSimilarityScorer {
    pub weight: f64,
}

impl Scorer for AddressSimilarityScorer {
    fn kind(&self) -> SubScoreKind {
        SubScoreKind::Address
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, a: &NormalizedContact, b: &NormalizedContact) -> Option<ScorerResult> {
        let (left, right) = (a.address.as_deref()?, b.address.as_deref()?);
        let score = edit_similarity(left, right);
        Some(self.result(
            score,
            format!("left_address={left:?} right_address={right:?}"),
        ))
    }
}
