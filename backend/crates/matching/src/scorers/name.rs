use crate::contact::NormalizedContact;
use crate::trace::ScorerResult;

use super::{edit_similarity, Scorer, SubScoreKind};

pub struct NameSimilarityScorer {
    pub weight: f64,
}

impl Scorer for NameSimilarityScorer {
    fn kind(&self) -> SubScoreKind {
        SubScoreKind::Name
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, a: &NormalizedContact, b: &NormalizedContact) -> Option<ScorerResult> {
        let (left, right) = (a.name.as_deref()?, b.name.as_deref()?);
        let score = edit_similarity(left, right);
        Some(self.result(score, format!("left_name={left:?} right_name={right:?}")))
    }
}
