use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scorers::SubScoreKind;
use crate::trace::RuleTrace;

/// Two contacts flagged as a possible duplicate. `left_id < right_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePair {
    pub left_id: String,
    pub right_id: String,
    pub score: f64,
    pub subscores: BTreeMap<SubScoreKind, f64>,
    pub rule_trace: RuleTrace,
}

impl CandidatePair {
    pub fn subscore(&self, kind: SubScoreKind) -> Option<f64> {
        self.subscores.get(&kind).copied()
    }

    /// Score rounded to four decimals for reports.
    pub fn display_score(&self) -> String {
        format!("{:.4}", self.score)
    }

    /// Report order: highest score first, then by identifier pair.
    pub fn report_order(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.left_id.cmp(&other.left_id))
            .then_with(|| self.right_id.cmp(&other.right_id))
    }
}

pub fn sort_candidates(pairs: &mut [CandidatePair]) {
    pairs.sort_by(CandidatePair::report_order);
}
