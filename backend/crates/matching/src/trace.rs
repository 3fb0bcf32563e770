use serde::{Deserialize, Serialize};

use crate::scorers::SubScoreKind;

/// Evidence produced by one scorer for a pair whose sub-score was defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerResult {
    pub rule: SubScoreKind,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
    pub detail: String,
}

/// How a composite score was assembled. Undefined sub-scores are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTrace {
    pub scorers: Vec<ScorerResult>,
    pub raw_total: f64,
    pub weight_sum: f64,
    pub confidence: f64,
}

impl RuleTrace {
    pub fn defined_count(&self) -> usize {
        self.scorers.len()
    }

    pub fn get(&self, rule: SubScoreKind) -> Option<&ScorerResult> {
        self.scorers.iter().find(|s| s.rule == rule)
    }
}
