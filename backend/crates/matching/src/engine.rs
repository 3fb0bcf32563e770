use std::collections::BTreeMap;

use roster_common::error::RosterResult;

use crate::candidate::CandidatePair;
use crate::config::{MatchingConfig, ScorerWeights};
use crate::contact::NormalizedContact;
use crate::scorers::address::AddressSimilarityScorer;
use crate::scorers::email::EmailExactScorer;
use crate::scorers::name::NameSimilarityScorer;
use crate::scorers::phone::PhoneExactScorer;
use crate::scorers::{Scorer, SubScoreKind};
use crate::trace::{RuleTrace, ScorerResult};

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub confidence: f64,
    pub rule_trace: RuleTrace,
}

impl MatchResult {
    pub fn defined_count(&self) -> usize {
        self.rule_trace.defined_count()
    }

    pub fn subscores(&self) -> BTreeMap<SubScoreKind, f64> {
        self.rule_trace
            .scorers
            .iter()
            .map(|s| (s.rule, s.score))
            .collect()
    }
}

/// Scores contact pairs under one validated [`MatchingConfig`].
pub struct Matcher {
    config: MatchingConfig,
    weights: ScorerWeights,
    scorers: Vec<Box<dyn Scorer + Send + Sync>>,
}

impl Matcher {
    pub fn new(config: MatchingConfig) -> RosterResult<Self> {
        config.validate()?;
        let weights = config.weights.normalized();

        // Order fixes the summation order, which keeps scores bit-identical
        // regardless of which record is passed first.
        let scorers: Vec<Box<dyn Scorer + Send + Sync>> = vec![
            Box::new(NameSimilarityScorer {
                weight: weights.name,
            }),
            Box::new(EmailExactScorer {
                weight: weights.email,
            }),
            Box::new(PhoneExactScorer {
                weight: weights.phone,
            }),
            Box::new(AddressSimilarityScorer {
                weight: weights.address,
            }),
        ];

        Ok(Self {
            config,
            weights,
            scorers,
        })
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Weights scaled to sum to 1.
    pub fn weights(&self) -> &ScorerWeights {
        &self.weights
    }

    /// Weighted average over the sub-scores defined for this pair.
    ///
    /// Returns `None` when nothing comparable is defined, or when every
    /// defined sub-score carries zero weight.
    pub fn evaluate(&self, a: &NormalizedContact, b: &NormalizedContact) -> Option<MatchResult> {
        let results: Vec<ScorerResult> = self.scorers.iter().filter_map(|s| s.score(a, b)).collect();
        if results.is_empty() {
            return None;
        }

        let raw_total: f64 = results.iter().map(|r| r.weighted_score).sum();
        let weight_sum: f64 = results.iter().map(|r| r.weight).sum();
        if weight_sum <= 0.0 {
            return None;
        }

        let confidence = (raw_total / weight_sum).clamp(0.0, 1.0);

        Some(MatchResult {
            confidence,
            rule_trace: RuleTrace {
                scorers: results,
                raw_total,
                weight_sum,
                confidence,
            },
        })
    }

    pub fn is_candidate(&self, result: &MatchResult) -> bool {
        result.defined_count() >= self.config.min_defined_subscores
            && result.confidence >= self.config.threshold
    }

    /// Score a pair and keep it only if it qualifies as a candidate.
    /// Records sharing an identifier never pair with each other.
    pub fn candidate(
        &self,
        a: &NormalizedContact,
        b: &NormalizedContact,
    ) -> Option<CandidatePair> {
        let (left, right) = match a.id.cmp(&b.id) {
            std::cmp::Ordering::Less => (a, b),
            std::cmp::Ordering::Greater => (b, a),
            std::cmp::Ordering::Equal => return None,
        };

        let result = self.evaluate(left, right)?;
        if !self.is_candidate(&result) {
            return None;
        }

        Some(CandidatePair {
            left_id: left.id.clone(),
            right_id: right.id.clone(),
            score: result.confidence,
            subscores: result.subscores(),
            rule_trace: result.rule_trace,
        })
    }
}
