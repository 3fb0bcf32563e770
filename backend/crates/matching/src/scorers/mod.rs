pub mod address;
pub mod email;
pub mod name;
pub mod phone;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contact::NormalizedContact;
use crate::trace::ScorerResult;

/// One dimension of similarity between two contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubScoreKind {
    Name,
    Email,
    Phone,
    Address,
}

impl SubScoreKind {
    pub const ALL: [SubScoreKind; 4] = [Self::Name, Self::Email, Self::Phone, Self::Address];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for SubScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Scorer {
    fn kind(&self) -> SubScoreKind;
    fn weight(&self) -> f64;

    /// `None` when the sub-score is undefined for this pair.
    fn score(&self, a: &NormalizedContact, b: &NormalizedContact) -> Option<ScorerResult>;

    fn result(&self, score: f64, detail: String) -> ScorerResult {
        ScorerResult {
            rule: self.kind(),
            score,
            weight: self.weight(),
            weighted_score: score * self.weight(),
            detail,
        }
    }
}

/// Levenshtein similarity ratio `1 - distance / max(len)` over chars.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - strsim::levenshtein(a, b) as f64 / max_len as f64
}

/// Upper bound on [`edit_similarity`] from lengths alone: the distance is at
/// least the length difference.
pub fn edit_similarity_bound(len_a: usize, len_b: usize) -> f64 {
    let max_len = len_a.max(len_b);
    if max_len == 0 {
        return 1.0;
    }
    len_a.min(len_b) as f64 / max_len as f64
}

fn exact_match(a: &str, b: &str) -> f64 {
    if a == b {
        1.0
    } else {
        0.0
    }
}
