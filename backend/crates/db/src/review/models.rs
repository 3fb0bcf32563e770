use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    Pending,
    Merged,
    Dismissed,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Merged => "merged",
            Self::Dismissed => "dismissed",
        }
    }
}

impl FromStr for CandidateStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "merged" => Ok(Self::Merged),
            "dismissed" => Ok(Self::Dismissed),
            _ => Err(format!("unknown candidate status: {value}")),
        }
    }
}

/// A scored pair waiting for (or past) human review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeCandidate {
    pub id: Uuid,
    pub run_id: Uuid,
    pub left_contact_id: String,
    pub right_contact_id: String,
    pub score: f64,
    pub subscores: serde_json::Value,
    pub rule_trace: serde_json::Value,
    pub status: CandidateStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MergeCandidateFilter {
    pub status: Option<CandidateStatus>,
    pub min_score: Option<f64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
