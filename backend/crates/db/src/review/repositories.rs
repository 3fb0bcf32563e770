use async_trait::async_trait;
use roster_common::error::RosterResult;
use roster_matching::CandidatePair;
use uuid::Uuid;

use crate::review::models::{CandidateStatus, MergeCandidate, MergeCandidateFilter};

#[async_trait]
pub trait MergeCandidateRepository: Send + Sync {
    /// Queue a run's candidates for review. Pairs already pending from an
    /// earlier run are left untouched. Returns how many rows were inserted.
    async fn record_run(&self, run_id: Uuid, candidates: &[CandidatePair]) -> RosterResult<usize>;

    async fn list(&self, filter: MergeCandidateFilter) -> RosterResult<Vec<MergeCandidate>>;

    /// Close a pending candidate as merged or dismissed.
    async fn resolve(&self, id: Uuid, status: CandidateStatus, reviewer: &str) -> RosterResult<()>;
}
