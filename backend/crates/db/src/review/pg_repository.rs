use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use roster_common::error::{RosterError, RosterResult};
use roster_matching::CandidatePair;
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::review::models::{CandidateStatus, MergeCandidate, MergeCandidateFilter};
use crate::review::repositories::MergeCandidateRepository;

pub struct PgMergeCandidateRepository {
    pool: PgPool,
}

impl PgMergeCandidateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_candidate_row(row: PgRow) -> RosterResult<MergeCandidate> {
        let status_raw: String = row.get("status");
        let status = CandidateStatus::from_str(&status_raw).map_err(RosterError::Internal)?;

        Ok(MergeCandidate {
            id: row.get("id"),
            run_id: row.get("run_id"),
            left_contact_id: row.get("left_contact_id"),
            right_contact_id: row.get("right_contact_id"),
            score: row.get("score"),
            subscores: row.get("subscores"),
            rule_trace: row.get("rule_trace"),
            status,
            reviewed_by: row.get("reviewed_by"),
            reviewed_at: row.get("reviewed_at"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl MergeCandidateRepository for PgMergeCandidateRepository {
    async fn record_run(&self, run_id: Uuid, candidates: &[CandidatePair]) -> RosterResult<usize> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RosterError::Database(e.to_string()))?;

        let now = Utc::now();
        let mut inserted = 0;
        for candidate in candidates {
            let subscores = serde_json::to_value(&candidate.subscores)
                .map_err(|e| RosterError::Internal(e.to_string()))?;
            let rule_trace = serde_json::to_value(&candidate.rule_trace)
                .map_err(|e| RosterError::Internal(e.to_string()))?;

            let result = sqlx::query(
                "insert into merge_candidates
                 (id, run_id, left_contact_id, right_contact_id, score, subscores, rule_trace, status, created_at)
                 values ($1, $2, $3, $4, $5, $6, $7, 'pending', $8)
                 on conflict (left_contact_id, right_contact_id) where status = 'pending' do nothing",
            )
            .bind(Uuid::new_v4())
            .bind(run_id)
            .bind(&candidate.left_id)
            .bind(&candidate.right_id)
            .bind(candidate.score)
            .bind(subscores)
            .bind(rule_trace)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| RosterError::Database(e.to_string()))?;

            inserted += result.rows_affected() as usize;
        }

        tx.commit()
            .await
            .map_err(|e| RosterError::Database(e.to_string()))?;

        tracing::info!(
            %run_id,
            candidates = candidates.len(),
            inserted,
            "recorded merge candidates"
        );
        Ok(inserted)
    }

    async fn list(&self, filter: MergeCandidateFilter) -> RosterResult<Vec<MergeCandidate>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "select id, run_id, left_contact_id, right_contact_id, score, subscores, rule_trace, \
             status, reviewed_by, reviewed_at, created_at \
             from merge_candidates where true",
        );

        if let Some(status) = filter.status {
            qb.push(" and status = ").push_bind(status.as_str());
        }
        if let Some(min_score) = filter.min_score {
            qb.push(" and score >= ").push_bind(min_score);
        }

        qb.push(" order by score desc, left_contact_id, right_contact_id");
        qb.push(" limit ").push_bind(filter.limit.unwrap_or(50));
        qb.push(" offset ").push_bind(filter.offset.unwrap_or(0));

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RosterError::Database(e.to_string()))?;

        rows.into_iter().map(Self::map_candidate_row).collect()
    }

    async fn resolve(&self, id: Uuid, status: CandidateStatus, reviewer: &str) -> RosterResult<()> {
        if status == CandidateStatus::Pending {
            return Err(RosterError::Validation(
                "a candidate can only be resolved as merged or dismissed".to_owned(),
            ));
        }

        let result = sqlx::query(
            "update merge_candidates
             set status = $1, reviewed_by = $2, reviewed_at = $3
             where id = $4 and status = 'pending'",
        )
        .bind(status.as_str())
        .bind(reviewer)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RosterError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RosterError::NotFound(format!(
                "pending merge candidate not found: {id}"
            )));
        }

        tracing::info!(%id, status = status.as_str(), reviewer, "resolved merge candidate");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{apply_schema, create_pool};
    use roster_matching::{ContactRecord, MatchingConfig, Matcher};

    async fn test_repo() -> Option<(PgMergeCandidateRepository, PgPool)> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = create_pool(&url).await.expect("db should connect");

        apply_schema(&pool).await.expect("review schema applies");

        Some((PgMergeCandidateRepository::new(pool.clone()), pool))
    }

    fn candidates_for(prefix: &str) -> Vec<CandidatePair> {
        candidates_between(&format!("{prefix}-a"), &format!("{prefix}-b"))
    }

    fn candidates_between(first_id: &str, second_id: &str) -> Vec<CandidatePair> {
        let records: Vec<ContactRecord> = [first_id, second_id]
            .iter()
            .map(|id| ContactRecord {
                first_name: Some("Lynn".to_string()),
                last_name: Some("Ryan".to_string()),
                email: Some("lynn@example.com".to_string()),
                ..ContactRecord::new(*id)
            })
            .collect();
        let matcher = Matcher::new(MatchingConfig::default()).expect("valid config");
        matcher.find_candidates(&records)
    }

    #[tokio::test]
    async fn record_run_skips_pairs_already_pending() {
        let Some((repo, _pool)) = test_repo().await else {
            return;
        };
        let candidates = candidates_for(&Uuid::new_v4().to_string());
        assert_eq!(candidates.len(), 1);

        let first = repo.record_run(Uuid::new_v4(), &candidates).await.unwrap();
        assert_eq!(first, 1);
        let second = repo.record_run(Uuid::new_v4(), &candidates).await.unwrap();
        assert_eq!(second, 0);
    }

    #[tokio::test]
    async fn record_run_accepts_ids_whose_collation_order_differs() {
        let Some((repo, pool)) = test_repo().await else {
            return;
        };
        // Uppercase sorts first bytewise; most locales put "alice" first.
        let tag = Uuid::new_v4();
        let candidates = candidates_between(&format!("alice-{tag}"), &format!("Bob-{tag}"));
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].left_id.starts_with("Bob-"));

        let run_id = Uuid::new_v4();
        assert_eq!(repo.record_run(run_id, &candidates).await.unwrap(), 1);

        let stored: (String, String) = sqlx::query_as(
            "select left_contact_id, right_contact_id from merge_candidates where run_id = $1",
        )
        .bind(run_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(stored.0, candidates[0].left_id);
        assert_eq!(stored.1, candidates[0].right_id);
    }

    #[tokio::test]
    async fn resolve_moves_candidate_out_of_pending() {
        let Some((repo, _pool)) = test_repo().await else {
            return;
        };
        let candidates = candidates_for(&Uuid::new_v4().to_string());
        let run_id = Uuid::new_v4();
        repo.record_run(run_id, &candidates).await.unwrap();

        let pending = repo
            .list(MergeCandidateFilter {
                status: Some(CandidateStatus::Pending),
                min_score: Some(0.99),
                limit: Some(1000),
                offset: None,
            })
            .await
            .unwrap();
        let row = pending
            .iter()
            .find(|c| c.run_id == run_id)
            .expect("recorded candidate listed");
        assert_eq!(row.left_contact_id, candidates[0].left_id);
        assert_eq!(row.subscores["name"], 1.0);

        repo.resolve(row.id, CandidateStatus::Merged, "reviewer@example.org")
            .await
            .unwrap();

        let again = repo
            .resolve(row.id, CandidateStatus::Dismissed, "reviewer@example.org")
            .await;
        assert!(matches!(again, Err(RosterError::NotFound(_))));
    }

    #[tokio::test]
    async fn resolve_to_pending_rejected() {
        let Some((repo, _pool)) = test_repo().await else {
            return;
        };
        let result = repo
            .resolve(Uuid::new_v4(), CandidateStatus::Pending, "reviewer")
            .await;
        assert!(matches!(result, Err(RosterError::Validation(_))));
    }
}
