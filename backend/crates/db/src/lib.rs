pub mod contacts;
pub mod review;

use std::time::Duration;

use roster_common::error::{RosterError, RosterResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

/// DDL for the review queue. Pair ids are ordered bytewise, the same order
/// `CandidatePair` uses.
pub const REVIEW_SCHEMA: &str = include_str!("../../../migrations/0001_merge_candidates.sql");

const SCHEMA_LOCK_KEY: i64 = 0x726f_7374_6572;

/// Pool for the scan and review commands. A short-lived CLI needs few
/// connections.
pub async fn create_pool(database_url: &str) -> RosterResult<PgPool> {
    tracing::info!("connecting to database");
    PgPoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .map_err(|e| RosterError::Database(format!("connect failed: {e}")))
}

/// Create the review queue table and indexes if missing. Concurrent callers
/// serialize on an advisory lock.
pub async fn apply_schema(pool: &PgPool) -> RosterResult<()> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| RosterError::Database(e.to_string()))?;

    sqlx::query("select pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .map_err(|e| RosterError::Database(e.to_string()))?;
    (&mut *tx)
        .execute(REVIEW_SCHEMA)
        .await
        .map_err(|e| RosterError::Database(format!("applying review schema: {e}")))?;

    tx.commit()
        .await
        .map_err(|e| RosterError::Database(e.to_string()))?;
    tracing::info!("review queue schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_pool_rejects_malformed_url() {
        let err = create_pool("not a database url").await.unwrap_err();
        assert!(matches!(err, RosterError::Database(_)), "err={err}");
    }

    #[test]
    fn review_schema_orders_ids_bytewise() {
        assert!(REVIEW_SCHEMA.contains("create table if not exists merge_candidates"));
        assert!(REVIEW_SCHEMA.contains(r#"left_contact_id collate "C" < right_contact_id collate "C""#));
    }

    #[tokio::test]
    async fn apply_schema_is_repeatable() {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            return;
        };
        let pool = create_pool(&url).await.expect("db should connect");
        apply_schema(&pool).await.unwrap();
        apply_schema(&pool).await.unwrap();
    }
}
