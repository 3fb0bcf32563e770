use async_trait::async_trait;
use roster_common::error::{RosterError, RosterResult};
use roster_matching::ContactRecord;
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};

use crate::contacts::models::ContactSnapshotFilter;
use crate::contacts::repositories::ContactRepository;

pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn snapshot(&self, filter: ContactSnapshotFilter) -> RosterResult<Vec<ContactRecord>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RosterError::Database(e.to_string()))?;

        sqlx::query("set transaction isolation level repeatable read, read only")
            .execute(&mut *tx)
            .await
            .map_err(|e| RosterError::Database(e.to_string()))?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "select id::text as id, first_name, last_name, email, phone, \
             address_line_1, city, state, postal_code \
             from contacts where true",
        );
        if let Some(since) = filter.updated_since {
            qb.push(" and updated_at >= ").push_bind(since);
        }
        qb.push(" order by id");
        if let Some(limit) = filter.limit {
            qb.push(" limit ").push_bind(limit);
        }

        let rows = qb
            .build()
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| RosterError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RosterError::Database(e.to_string()))?;

        tracing::info!(contacts = rows.len(), "loaded contact snapshot");
        Ok(rows.into_iter().map(map_contact_row).collect())
    }
}

fn map_contact_row(row: PgRow) -> ContactRecord {
    ContactRecord {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        address_line_1: row.get("address_line_1"),
        city: row.get("city"),
        state: row.get("state"),
        postal_code: row.get("postal_code"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_pool;
    use chrono::{Duration, Utc};

    async fn test_repo() -> Option<(PgContactRepository, PgPool)> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = create_pool(&url).await.expect("db should connect");

        // Apply schema inline for test isolation
        sqlx::query(
            "create table if not exists contacts (
              id text primary key,
              first_name text, last_name text, email text, phone text,
              address_line_1 text, city text, state text, postal_code text,
              updated_at timestamptz not null default now()
            )",
        )
        .execute(&pool)
        .await
        .ok()?;

        Some((PgContactRepository::new(pool.clone()), pool))
    }

    async fn insert_contact(pool: &PgPool, id: &str, first: &str, email: Option<&str>, updated_days_ago: i64) {
        sqlx::query(
            "insert into contacts (id, first_name, email, updated_at) values ($1, $2, $3, $4)
             on conflict (id) do update set first_name = excluded.first_name,
               email = excluded.email, updated_at = excluded.updated_at",
        )
        .bind(id)
        .bind(first)
        .bind(email)
        .bind(Utc::now() - Duration::days(updated_days_ago))
        .execute(pool)
        .await
        .expect("insert contact");
    }

    #[tokio::test]
    async fn snapshot_reads_all_columns() {
        let Some((repo, pool)) = test_repo().await else {
            return;
        };
        let id = format!("snap-{}", uuid::Uuid::new_v4());
        insert_contact(&pool, &id, "Lynn", Some("lynn@example.com"), 0).await;

        let contacts = repo
            .snapshot(ContactSnapshotFilter::default())
            .await
            .expect("snapshot");
        let found = contacts.iter().find(|c| c.id == id).expect("inserted contact present");
        assert_eq!(found.first_name.as_deref(), Some("Lynn"));
        assert_eq!(found.email.as_deref(), Some("lynn@example.com"));
        assert_eq!(found.phone, None);
    }

    #[tokio::test]
    async fn snapshot_filters_by_updated_since() {
        let Some((repo, pool)) = test_repo().await else {
            return;
        };
        let recent = format!("recent-{}", uuid::Uuid::new_v4());
        let stale = format!("stale-{}", uuid::Uuid::new_v4());
        insert_contact(&pool, &recent, "Recent", None, 0).await;
        insert_contact(&pool, &stale, "Stale", None, 30).await;

        let contacts = repo
            .snapshot(ContactSnapshotFilter {
                updated_since: Some(Utc::now() - Duration::days(1)),
                limit: None,
            })
            .await
            .expect("snapshot");
        assert!(contacts.iter().any(|c| c.id == recent));
        assert!(!contacts.iter().any(|c| c.id == stale));
    }
}
