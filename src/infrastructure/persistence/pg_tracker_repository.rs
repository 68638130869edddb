//! PostgreSQL implementation of the old-URL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{MethodKey, TrackedMethod};
use crate::domain::repositories::TrackerRepository;
use crate::error::AppError;

/// PostgreSQL repository for tracked-method records and old URLs.
///
/// Mutating calls that touch several rows run inside a transaction, after
/// which the maintenance step drops method records left without old URLs and
/// old URLs left without referencing records. The resolver lookup is a
/// single probe of the unique index on `old_urls.url`.
pub struct PgTrackerRepository {
    pool: Arc<PgPool>,
}

impl PgTrackerRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackerRepository for PgTrackerRepository {
    async fn find_method(&self, key: &MethodKey) -> Result<Option<TrackedMethod>, AppError> {
        let row = sqlx::query_as::<_, (i64, Option<String>, DateTime<Utc>)>(
            r#"
            SELECT id, current_url, created_at
            FROM tracked_methods
            WHERE content_type = $1 AND object_id = $2 AND method_name = $3
            "#,
        )
        .bind(&key.content_type)
        .bind(&key.object_id)
        .bind(&key.method_name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|(id, current_url, created_at)| {
            TrackedMethod::new(id, key.clone(), current_url, created_at)
        }))
    }

    async fn record_old_url(&self, key: &MethodKey, url: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO tracked_methods (content_type, object_id, method_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (content_type, object_id, method_name) DO NOTHING
            "#,
        )
        .bind(&key.content_type)
        .bind(&key.object_id)
        .bind(&key.method_name)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO old_urls (url) VALUES ($1) ON CONFLICT (url) DO NOTHING")
            .bind(url)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO tracked_method_old_urls (method_id, old_url_id)
            SELECT m.id, o.id
            FROM tracked_methods m
            JOIN old_urls o ON o.url = $4
            WHERE m.content_type = $1 AND m.object_id = $2 AND m.method_name = $3
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&key.content_type)
        .bind(&key.object_id)
        .bind(&key.method_name)
        .bind(url)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn set_current_url(
        &self,
        key: &MethodKey,
        current: Option<String>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE tracked_methods
            SET current_url = $4
            WHERE content_type = $1 AND object_id = $2 AND method_name = $3
            "#,
        )
        .bind(&key.content_type)
        .bind(&key.object_id)
        .bind(&key.method_name)
        .bind(current)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn purge_old_url(&self, url: &str) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let referencing: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM tracked_method_old_urls l
            JOIN old_urls o ON o.id = l.old_url_id
            WHERE o.url = $1
            "#,
        )
        .bind(url)
        .fetch_one(&mut *tx)
        .await?;

        // Cascades into the join table.
        sqlx::query("DELETE FROM old_urls WHERE url = $1")
            .bind(url)
            .execute(&mut *tx)
            .await?;

        // Maintenance: a method record with no old URLs carries no
        // information; an old URL with no records can never resolve.
        sqlx::query(
            r#"
            DELETE FROM tracked_methods m
            WHERE NOT EXISTS (
                SELECT 1 FROM tracked_method_old_urls l WHERE l.method_id = m.id
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM old_urls o
            WHERE NOT EXISTS (
                SELECT 1 FROM tracked_method_old_urls l WHERE l.old_url_id = o.id
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(referencing as u64)
    }

    async fn repoint_current(&self, from: &str, to: Option<String>) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE tracked_methods SET current_url = $2 WHERE current_url = $1")
            .bind(from)
            .bind(to)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn resolve_targets(&self, url: &str) -> Result<Option<Vec<String>>, AppError> {
        let old_url_id: Option<i64> = sqlx::query_scalar("SELECT id FROM old_urls WHERE url = $1")
            .bind(url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        let Some(old_url_id) = old_url_id else {
            return Ok(None);
        };

        let targets: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT m.current_url
            FROM tracked_methods m
            JOIN tracked_method_old_urls l ON l.method_id = m.id
            WHERE l.old_url_id = $1
              AND m.current_url IS NOT NULL
              AND m.current_url <> ''
            ORDER BY m.current_url
            "#,
        )
        .bind(old_url_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(Some(targets))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
