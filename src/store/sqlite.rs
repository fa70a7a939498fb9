//! SQLite grant backend.
//!
//! Persists [`Grant`] records in a single table through a
//! `sqlx::SqlitePool`. Every write is a single statement, so a call
//! cancelled mid-flight never leaves a half-written level; the upsert
//! uses `ON CONFLICT DO UPDATE` so rows are never duplicated.
//!
//! The core runs no migrations on its own. [`SqliteGrantStore::ensure_table`]
//! exists as an explicit opt-in for tests and small deployments; callers
//! with their own schema management simply never call it.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::error::StoreError;

use super::{Grant, GrantBackend};

/// A grant backend over a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteGrantStore {
    pool: SqlitePool,
}

impl SqliteGrantStore {
    /// Create a backend over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the permissions table if it does not exist.
    ///
    /// The canonical table stores the subject id with TEXT affinity,
    /// which suits string and integer subject ids alike under SQLite's
    /// coercion rules; callers with other id types manage their own
    /// schema.
    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS permissions (
                subject_id TEXT NOT NULL,
                scope_name TEXT NOT NULL,
                level INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (subject_id, scope_name)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        Ok(())
    }
}

#[async_trait]
impl<S> GrantBackend<Grant<S>> for SqliteGrantStore
where
    S: Clone
        + Send
        + Sync
        + 'static
        + for<'q> sqlx::Encode<'q, sqlx::Sqlite>
        + sqlx::Type<sqlx::Sqlite>,
{
    async fn fetch(&self, subject: &S, scope: &str) -> Result<Option<Grant<S>>, StoreError> {
        let row = sqlx::query(
            "SELECT level FROM permissions WHERE subject_id = ? AND scope_name = ?",
        )
        .bind(subject.clone())
        .bind(scope)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(|row| {
            let level: i64 = row.get("level");
            Grant {
                subject_id: subject.clone(),
                scope_name: scope.to_string(),
                level: level as u32,
            }
        }))
    }

    async fn fetch_all(&self, subject: &S) -> Result<Vec<Grant<S>>, StoreError> {
        let rows = sqlx::query("SELECT scope_name, level FROM permissions WHERE subject_id = ?")
            .bind(subject.clone())
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let scope_name: String = row.get("scope_name");
                let level: i64 = row.get("level");
                Grant {
                    subject_id: subject.clone(),
                    scope_name,
                    level: level as u32,
                }
            })
            .collect())
    }

    async fn upsert(&self, record: Grant<S>) -> Result<Grant<S>, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO permissions (subject_id, scope_name, level)
            VALUES (?, ?, ?)
            ON CONFLICT (subject_id, scope_name) DO UPDATE SET level = excluded.level
            "#,
        )
        .bind(record.subject_id.clone())
        .bind(record.scope_name.clone())
        .bind(record.level as i64)
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(record)
    }

    async fn delete(&self, subject: &S, scope: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM permissions WHERE subject_id = ? AND scope_name = ?")
            .bind(subject.clone())
            .bind(scope)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self, subject: &S) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM permissions WHERE subject_id = ?")
            .bind(subject.clone())
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(result.rows_affected())
    }
}
