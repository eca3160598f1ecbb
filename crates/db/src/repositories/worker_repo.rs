//! Repository for the `workers` table.
//!
//! Exclusive owner of worker row creation and mutation. The name column is
//! written once (first text message after registration); deactivation only
//! flips `is_active`, rows are never deleted.

use sqlx::PgPool;

use rollcall_core::types::DbId;

use crate::models::Worker;

/// Column list for `workers` queries.
const WORKER_COLUMNS: &str =
    "id, line_user_id, name, language, is_active, created_at, updated_at";

/// Provides read/write operations for workers.
pub struct WorkerRepo;

impl WorkerRepo {
    /// Find a worker by platform user id.
    pub async fn find_by_line_user_id(
        pool: &PgPool,
        line_user_id: &str,
    ) -> Result<Option<Worker>, sqlx::Error> {
        let query = format!("SELECT {WORKER_COLUMNS} FROM workers WHERE line_user_id = $1");
        sqlx::query_as::<_, Worker>(&query)
            .bind(line_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a worker by primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Worker>, sqlx::Error> {
        let query = format!("SELECT {WORKER_COLUMNS} FROM workers WHERE id = $1");
        sqlx::query_as::<_, Worker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the worker for a platform identity, creating the row on first
    /// contact.
    ///
    /// `ON CONFLICT DO NOTHING` plus the re-read makes concurrent follow
    /// events for the same identity converge on a single row.
    pub async fn find_or_create(
        pool: &PgPool,
        line_user_id: &str,
    ) -> Result<Worker, sqlx::Error> {
        let query = format!(
            "INSERT INTO workers (line_user_id) VALUES ($1) \
             ON CONFLICT (line_user_id) DO NOTHING \
             RETURNING {WORKER_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Worker>(&query)
            .bind(line_user_id)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(worker) => {
                tracing::debug!(worker_id = worker.id, "Created worker row on first contact");
                Ok(worker)
            }
            None => {
                let query =
                    format!("SELECT {WORKER_COLUMNS} FROM workers WHERE line_user_id = $1");
                sqlx::query_as::<_, Worker>(&query)
                    .bind(line_user_id)
                    .fetch_one(pool)
                    .await
            }
        }
    }

    /// Set a worker's display name if it is still unset (first-write-wins).
    ///
    /// Returns the row as it is after the call; a worker who already has a
    /// name keeps it.
    pub async fn set_name_if_absent(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Worker, sqlx::Error> {
        let query = format!(
            "UPDATE workers SET name = $2, updated_at = now() \
             WHERE id = $1 AND name IS NULL \
             RETURNING {WORKER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Worker>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(worker) => Ok(worker),
            None => {
                let query = format!("SELECT {WORKER_COLUMNS} FROM workers WHERE id = $1");
                sqlx::query_as::<_, Worker>(&query)
                    .bind(id)
                    .fetch_one(pool)
                    .await
            }
        }
    }

    /// Apply a partial update (dashboard path). `None` fields are left as-is.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        language: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<Worker>, sqlx::Error> {
        let query = format!(
            "UPDATE workers SET \
                name = COALESCE($2, name), \
                language = COALESCE($3, language), \
                is_active = COALESCE($4, is_active), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {WORKER_COLUMNS}"
        );
        sqlx::query_as::<_, Worker>(&query)
            .bind(id)
            .bind(name)
            .bind(language)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }

    /// List workers in registry order (creation order, stable for reports).
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Worker>, sqlx::Error> {
        let query = if active_only {
            format!("SELECT {WORKER_COLUMNS} FROM workers WHERE is_active ORDER BY id")
        } else {
            format!("SELECT {WORKER_COLUMNS} FROM workers ORDER BY id")
        };
        sqlx::query_as::<_, Worker>(&query).fetch_all(pool).await
    }
}
