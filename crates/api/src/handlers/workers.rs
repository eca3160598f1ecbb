//! Dashboard handlers for worker management.
//!
//! The webhook owns worker creation; these routes only read the roster and
//! apply manager edits (rename, language, deactivation). Deactivation is the
//! one place `is_active` is ever flipped.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use rollcall_core::error::CoreError;
use rollcall_core::types::DbId;
use rollcall_db::repositories::WorkerRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /workers`.
#[derive(Debug, Deserialize)]
pub struct ListWorkersParams {
    /// Defaults to listing only active workers, like the reports do.
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

fn default_active_only() -> bool {
    true
}

/// Partial update for `PATCH /workers/{id}`. Omitted fields are untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateWorker {
    pub name: Option<String>,
    pub language: Option<String>,
    pub is_active: Option<bool>,
}

/// GET /api/v1/workers
pub async fn list_workers(
    State(state): State<AppState>,
    Query(params): Query<ListWorkersParams>,
) -> AppResult<impl IntoResponse> {
    let workers = WorkerRepo::list(&state.pool, params.active_only).await?;
    Ok(Json(DataResponse { data: workers }))
}

/// PATCH /api/v1/workers/{id}
pub async fn update_worker(
    State(state): State<AppState>,
    Path(worker_id): Path<DbId>,
    Json(input): Json<UpdateWorker>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
    }
    if let Some(language) = &input.language {
        if language != "ja" && language != "en" {
            return Err(AppError::BadRequest(format!(
                "language must be 'ja' or 'en', got '{language}'"
            )));
        }
    }

    let updated = WorkerRepo::update(
        &state.pool,
        worker_id,
        input.name.as_deref().map(str::trim),
        input.language.as_deref(),
        input.is_active,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Worker",
        id: worker_id,
    }))?;

    tracing::info!(
        worker_id,
        is_active = updated.is_active,
        "Worker updated"
    );

    Ok(Json(DataResponse { data: updated }))
}
