//! Dashboard handlers for reading daily progress.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use rollcall_core::checkin::DayStatus;
use rollcall_core::report::{ReportEntry, ReportSummary};
use rollcall_db::repositories::{ProgressRepo, WorkerRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters with an optional `date` (defaults to today in the
/// configured offset).
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<String>,
}

/// Query parameters for `GET /progress/history`.
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start: String,
    pub end: String,
}

/// GET /api/v1/progress/today
pub async fn today(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = resolve_date(&state, params.date.as_deref())?;
    let rows = ProgressRepo::list_for_date(&state.pool, date).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/progress/history
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> AppResult<impl IntoResponse> {
    let start = parse_date(&params.start)?;
    let end = parse_date(&params.end)?;
    if start > end {
        return Err(AppError::BadRequest(format!(
            "start {start} is after end {end}"
        )));
    }

    let rows = ProgressRepo::list_for_range(&state.pool, start, end).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/progress/summary
///
/// Per-status counts over the active roster for one date, highest stage
/// winning per worker; workers without a row count as no-response.
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = resolve_date(&state, params.date.as_deref())?;

    let workers = WorkerRepo::list(&state.pool, true).await?;
    let rows = ProgressRepo::list_for_date(&state.pool, date).await?;
    let by_worker: HashMap<_, _> = rows.iter().map(|r| (r.worker_id, r.step_times())).collect();

    let entries: Vec<ReportEntry> = workers
        .iter()
        .map(|worker| ReportEntry {
            name: worker.display_name(),
            status: DayStatus::classify(by_worker.get(&worker.id).copied()),
        })
        .collect();

    Ok(Json(DataResponse {
        data: ReportSummary::tally(&entries),
    }))
}

/// Parse an explicit date or fall back to today in the configured offset.
fn resolve_date(state: &AppState, raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw {
        Some(raw) => parse_date(raw),
        None => Ok(Utc::now()
            .with_timezone(&state.config.bot.utc_offset)
            .date_naive()),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("date must be YYYY-MM-DD, got '{raw}'")))
}
