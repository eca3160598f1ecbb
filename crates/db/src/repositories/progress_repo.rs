//! Repository for the `daily_progress` table.
//!
//! Exclusive owner of progress row creation and mutation. The unique
//! `(worker_id, date)` index backs the one-row-per-worker-per-day invariant;
//! `stamp_step` creates the row lazily and writes exactly one stage column,
//! last write winning on duplicates.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

use rollcall_core::checkin::CheckInStep;
use rollcall_core::types::DbId;

use crate::models::DailyProgress;

/// Column list for `daily_progress` queries.
const PROGRESS_COLUMNS: &str = "id, worker_id, date, wake_up_time, on_the_way_time, \
                                arrived_time, created_at, updated_at";

/// The column a check-in step writes to.
fn step_column(step: CheckInStep) -> &'static str {
    match step {
        CheckInStep::WakeUp => "wake_up_time",
        CheckInStep::OnTheWay => "on_the_way_time",
        CheckInStep::Arrived => "arrived_time",
    }
}

/// Provides read/write operations for daily progress rows.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Find the progress row for one worker on one date.
    pub async fn find(
        pool: &PgPool,
        worker_id: DbId,
        date: NaiveDate,
    ) -> Result<Option<DailyProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {PROGRESS_COLUMNS} FROM daily_progress WHERE worker_id = $1 AND date = $2"
        );
        sqlx::query_as::<_, DailyProgress>(&query)
            .bind(worker_id)
            .bind(date)
            .fetch_optional(pool)
            .await
    }

    /// Stamp one stage column for `(worker, date)`, creating the row if it
    /// does not exist yet.
    ///
    /// Other stage columns are untouched: no backfill of earlier steps and
    /// no clearing of later ones. Re-stamping the same step overwrites the
    /// previous time.
    pub async fn stamp_step(
        pool: &PgPool,
        worker_id: DbId,
        date: NaiveDate,
        step: CheckInStep,
        time: NaiveTime,
    ) -> Result<DailyProgress, sqlx::Error> {
        let column = step_column(step);
        let query = format!(
            "INSERT INTO daily_progress (worker_id, date, {column}) VALUES ($1, $2, $3) \
             ON CONFLICT (worker_id, date) \
             DO UPDATE SET {column} = EXCLUDED.{column}, updated_at = now() \
             RETURNING {PROGRESS_COLUMNS}"
        );
        sqlx::query_as::<_, DailyProgress>(&query)
            .bind(worker_id)
            .bind(date)
            .bind(time)
            .fetch_one(pool)
            .await
    }

    /// All progress rows for one date.
    pub async fn list_for_date(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<DailyProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {PROGRESS_COLUMNS} FROM daily_progress WHERE date = $1 ORDER BY worker_id"
        );
        sqlx::query_as::<_, DailyProgress>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Progress rows for an inclusive date range, newest date first.
    pub async fn list_for_range(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {PROGRESS_COLUMNS} FROM daily_progress \
             WHERE date BETWEEN $1 AND $2 ORDER BY date DESC, worker_id"
        );
        sqlx::query_as::<_, DailyProgress>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }
}
