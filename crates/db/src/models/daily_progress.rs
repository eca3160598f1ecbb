//! Daily progress entity model.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::FromRow;

use rollcall_core::checkin::StepTimes;
use rollcall_core::types::{DbId, Timestamp};

/// A row from the `daily_progress` table.
///
/// At most one row per `(worker_id, date)`; each of the three stage columns
/// is stamped by the corresponding postback and stays NULL otherwise. Rows
/// are never deleted, they are the history the reports read.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyProgress {
    pub id: DbId,
    pub worker_id: DbId,
    pub date: NaiveDate,
    pub wake_up_time: Option<NaiveTime>,
    pub on_the_way_time: Option<NaiveTime>,
    pub arrived_time: Option<NaiveTime>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DailyProgress {
    /// Project the three stage columns into the domain type.
    pub fn step_times(&self) -> StepTimes {
        StepTimes {
            wake_up: self.wake_up_time,
            on_the_way: self.on_the_way_time,
            arrived: self.arrived_time,
        }
    }
}
