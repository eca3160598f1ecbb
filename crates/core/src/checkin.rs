//! Check-in step and per-day status types.
//!
//! A worker walks through three steps each day: wake-up, en-route, arrived.
//! Steps arrive as postback action codes; the per-day status is derived from
//! whichever stage timestamps are present, highest stage winning.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CheckInStep
// ---------------------------------------------------------------------------

/// One step of the daily check-in ritual.
///
/// The wire representation is the postback action code (`wake_up`,
/// `on_the_way`, `arrived`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStep {
    WakeUp,
    OnTheWay,
    Arrived,
}

impl CheckInStep {
    /// Parse a postback action code.
    ///
    /// Accepts the bare code as well as the `action=<code>` form some
    /// message templates use. Unknown codes return `None`; the caller
    /// decides whether to ignore or log.
    pub fn from_action(data: &str) -> Option<Self> {
        let code = data.trim().strip_prefix("action=").unwrap_or(data.trim());
        match code {
            "wake_up" => Some(Self::WakeUp),
            "on_the_way" => Some(Self::OnTheWay),
            "arrived" => Some(Self::Arrived),
            _ => None,
        }
    }

    /// The postback action code for this step.
    pub fn action(&self) -> &'static str {
        match self {
            Self::WakeUp => "wake_up",
            Self::OnTheWay => "on_the_way",
            Self::Arrived => "arrived",
        }
    }
}

// ---------------------------------------------------------------------------
// StepTimes / DayStatus
// ---------------------------------------------------------------------------

/// The three optional stage timestamps of a worker's day.
///
/// A missing row is equivalent to all three being unset. No backfill: a
/// worker may have a later stage stamped while an earlier one is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepTimes {
    pub wake_up: Option<NaiveTime>,
    pub on_the_way: Option<NaiveTime>,
    pub arrived: Option<NaiveTime>,
}

impl StepTimes {
    /// The time slot a given step writes to.
    pub fn get(&self, step: CheckInStep) -> Option<NaiveTime> {
        match step {
            CheckInStep::WakeUp => self.wake_up,
            CheckInStep::OnTheWay => self.on_the_way,
            CheckInStep::Arrived => self.arrived,
        }
    }
}

/// A worker's classified status for one day.
///
/// Precedence is Arrived > OnTheWay > Awake > NoResponse, regardless of
/// which earlier fields happen to be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    NoResponse,
    Awake(NaiveTime),
    OnTheWay(NaiveTime),
    Arrived(NaiveTime),
}

impl DayStatus {
    /// Classify a day from its stage timestamps (absence = no response).
    pub fn classify(times: Option<StepTimes>) -> Self {
        let Some(times) = times else {
            return Self::NoResponse;
        };
        if let Some(t) = times.arrived {
            Self::Arrived(t)
        } else if let Some(t) = times.on_the_way {
            Self::OnTheWay(t)
        } else if let Some(t) = times.wake_up {
            Self::Awake(t)
        } else {
            Self::NoResponse
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
