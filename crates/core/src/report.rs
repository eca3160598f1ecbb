//! Manager-facing daily digest composition.
//!
//! Pure text assembly: given the active workers in registry order and each
//! one's classified status, produce the multi-line report the manager
//! receives once per day. Deterministic for the same inputs.

use chrono::NaiveDate;
use serde::Serialize;

use crate::checkin::DayStatus;

/// One worker's line in the digest.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    /// Display name, or the registry fallback for unnamed workers.
    pub name: String,
    pub status: DayStatus,
}

/// Aggregate counts across the day, highest stage winning per worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub awake: usize,
    pub on_the_way: usize,
    pub arrived: usize,
    pub no_response: usize,
}

impl ReportSummary {
    /// Tally entries into per-status counts.
    pub fn tally(entries: &[ReportEntry]) -> Self {
        let mut summary = Self {
            total: entries.len(),
            ..Self::default()
        };
        for entry in entries {
            match entry.status {
                DayStatus::NoResponse => summary.no_response += 1,
                DayStatus::Awake(_) => summary.awake += 1,
                DayStatus::OnTheWay(_) => summary.on_the_way += 1,
                DayStatus::Arrived(_) => summary.arrived += 1,
            }
        }
        summary
    }
}

/// Render one status label, e.g. `Arrived (06:10)` or `No response`.
fn status_label(status: DayStatus) -> String {
    match status {
        DayStatus::NoResponse => "No response".to_string(),
        DayStatus::Awake(t) => format!("Awake ({})", t.format("%H:%M")),
        DayStatus::OnTheWay(t) => format!("On the way ({})", t.format("%H:%M")),
        DayStatus::Arrived(t) => format!("Arrived ({})", t.format("%H:%M")),
    }
}

/// Compose the daily digest.
///
/// Lists every entry exactly once, in the order given (registry order), one
/// numbered status line each, preceded by a summary header. A day where
/// everyone arrived gets a congratulatory header instead of a warning.
pub fn compose_report(date: NaiveDate, entries: &[ReportEntry]) -> String {
    let summary = ReportSummary::tally(entries);

    let mut out = String::new();
    if summary.arrived == summary.total && summary.total > 0 {
        out.push_str(&format!("✅ All workers arrived ({date})\n"));
    } else {
        out.push_str(&format!("⚠️ Check-in report ({date})\n"));
    }
    out.push_str(&format!(
        "Arrived {} / On the way {} / Awake {} / No response {} (total {})\n",
        summary.arrived, summary.on_the_way, summary.awake, summary.no_response, summary.total
    ));

    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} — {}",
            i + 1,
            entry.name,
            status_label(entry.status)
        ));
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
