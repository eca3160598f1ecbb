//! The two daily check-in triggers.
//!
//! Trigger A broadcasts the wake-up prompt to every active worker at the
//! configured start time; trigger B, scheduled after it, pushes the lateness
//! digest to the manager. Each runs as its own cancellable loop: sleep until
//! the next occurrence of its wall-clock time in the configured offset, run
//! once, repeat. The loop body is awaited in place, so a run can never
//! overlap the next day's firing of the same trigger, and neither trigger
//! ever blocks inbound webhook processing.

use std::collections::HashMap;

use chrono::{NaiveDateTime, NaiveTime, Utc};
use tokio_util::sync::CancellationToken;

use rollcall_core::checkin::DayStatus;
use rollcall_core::report::{compose_report, ReportEntry};
use rollcall_db::repositories::{ProgressRepo, WorkerRepo};
use rollcall_line::{Language, OutboundMessage};

use crate::state::AppState;

/// Run the wake-up broadcast loop (trigger A).
pub async fn run_wake_up_broadcast(state: AppState, cancel: CancellationToken) {
    let at = state.config.bot.wake_up_time;
    tracing::info!(at = %at, "Wake-up broadcast scheduler started");

    loop {
        if !sleep_until_daily(&state, at, &cancel).await {
            tracing::info!("Wake-up broadcast scheduler stopping");
            break;
        }
        if let Err(e) = broadcast_wake_up(&state).await {
            tracing::error!(error = %e, "Wake-up broadcast failed");
        }
    }
}

/// Run the lateness report loop (trigger B).
pub async fn run_late_report(state: AppState, cancel: CancellationToken) {
    let at = state.config.bot.late_report_time;
    tracing::info!(at = %at, "Lateness report scheduler started");

    loop {
        if !sleep_until_daily(&state, at, &cancel).await {
            tracing::info!("Lateness report scheduler stopping");
            break;
        }
        if let Err(e) = send_late_report(&state).await {
            tracing::error!(error = %e, "Lateness report failed");
        }
    }
}

/// Sleep until the next daily occurrence of `at` in the configured offset.
///
/// Returns `false` when cancelled.
async fn sleep_until_daily(state: &AppState, at: NaiveTime, cancel: &CancellationToken) -> bool {
    let now = Utc::now().with_timezone(&state.config.bot.utc_offset);
    let delay = delay_until_next(now.naive_local(), at)
        .to_std()
        .unwrap_or_default();

    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

/// Duration from `now` until the next occurrence of `at` (today if still
/// ahead, otherwise tomorrow).
fn delay_until_next(now: NaiveDateTime, at: NaiveTime) -> chrono::Duration {
    let mut target = now.date().and_time(at);
    if target <= now {
        target += chrono::Duration::days(1);
    }
    target - now
}

/// Push the wake-up prompt to every active worker.
///
/// Per-worker delivery failures are logged and skipped; one unreachable
/// worker must not starve the rest of the roster.
async fn broadcast_wake_up(state: &AppState) -> Result<(), sqlx::Error> {
    let workers = WorkerRepo::list(&state.pool, true).await?;

    let mut delivered = 0usize;
    for worker in &workers {
        let lang = Language::from_code(&worker.language);
        let messages = vec![OutboundMessage::WakeUpPrompt.render(lang)];
        match state.messenger.push(&worker.line_user_id, messages).await {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::warn!(
                    worker_id = worker.id,
                    error = %e,
                    "Wake-up push failed, continuing broadcast"
                );
            }
        }
    }

    tracing::info!(total = workers.len(), delivered, "Wake-up broadcast complete");
    Ok(())
}

/// Classify today's roster and push the digest to the manager.
async fn send_late_report(state: &AppState) -> Result<(), sqlx::Error> {
    let Some(manager) = state.config.bot.manager_user_id.clone() else {
        tracing::error!("MANAGER_USER_ID not configured, skipping lateness report");
        return Ok(());
    };

    let today = Utc::now()
        .with_timezone(&state.config.bot.utc_offset)
        .date_naive();

    let workers = WorkerRepo::list(&state.pool, true).await?;
    let rows = ProgressRepo::list_for_date(&state.pool, today).await?;
    let by_worker: HashMap<_, _> = rows.iter().map(|r| (r.worker_id, r.step_times())).collect();

    let entries: Vec<ReportEntry> = workers
        .iter()
        .map(|worker| ReportEntry {
            name: worker.display_name(),
            status: DayStatus::classify(by_worker.get(&worker.id).copied()),
        })
        .collect();

    let digest = compose_report(today, &entries);
    let messages = vec![OutboundMessage::Text(digest).render(Language::default())];

    if let Err(e) = state.messenger.push(&manager, messages).await {
        tracing::error!(error = %e, "Failed to push lateness report to manager");
    } else {
        tracing::info!(workers = entries.len(), %today, "Lateness report delivered");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn dt(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn fires_later_today_when_time_is_ahead() {
        let delay = delay_until_next(dt(5, 0, 0), t(6, 0));
        assert_eq!(delay, chrono::Duration::hours(1));
    }

    #[test]
    fn rolls_to_tomorrow_when_time_has_passed() {
        let delay = delay_until_next(dt(6, 30, 0), t(6, 0));
        assert_eq!(delay, chrono::Duration::hours(23) + chrono::Duration::minutes(30));
    }

    #[test]
    fn exact_hit_rolls_to_tomorrow() {
        // Firing at the exact target must schedule the NEXT day, or the
        // loop would fire twice in the same second.
        let delay = delay_until_next(dt(6, 0, 0), t(6, 0));
        assert_eq!(delay, chrono::Duration::days(1));
    }

    #[test]
    fn delay_is_never_negative() {
        let delay = delay_until_next(dt(23, 59, 59), t(0, 0));
        assert!(delay > chrono::Duration::zero());
        assert!(delay <= chrono::Duration::days(1));
    }
}
