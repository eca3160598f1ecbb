//! Inbound webhook: signature guard, event routing, and the check-in state
//! machine.
//!
//! Verification order mirrors the platform contract: missing credentials are
//! a server error before anything is read, a bad signature discards the
//! batch as a client error, and past that point the response is success --
//! each event is handled behind its own failure boundary so one bad event
//! never takes its siblings down.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use chrono::Utc;

use rollcall_core::checkin::CheckInStep;
use rollcall_core::signature::verify_signature;
use rollcall_db::models::Worker;
use rollcall_db::repositories::{ProgressRepo, WorkerRepo};
use rollcall_line::messages::{
    arrival_recorded_text, fallback_text, name_registered_text, welcome_text,
};
use rollcall_line::{Language, MessageContent, OutboundMessage, WebhookEvent, WebhookPayload};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the base64 HMAC-SHA256 signature of the request body.
const SIGNATURE_HEADER: &str = "x-line-signature";

/// POST /webhook
///
/// Entry point for all platform events. Returns 200 whenever the signature
/// was valid, even if individual events failed.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let bot = &state.config.bot;
    let secret = bot
        .channel_secret
        .as_deref()
        .ok_or(AppError::ConfigMissing("LINE_CHANNEL_SECRET"))?;
    if bot.access_token.is_none() {
        return Err(AppError::ConfigMissing("LINE_CHANNEL_ACCESS_TOKEN"));
    }

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::SignatureInvalid)?;

    // Verify against the exact wire bytes, never a re-serialized copy.
    if !verify_signature(secret, &body, signature) {
        return Err(AppError::SignatureInvalid);
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed webhook payload");
            return Ok("OK");
        }
    };

    for event in payload.events {
        if let Err(e) = handle_event(&state, event).await {
            tracing::error!(error = %e, "Event handler failed, continuing with batch");
        }
    }

    Ok("OK")
}

/// Dispatch one verified event.
async fn handle_event(state: &AppState, event: WebhookEvent) -> AppResult<()> {
    match event {
        WebhookEvent::Follow { reply_token, source } => {
            let Some(user_id) = source.user_id else {
                tracing::debug!("Ignoring follow event without user id");
                return Ok(());
            };
            handle_follow(state, &reply_token, &user_id).await
        }
        WebhookEvent::Message { reply_token, source, message } => {
            let MessageContent::Text { text } = message else {
                tracing::debug!("Ignoring non-text message event");
                return Ok(());
            };
            let Some(user_id) = source.user_id else {
                tracing::debug!("Ignoring message event without user id");
                return Ok(());
            };
            handle_text_message(state, &reply_token, &user_id, &text).await
        }
        WebhookEvent::Postback { reply_token, source, postback } => {
            let Some(step) = CheckInStep::from_action(&postback.data) else {
                tracing::debug!(data = %postback.data, "Ignoring unknown postback action");
                return Ok(());
            };
            let Some(user_id) = source.user_id else {
                tracing::debug!("Ignoring postback event without user id");
                return Ok(());
            };
            handle_check_in(state, &reply_token, &user_id, step).await
        }
        WebhookEvent::Other => {
            tracing::debug!("Ignoring unhandled event kind");
            Ok(())
        }
    }
}

/// `follow`: register the worker on first contact and ask for their name.
async fn handle_follow(state: &AppState, reply_token: &str, user_id: &str) -> AppResult<()> {
    let worker = WorkerRepo::find_or_create(&state.pool, user_id).await?;
    tracing::info!(worker_id = worker.id, "Worker followed");

    let lang = worker_language(&worker);
    reply(state, reply_token, OutboundMessage::Text(welcome_text(lang)), lang).await
}

/// Free text: the first message after registration sets the display name
/// (first-write-wins, the only mutation path for the name field); anything
/// later gets the generic fallback.
async fn handle_text_message(
    state: &AppState,
    reply_token: &str,
    user_id: &str,
    text: &str,
) -> AppResult<()> {
    let worker = WorkerRepo::find_or_create(&state.pool, user_id).await?;
    let lang = worker_language(&worker);

    let name = text.trim();
    if worker.name.is_some() || name.is_empty() {
        return reply(state, reply_token, OutboundMessage::Text(fallback_text(lang)), lang).await;
    }

    let updated = WorkerRepo::set_name_if_absent(&state.pool, worker.id, name).await?;
    let registered = updated.name.as_deref().unwrap_or(name);
    tracing::info!(worker_id = updated.id, name = registered, "Worker name registered");

    reply(
        state,
        reply_token,
        OutboundMessage::Text(name_registered_text(lang, registered)),
        lang,
    )
    .await
}

/// Postback with a known step: advance the worker's day and prompt the next
/// step (or close out on arrival).
async fn handle_check_in(
    state: &AppState,
    reply_token: &str,
    user_id: &str,
    step: CheckInStep,
) -> AppResult<()> {
    let worker = WorkerRepo::find_or_create(&state.pool, user_id).await?;
    let lang = worker_language(&worker);

    // Serialize progress writes per worker; the guard spans the upsert so
    // two in-flight postbacks cannot interleave field writes.
    let _guard = state.worker_locks.acquire(user_id).await;

    let now = Utc::now().with_timezone(&state.config.bot.utc_offset);
    let progress =
        ProgressRepo::stamp_step(&state.pool, worker.id, now.date_naive(), step, now.time())
            .await?;

    tracing::info!(
        worker_id = worker.id,
        date = %progress.date,
        action = step.action(),
        "Check-in step recorded"
    );

    let message = match step {
        CheckInStep::WakeUp => OutboundMessage::OnTheWayPrompt,
        CheckInStep::OnTheWay => OutboundMessage::ArrivedPrompt,
        CheckInStep::Arrived => OutboundMessage::Text(arrival_recorded_text(lang)),
    };
    reply(state, reply_token, message, lang).await
}

fn worker_language(worker: &Worker) -> Language {
    Language::from_code(&worker.language)
}

async fn reply(
    state: &AppState,
    reply_token: &str,
    message: OutboundMessage,
    lang: Language,
) -> AppResult<()> {
    state
        .messenger
        .reply(reply_token, vec![message.render(lang)])
        .await?;
    Ok(())
}
