//! Router-level tests for the webhook endpoint.
//!
//! These exercise the verification boundary without a live database: the
//! pool is created lazily against an unreachable address, so any test that
//! reaches a repository observes a connection error -- which is exactly the
//! per-event failure isolation the batch loop must survive.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{FixedOffset, NaiveTime};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use rollcall_api::config::{BotConfig, ServerConfig};
use rollcall_api::locks::WorkerLocks;
use rollcall_api::routes;
use rollcall_api::state::AppState;
use rollcall_core::signature::sign_body;
use rollcall_line::{LineError, Messenger};

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

/// Messenger that records every call instead of hitting the network.
#[derive(Default)]
struct RecordingMessenger {
    calls: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingMessenger {
    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn reply(&self, reply_token: &str, _messages: Vec<Value>) -> Result<(), LineError> {
        self.calls.lock().unwrap().push(("reply", reply_token.to_string()));
        Ok(())
    }

    async fn push(&self, to: &str, _messages: Vec<Value>) -> Result<(), LineError> {
        self.calls.lock().unwrap().push(("push", to.to_string()));
        Ok(())
    }
}

fn test_config(channel_secret: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec![],
        request_timeout_secs: 5,
        bot: BotConfig {
            channel_secret: channel_secret.map(String::from),
            access_token: Some("test-token".into()),
            manager_user_id: Some("Umanager".into()),
            wake_up_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            late_report_time: NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
            utc_offset: FixedOffset::east_opt(9 * 3600).unwrap(),
        },
    }
}

/// App wired to an unreachable database and a recording messenger.
fn test_app(channel_secret: Option<&str>) -> (axum::Router, Arc<RecordingMessenger>) {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy("postgres://127.0.0.1:1/rollcall")
        .expect("lazy pool never connects at construction time");

    let messenger = Arc::new(RecordingMessenger::default());
    let state = AppState {
        pool,
        config: Arc::new(test_config(channel_secret)),
        messenger: Arc::clone(&messenger) as Arc<dyn Messenger>,
        worker_locks: Arc::new(WorkerLocks::new()),
    };

    (routes::webhook_routes().with_state(state), messenger)
}

fn webhook_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/webhook");
    if let Some(signature) = signature {
        builder = builder.header("x-line-signature", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn status_and_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// Signature boundary
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_secret_is_a_server_error() {
    let (app, messenger) = test_app(None);
    let body = r#"{"events":[]}"#;
    let sig = sign_body("abc", body.as_bytes());

    let response = app.oneshot(webhook_request(body, Some(&sig))).await.unwrap();
    let (status, json) = status_and_json(response).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "CONFIG_MISSING");
    assert_eq!(messenger.call_count(), 0);
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let (app, messenger) = test_app(Some("abc"));

    let response = app
        .oneshot(webhook_request(r#"{"events":[]}"#, None))
        .await
        .unwrap();
    let (status, json) = status_and_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "SIGNATURE_INVALID");
    assert_eq!(messenger.call_count(), 0);
}

#[tokio::test]
async fn wrong_signature_is_rejected() {
    let (app, messenger) = test_app(Some("abc"));
    let body = r#"{"events":[]}"#;
    let sig = sign_body("a-different-secret", body.as_bytes());

    let response = app.oneshot(webhook_request(body, Some(&sig))).await.unwrap();
    let (status, json) = status_and_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "SIGNATURE_INVALID");
    assert_eq!(messenger.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Verified requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signed_empty_batch_succeeds_with_no_side_effects() {
    // secret = "abc", body = {"events":[]} is the documented scenario.
    let (app, messenger) = test_app(Some("abc"));
    let body = r#"{"events":[]}"#;
    let sig = sign_body("abc", body.as_bytes());

    let response = app.oneshot(webhook_request(body, Some(&sig))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
    assert_eq!(messenger.call_count(), 0);
}

#[tokio::test]
async fn malformed_payload_is_a_no_op_batch() {
    let (app, messenger) = test_app(Some("abc"));
    let body = r#"{"events": "not-a-list"#;
    let sig = sign_body("abc", body.as_bytes());

    let response = app.oneshot(webhook_request(body, Some(&sig))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(messenger.call_count(), 0);
}

#[tokio::test]
async fn event_failures_do_not_fail_the_request() {
    // The follow handler hits the (unreachable) database; the per-event
    // boundary must swallow that and still answer 200.
    let (app, messenger) = test_app(Some("abc"));
    let body = r#"{"events":[{"type":"follow","replyToken":"rt-1","source":{"userId":"U1"}}]}"#;
    let sig = sign_body("abc", body.as_bytes());

    let response = app.oneshot(webhook_request(body, Some(&sig))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    // The handler failed before any reply was sent.
    assert_eq!(messenger.call_count(), 0);
}

#[tokio::test]
async fn unknown_event_kinds_are_ignored() {
    let (app, messenger) = test_app(Some("abc"));
    let body = r#"{"events":[{"type":"unfollow","source":{"userId":"U1"}}]}"#;
    let sig = sign_body("abc", body.as_bytes());

    let response = app.oneshot(webhook_request(body, Some(&sig))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(messenger.call_count(), 0);
}
