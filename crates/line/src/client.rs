//! HTTP client for the Messaging API.
//!
//! [`Messenger`] is the seam the rest of the application talks through:
//! `reply` is bound to a single inbound event's one-shot token, `push` is
//! unsolicited delivery to a stable user id. [`LineClient`] implements it
//! against the real API with a bounded request timeout so one slow delivery
//! cannot stall a webhook response or a broadcast loop.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

/// Production Messaging API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.line.me/v2/bot";

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for outbound message delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The Messaging API returned a non-2xx status code.
    #[error("Messaging API returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Messenger
// ---------------------------------------------------------------------------

/// Outbound messaging operations, abstracted for tests.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Reply to an inbound event. The token is single-use.
    async fn reply(&self, reply_token: &str, messages: Vec<Value>) -> Result<(), LineError>;

    /// Push unsolicited messages to a user by stable identity.
    async fn push(&self, to: &str, messages: Vec<Value>) -> Result<(), LineError>;
}

// ---------------------------------------------------------------------------
// LineClient
// ---------------------------------------------------------------------------

/// [`Messenger`] backed by the real Messaging API.
pub struct LineClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl LineClient {
    /// Create a client with a pre-configured HTTP client.
    pub fn new(access_token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Execute a single POST and check the response status.
    async fn post(&self, path: &str, body: &Value) -> Result<(), LineError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(status, path, "Messaging API rejected request");
            return Err(LineError::HttpStatus(status));
        }
        Ok(())
    }
}

#[async_trait]
impl Messenger for LineClient {
    async fn reply(&self, reply_token: &str, messages: Vec<Value>) -> Result<(), LineError> {
        let body = json!({ "replyToken": reply_token, "messages": messages });
        self.post("/message/reply", &body).await
    }

    async fn push(&self, to: &str, messages: Vec<Value>) -> Result<(), LineError> {
        let body = json!({ "to": to, "messages": messages });
        self.post("/message/push", &body).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
