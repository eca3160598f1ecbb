pub mod health;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /workers                GET (list), ?active_only=
/// /workers/{id}           PATCH (rename, language, deactivate)
///
/// /progress/today         GET, ?date=YYYY-MM-DD
/// /progress/history       GET, ?start=&end=
/// /progress/summary       GET, ?date=
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/workers", get(handlers::workers::list_workers))
        .route("/workers/{id}", patch(handlers::workers::update_worker))
        .route("/progress/today", get(handlers::progress::today))
        .route("/progress/history", get(handlers::progress::history))
        .route("/progress/summary", get(handlers::progress::summary))
}

/// Mount the platform webhook (root-level, NOT under `/api/v1`).
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhook", post(handlers::webhook::receive_webhook))
}
