use std::sync::Arc;

use rollcall_line::Messenger;

use crate::config::ServerConfig;
use crate::locks::WorkerLocks;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rollcall_db::DbPool,
    /// Server + bot configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound messaging collaborator (real client in the binary, mock in tests).
    pub messenger: Arc<dyn Messenger>,
    /// Per-worker mutation locks serializing progress writes.
    pub worker_locks: Arc<WorkerLocks>,
}
