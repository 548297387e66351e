use std::sync::Arc;

use platelens_session::SessionManager;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The session orchestration context (dishes, images, job flags).
    pub session: Arc<SessionManager>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
