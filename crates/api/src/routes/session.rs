//! Route definitions for session state.
//!
//! ```text
//! GET    /session           get_session
//! DELETE /session/error     dismiss_error
//! ```

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Routes merged directly into `/api/v1` (not nested, so the snapshot
/// lives at `/session` rather than under a trailing slash).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", get(session::get_session))
        .route("/session/error", delete(session::dismiss_error))
}
