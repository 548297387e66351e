//! Handlers for session state.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/session
///
/// Returns the full session snapshot the presentation layer renders
/// from: dishes, image data URIs, per-dish job flags, the parse/batch
/// flags, and the current error.
pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.session.snapshot().await;
    Json(DataResponse { data: snapshot })
}

/// DELETE /api/v1/session/error
///
/// Dismisses the currently displayed error, if any.
pub async fn dismiss_error(State(state): State<AppState>) -> impl IntoResponse {
    state.session.dismiss_error().await;
    StatusCode::NO_CONTENT
}
