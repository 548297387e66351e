//! Route definitions for per-dish image operations.
//!
//! ```text
//! POST /{id}/generate       generate_image
//! POST /{id}/edit           edit_image
//! POST /generate-all        generate_all
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::dishes;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/generate", post(dishes::generate_image))
        .route("/{id}/edit", post(dishes::edit_image))
        .route("/generate-all", post(dishes::generate_all))
}
