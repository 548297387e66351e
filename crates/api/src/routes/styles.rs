//! Route definitions for the style catalog.
//!
//! ```text
//! GET /styles          list_styles
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::styles;
use crate::state::AppState;

/// Routes merged directly into `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/styles", get(styles::list_styles))
}
