//! Route definitions for menu parsing.
//!
//! ```text
//! POST /parse        parse_menu
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::menu;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/parse", post(menu::parse_menu))
}
