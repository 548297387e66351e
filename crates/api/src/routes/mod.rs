pub mod dishes;
pub mod health;
pub mod menu;
pub mod session;
pub mod styles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /menu/parse                      parse menu text into dishes (POST)
///
/// /dishes/{id}/generate            generate an image for one dish (POST)
/// /dishes/{id}/edit                edit a dish's image (POST)
/// /dishes/generate-all             generate for every dish lacking one (POST)
///
/// /session                         session snapshot (GET)
/// /session/error                   dismiss the current error (DELETE)
///
/// /styles                          list available photo styles (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/menu", menu::router())
        .nest("/dishes", dishes::router())
        .merge(session::router())
        .merge(styles::router())
}
