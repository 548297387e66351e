//! Handlers for menu parsing.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseMenuRequest {
    pub menu_text: String,
}

/// POST /api/v1/menu/parse
///
/// Parses raw menu text into a fresh dish list, replacing the previous
/// session contents. Returns the new dishes; images and job flags start
/// empty.
pub async fn parse_menu(
    State(state): State<AppState>,
    Json(input): Json<ParseMenuRequest>,
) -> AppResult<impl IntoResponse> {
    let dishes = state.session.parse_menu(&input.menu_text).await?;
    Ok(Json(DataResponse { data: dishes }))
}
