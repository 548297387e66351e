//! Handlers for the style catalog.

use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use platelens_core::style::ImageStyle;

use crate::response::DataResponse;

/// One entry in the style catalog.
#[derive(Debug, Serialize)]
pub struct StyleInfo {
    pub id: ImageStyle,
    pub label: &'static str,
    pub prompt_fragment: &'static str,
}

/// GET /api/v1/styles
///
/// The closed set of photo styles, in presentation order.
pub async fn list_styles() -> impl IntoResponse {
    let styles: Vec<StyleInfo> = ImageStyle::ALL
        .iter()
        .map(|&style| StyleInfo {
            id: style,
            label: style.label(),
            prompt_fragment: style.prompt_fragment(),
        })
        .collect();

    Json(DataResponse { data: styles })
}
