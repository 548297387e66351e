//! Handlers for per-dish image operations.
//!
//! Routes:
//! - `POST /dishes/{id}/generate` -- generate an image for one dish
//! - `POST /dishes/{id}/edit`     -- apply an edit instruction to a dish's image
//! - `POST /dishes/generate-all`  -- generate for every dish lacking an image

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use platelens_core::style::ImageStyle;
use platelens_core::types::DishId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub style: ImageStyle,
}

#[derive(Debug, Deserialize)]
pub struct EditImageRequest {
    pub instruction: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateAllRequest {
    pub style: ImageStyle,
}

/// Response for single-image operations: the dish and its new artifact,
/// as a data URI the presentation layer can render directly.
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub dish_id: DishId,
    pub image: String,
}

/// POST /api/v1/dishes/{id}/generate
pub async fn generate_image(
    State(state): State<AppState>,
    Path(id): Path<DishId>,
    Json(input): Json<GenerateImageRequest>,
) -> AppResult<impl IntoResponse> {
    let artifact = state.session.generate_image(id, input.style).await?;
    Ok(Json(DataResponse {
        data: ImageResponse {
            dish_id: id,
            image: artifact.as_data_uri().to_string(),
        },
    }))
}

/// POST /api/v1/dishes/{id}/edit
///
/// The edit overwrites the dish's cached artifact; there is no history.
pub async fn edit_image(
    State(state): State<AppState>,
    Path(id): Path<DishId>,
    Json(input): Json<EditImageRequest>,
) -> AppResult<impl IntoResponse> {
    if input.instruction.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Edit instruction must not be empty".to_string(),
        ));
    }

    let artifact = state.session.edit_image(id, &input.instruction).await?;
    Ok(Json(DataResponse {
        data: ImageResponse {
            dish_id: id,
            image: artifact.as_data_uri().to_string(),
        },
    }))
}

/// POST /api/v1/dishes/generate-all
///
/// Runs sequentially over the dish list; per-dish failures are recorded
/// in the session and do not fail the request. Returns the run summary.
pub async fn generate_all(
    State(state): State<AppState>,
    Json(input): Json<GenerateAllRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.session.generate_all(input.style).await;
    Ok(Json(DataResponse { data: outcome }))
}
