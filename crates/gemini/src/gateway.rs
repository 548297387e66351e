//! The gateway seam between the orchestration layer and the external AI
//! service.
//!
//! [`MenuGateway`] is the trait the session layer depends on; it exposes
//! the three remote capabilities (menu parsing, image synthesis, image
//! editing) with domain types on both sides. [`GeminiGateway`] is the
//! production implementation over [`GeminiApi`]. Tests substitute their
//! own implementations to script gateway behaviour.

use async_trait::async_trait;
use serde_json::json;

use platelens_core::artifact::{EncodedImage, ImageArtifact};
use platelens_core::dish::ParsedDish;

use crate::api::{GeminiApi, GeminiApiError};
use crate::wire::{
    Content, GenerateContentRequest, GenerationConfig, ImageInstance, Part, PredictParameters,
    PredictRequest,
};

/// Aspect ratio requested for every synthesized dish photo.
const GENERATION_ASPECT_RATIO: &str = "4:3";

/// MIME type requested for synthesized images.
const GENERATION_MIME_TYPE: &str = "image/jpeg";

/// Errors surfaced by gateway implementations.
///
/// Transport failures are wrapped; interpretation failures get their own
/// variants so callers can produce precise user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The REST layer failed (network error or non-2xx status).
    #[error(transparent)]
    Api(#[from] GeminiApiError),

    /// The gateway replied 2xx but the payload was not interpretable
    /// (no text part, or text that is not the contracted JSON shape).
    #[error("Malformed gateway response: {0}")]
    Malformed(String),

    /// The gateway replied 2xx but carried no image data.
    #[error("No image data in gateway response")]
    NoImage,
}

/// Remote capabilities of the external generative AI service.
#[async_trait]
pub trait MenuGateway: Send + Sync {
    /// Extract `{name, description}` dish pairs from raw menu text.
    async fn parse_menu(&self, prompt: &str) -> Result<Vec<ParsedDish>, GatewayError>;

    /// Synthesize one image from a fully assembled prompt.
    async fn generate_image(&self, prompt: &str) -> Result<ImageArtifact, GatewayError>;

    /// Apply a free-text edit instruction to an existing image.
    async fn edit_image(
        &self,
        image: &EncodedImage,
        instruction: &str,
    ) -> Result<ImageArtifact, GatewayError>;
}

/// Production gateway backed by the Gemini REST API.
pub struct GeminiGateway {
    api: GeminiApi,
}

impl GeminiGateway {
    pub fn new(api: GeminiApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl MenuGateway for GeminiGateway {
    async fn parse_menu(&self, prompt: &str) -> Result<Vec<ParsedDish>, GatewayError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::text(prompt)],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(dish_list_schema()),
                response_modalities: None,
            }),
        };

        let model = self.api.config().text_model.clone();
        let response = self.api.generate_content(&model, &request).await?;

        let text = response
            .first_text()
            .ok_or_else(|| GatewayError::Malformed("no text part in response".to_string()))?;

        let dishes: Vec<ParsedDish> = serde_json::from_str(text.trim())
            .map_err(|e| GatewayError::Malformed(format!("dish list is not valid JSON: {e}")))?;

        tracing::debug!(count = dishes.len(), "Parsed menu into dishes");
        Ok(dishes)
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageArtifact, GatewayError> {
        let request = PredictRequest {
            instances: vec![ImageInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: GENERATION_ASPECT_RATIO.to_string(),
                output_mime_type: GENERATION_MIME_TYPE.to_string(),
            },
        };

        let model = self.api.config().image_model.clone();
        let response = self.api.predict(&model, &request).await?;

        let prediction = response.predictions.into_iter().next().ok_or(GatewayError::NoImage)?;
        let data = prediction.bytes_base64_encoded.ok_or(GatewayError::NoImage)?;
        let mime_type = prediction
            .mime_type
            .unwrap_or_else(|| GENERATION_MIME_TYPE.to_string());

        tracing::debug!(mime_type = %mime_type, "Generated image");
        Ok(ImageArtifact::from_encoded_parts(&mime_type, &data))
    }

    async fn edit_image(
        &self,
        image: &EncodedImage,
        instruction: &str,
    ) -> Result<ImageArtifact, GatewayError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::inline_data(&image.mime_type, &image.data),
                    Part::text(instruction),
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                ..GenerationConfig::default()
            }),
        };

        let model = self.api.config().edit_model.clone();
        let response = self.api.generate_content(&model, &request).await?;

        let inline = response.first_inline_data().ok_or(GatewayError::NoImage)?;

        tracing::debug!(mime_type = %inline.mime_type, "Edited image");
        Ok(ImageArtifact::from_encoded_parts(&inline.mime_type, &inline.data))
    }
}

/// Structured-output schema for the parse call: an array of
/// `{name, description}` objects, both required.
fn dish_list_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": {
                    "type": "STRING",
                    "description": "The name of the dish.",
                },
                "description": {
                    "type": "STRING",
                    "description": "A brief description of the dish.",
                },
            },
            "required": ["name", "description"],
        },
    })
}
