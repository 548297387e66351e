//! HTTP wrapper for the gateway's REST endpoints, using [`reqwest`].
//!
//! [`GeminiApi`] is a thin transport layer: it builds model URLs, ships
//! typed request bodies, and classifies non-2xx replies. Interpretation
//! of response contents belongs to [`crate::gateway`].

use std::time::Duration;

use crate::config::GeminiConfig;
use crate::wire::{GenerateContentRequest, GenerateContentResponse, PredictRequest, PredictResponse};

/// HTTP client for one gateway endpoint + API key pair.
pub struct GeminiApi {
    client: reqwest::Client,
    config: GeminiConfig,
}

/// Errors from the REST transport layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Gateway API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl GeminiApi {
    /// Create a new API client.
    ///
    /// Fails only if the underlying HTTP client cannot be constructed
    /// (e.g. TLS backend initialisation).
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling in tests and embeddings).
    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// `POST /models/{model}:generateContent`
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        let response = self
            .client
            .post(self.build_url(model, "generateContent"))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `POST /models/{model}:predict`
    pub async fn predict(
        &self,
        model: &str,
        request: &PredictRequest,
    ) -> Result<PredictResponse, GeminiApiError> {
        let response = self
            .client
            .post(self.build_url(model, "predict"))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn build_url(&self, model: &str, verb: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.config.endpoint, model, verb, self.config.api_key
        )
    }

    /// Ensure the response has a success status code, then parse the
    /// JSON body into the expected type. Non-2xx replies become
    /// [`GeminiApiError::Api`] carrying the status and body text.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GeminiApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeminiApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}
