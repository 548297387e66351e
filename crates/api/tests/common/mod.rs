//! Shared helpers for API integration tests.
//!
//! Builds the application router with the production middleware stack
//! (CORS, request ID, timeout, tracing, panic recovery) on top of a
//! scripted gateway, so tests exercise the same stack production uses
//! without any network traffic.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use http_body_util::BodyExt;
use tower::ServiceExt;

use platelens_api::config::ServerConfig;
use platelens_api::router::build_app_router;
use platelens_api::state::AppState;
use platelens_core::artifact::{EncodedImage, ImageArtifact};
use platelens_core::dish::ParsedDish;
use platelens_gemini::{GatewayError, MenuGateway};
use platelens_session::SessionManager;

/// Scripted gateway: results are queued per capability and popped in
/// call order; every call is counted.
#[derive(Default)]
pub struct ScriptedGateway {
    parse_results: Mutex<VecDeque<Result<Vec<ParsedDish>, GatewayError>>>,
    generate_results: Mutex<VecDeque<Result<ImageArtifact, GatewayError>>>,
    edit_results: Mutex<VecDeque<Result<ImageArtifact, GatewayError>>>,
    pub parse_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
    pub edit_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn queue_parse(&self, dishes: &[(&str, &str)]) {
        let parsed = dishes
            .iter()
            .map(|(name, description)| ParsedDish {
                name: name.to_string(),
                description: description.to_string(),
            })
            .collect();
        self.parse_results.lock().unwrap().push_back(Ok(parsed));
    }

    pub fn queue_parse_failure(&self) {
        self.parse_results
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::Malformed("scripted failure".to_string())));
    }

    pub fn queue_generate(&self, tag: &str) {
        self.generate_results
            .lock()
            .unwrap()
            .push_back(Ok(test_artifact(tag)));
    }

    pub fn queue_generate_failure(&self) {
        self.generate_results
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::NoImage));
    }

    pub fn queue_edit(&self, tag: &str) {
        self.edit_results
            .lock()
            .unwrap()
            .push_back(Ok(test_artifact(tag)));
    }
}

#[async_trait]
impl MenuGateway for ScriptedGateway {
    async fn parse_menu(&self, _prompt: &str) -> Result<Vec<ParsedDish>, GatewayError> {
        self.parse_calls.fetch_add(1, Ordering::SeqCst);
        self.parse_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Malformed("unscripted call".to_string())))
    }

    async fn generate_image(&self, _prompt: &str) -> Result<ImageArtifact, GatewayError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.generate_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::NoImage))
    }

    async fn edit_image(
        &self,
        _image: &EncodedImage,
        _instruction: &str,
    ) -> Result<ImageArtifact, GatewayError> {
        self.edit_calls.fetch_add(1, Ordering::SeqCst);
        self.edit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::NoImage))
    }
}

/// A small but valid artifact, distinguishable by tag.
pub fn test_artifact(tag: &str) -> ImageArtifact {
    ImageArtifact::from_encoded_parts("image/jpeg", &STANDARD.encode(tag.as_bytes()))
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router over the given scripted gateway.
pub fn build_test_app(gateway: Arc<ScriptedGateway>) -> Router {
    let config = test_config();
    let session = Arc::new(SessionManager::new(gateway as Arc<dyn MenuGateway>));
    let state = AppState {
        session,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a DELETE request against the app.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
