//! REST client library for the external generative AI gateway.
//!
//! Provides typed wire structures for the Gemini `generateContent` and
//! Imagen `predict` endpoints, an HTTP API wrapper, and the
//! [`MenuGateway`](gateway::MenuGateway) trait seam the orchestration
//! layer depends on.

pub mod api;
pub mod config;
pub mod gateway;
pub mod wire;

pub use api::{GeminiApi, GeminiApiError};
pub use config::GeminiConfig;
pub use gateway::{GatewayError, GeminiGateway, MenuGateway};
