//! The encoded image artifact type.
//!
//! An [`ImageArtifact`] is an opaque generated or edited image, stored in
//! the form the presentation layer renders directly: a `data:` URI with a
//! base64 payload. The edit path needs the reverse direction -- MIME type
//! and raw base64 payload -- which [`ImageArtifact::encoded_parts`]
//! recovers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An opaque encoded image, held as a `data:{mime};base64,{payload}` URI.
///
/// At most one artifact exists per dish at any time; a newer artifact
/// from generate or edit overwrites the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageArtifact(String);

/// The wire-level halves of an artifact: MIME type plus base64 payload,
/// as the gateway's edit endpoint expects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub data: String,
}

impl ImageArtifact {
    /// Assemble an artifact from the parts a gateway response carries.
    pub fn from_encoded_parts(mime_type: &str, base64_data: &str) -> Self {
        Self(format!("data:{mime_type};base64,{base64_data}"))
    }

    /// The full `data:` URI, ready for an `<img src>` attribute.
    pub fn as_data_uri(&self) -> &str {
        &self.0
    }

    /// Split the artifact back into MIME type and base64 payload.
    ///
    /// Fails if the stored value is not a well-formed base64 `data:` URI;
    /// the payload is decode-checked so a corrupt artifact is caught here
    /// rather than by the gateway.
    pub fn encoded_parts(&self) -> Result<EncodedImage, CoreError> {
        let rest = self
            .0
            .strip_prefix("data:")
            .ok_or_else(|| CoreError::InvalidArtifact("missing data: prefix".to_string()))?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| CoreError::InvalidArtifact("not a base64 data URI".to_string()))?;
        if data.is_empty() {
            return Err(CoreError::InvalidArtifact(
                "empty image payload".to_string(),
            ));
        }
        STANDARD
            .decode(data)
            .map_err(|e| CoreError::InvalidArtifact(format!("invalid base64 payload: {e}")))?;
        Ok(EncodedImage {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }
}
