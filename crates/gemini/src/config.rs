/// Gateway client configuration loaded from environment variables.
///
/// All fields except the API key have defaults suitable for the public
/// Gemini endpoint; override via environment variables.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as the `key` query parameter.
    pub api_key: String,
    /// Base endpoint URL (no trailing slash).
    pub endpoint: String,
    /// Model used for menu parsing (structured text output).
    pub text_model: String,
    /// Model used for image synthesis via `:predict`.
    pub image_model: String,
    /// Model used for image editing via `:generateContent`.
    pub edit_model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                                            |
    /// |-----------------------|----------------------------------------------------|
    /// | `GEMINI_API_KEY`      | (required)                                         |
    /// | `GEMINI_ENDPOINT`     | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `GEMINI_TEXT_MODEL`   | `gemini-2.5-flash`                                 |
    /// | `GEMINI_IMAGE_MODEL`  | `imagen-4.0-generate-001`                          |
    /// | `GEMINI_EDIT_MODEL`   | `gemini-2.5-flash-image`                           |
    /// | `GEMINI_TIMEOUT_SECS` | `60`                                               |
    ///
    /// Panics if `GEMINI_API_KEY` is unset -- misconfiguration should
    /// fail at startup, not on the first request.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");

        let endpoint = std::env::var("GEMINI_ENDPOINT")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());

        let text_model =
            std::env::var("GEMINI_TEXT_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into());

        let image_model = std::env::var("GEMINI_IMAGE_MODEL")
            .unwrap_or_else(|_| "imagen-4.0-generate-001".into());

        let edit_model =
            std::env::var("GEMINI_EDIT_MODEL").unwrap_or_else(|_| "gemini-2.5-flash-image".into());

        let timeout_secs: u64 = std::env::var("GEMINI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("GEMINI_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            endpoint,
            text_model,
            image_model,
            edit_model,
            timeout_secs,
        }
    }
}
