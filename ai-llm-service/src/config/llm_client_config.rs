use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM client.
///
/// There is no model field: one client serves every
/// candidate model, and the model is chosen per call.
///
/// # Fields
///
/// - `provider`: Which backend to use.
/// - `endpoint`: API base, e.g. `https://generativelanguage.googleapis.com/v1beta`.
/// - `api_key`: Credential; `None` when the environment does not provide one.
/// - `max_tokens`: Maximum number of output tokens (if set).
/// - `temperature`: Sampling temperature (if set).
/// - `top_p`: Nucleus sampling cutoff (if set).
/// - `timeout_secs`: Optional request timeout; transport defaults apply when `None`.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmClientConfig, LlmProvider};
///
/// let cfg = LlmClientConfig {
///     provider: LlmProvider::Gemini,
///     endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
///     api_key: Some("key".to_string()),
///     max_tokens: None,
///     temperature: None,
///     top_p: None,
///     timeout_secs: None,
/// };
/// assert!(cfg.api_key.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmClientConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// API base URL (without the `/models/...` suffix).
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
