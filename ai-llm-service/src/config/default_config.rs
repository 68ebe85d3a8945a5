//! Default Gemini client config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `GEMINI_API_BASE`     = API base (optional, defaults to the public v1beta endpoint)
//! - `GEMINI_API_KEY`      = credential (optional here; callers decide whether absence is fatal)
//! - `GEMINI_TIMEOUT_SECS` = optional request timeout (u64)
//! - `LLM_MAX_TOKENS`      = optional max output tokens (u32)
//! - `LLM_TEMPERATURE`     = optional sampling temperature (f32)
//! - `LLM_TOP_P`           = optional nucleus sampling cutoff (f32)

use crate::{
    config::{llm_client_config::LlmClientConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, env_opt_f32, env_opt_string, env_opt_u32, env_opt_u64, validate_http_endpoint,
    },
};

/// Public Generative Language API base.
pub const GEMINI_DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Constructs the Gemini client config.
///
/// A missing `GEMINI_API_KEY` is not an error: the key is left as `None`
/// so the server can still start and report the problem per request.
///
/// # Errors
///
/// - [`crate::error_handler::ConfigError::InvalidFormat`] if `GEMINI_API_BASE` has no http(s) scheme
/// - [`crate::error_handler::ConfigError::InvalidNumber`] if a numeric variable does not parse
pub fn config_gemini() -> Result<LlmClientConfig, AiLlmError> {
    let endpoint =
        env_opt_string("GEMINI_API_BASE").unwrap_or_else(|| GEMINI_DEFAULT_ENDPOINT.to_string());
    validate_http_endpoint("GEMINI_API_BASE", &endpoint)?;

    Ok(LlmClientConfig {
        provider: LlmProvider::Gemini,
        endpoint,
        api_key: env_opt_string("GEMINI_API_KEY"),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: env_opt_f32("LLM_TEMPERATURE")?,
        top_p: env_opt_f32("LLM_TOP_P")?,
        timeout_secs: env_opt_u64("GEMINI_TIMEOUT_SECS")?,
    })
}
