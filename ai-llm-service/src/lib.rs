//! Gemini client layer for the study-plan backend.
//!
//! - [`config`]: client config, provider kind, env-driven defaults, safety settings.
//! - [`services::gemini_service`]: thin `generateContent` client.
//! - [`error_handler`]: unified [`AiLlmError`] plus env helpers.
//! - [`telemetry`]: library-scoped tracing layer.
//!
//! The [`TextGenerator`] trait is the seam consumed by callers that want to
//! swap the real client for a stub.

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

use std::{future::Future, pin::Pin};

pub use config::llm_client_config::LlmClientConfig;
pub use config::llm_provider::LlmProvider;
pub use config::safety::{HarmBlockThreshold, HarmCategory, SafetySetting};
pub use error_handler::AiLlmError;
pub use services::gemini_service::GeminiService;

/// Boxed future returned by [`TextGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<String>, AiLlmError>> + Send + 'a>>;

/// Provider interface for single-shot text generation.
///
/// `Ok(None)` means the provider answered but produced no content parts
/// (e.g. the prompt was blocked). Transport, HTTP, and decoding problems
/// are reported as `Err`.
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        model: &'a str,
        prompt: &'a str,
        safety: &'a [SafetySetting],
    ) -> GenerateFuture<'a>;
}
