//! Google Gemini service for text generation.
//!
//! Minimal, non-streaming client around the Generative Language REST API:
//! - POST {endpoint}/models/{model}:generateContent
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::Gemini`
//! - `cfg.api_key` must be present (sent as `x-goog-api-key`, never in the URL)
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    GenerateFuture, TextGenerator,
    config::{llm_client_config::LlmClientConfig, llm_provider::LlmProvider, safety::SafetySetting},
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Thin client for the Gemini API.
///
/// One instance serves every model identifier; the model is passed per call.
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: LlmClientConfig,
    base: String,
}

impl GeminiService {
    /// Creates a new [`GeminiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not Gemini
    /// - [`AiLlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None` or blank
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmClientConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Gemini {
            return Err(
                ProviderError::new(cfg.provider, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let api_key = cfg
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProviderError::new(cfg.provider, ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                cfg.provider,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let mut key_value = header::HeaderValue::from_str(api_key).map_err(|e| {
            ProviderError::new(
                cfg.provider,
                ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
            )
        })?;
        key_value.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert("x-goog-api-key", key_value);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        // No timeout unless configured: transport defaults apply.
        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let base = endpoint.trim_end_matches('/').to_string();

        info!(
            provider = ?cfg.provider,
            endpoint = %cfg.endpoint,
            timeout_secs = ?cfg.timeout_secs,
            "GeminiService initialized"
        );

        Ok(Self { client, cfg, base })
    }

    /// Full `generateContent` URL for a model identifier.
    ///
    /// Identifiers may be given bare (`gemini-2.0-flash-exp`) or with the
    /// resource prefix (`models/gemini-2.0-flash-exp`).
    pub fn url_for(&self, model: &str) -> String {
        let model = model.trim().trim_start_matches('/');
        if model.starts_with("models/") {
            format!("{}/{}:generateContent", self.base, model)
        } else {
            format!("{}/models/{}:generateContent", self.base, model)
        }
    }

    /// Performs a single **non-streaming** `generateContent` call.
    ///
    /// Returns the concatenated text of the first candidate's parts, or
    /// `Ok(None)` when the response carries no text (blocked prompt, empty
    /// candidate list, non-text parts only).
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Provider`] with `Decode` if the JSON cannot be parsed
    #[instrument(skip_all, fields(model = %model))]
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        safety: &[SafetySetting],
    ) -> Result<Option<String>, AiLlmError> {
        let started = Instant::now();
        let url = self.url_for(model);
        let body = GenerateContentRequest::from_cfg(&self.cfg, prompt, safety);

        debug!(prompt_len = prompt.len(), "POST {}", url);

        let resp = self.client.post(&url).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "Gemini generateContent returned non-success status"
            );

            return Err(ProviderError::new(
                self.cfg.provider,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: GenerateContentResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode generateContent response"
                );
                return Err(ProviderError::new(
                    self.cfg.provider,
                    ProviderErrorKind::Decode(format!(
                        "serde error: {e}; expected `candidates[0].content.parts[].text`"
                    )),
                )
                .into());
            }
        };

        let text = out.first_text();
        match &text {
            Some(t) => info!(
                text_len = t.len(),
                latency_ms = started.elapsed().as_millis(),
                "generateContent completed"
            ),
            None => warn!(
                block_reason = ?out.block_reason(),
                finish_reason = ?out.finish_reason(),
                latency_ms = started.elapsed().as_millis(),
                "generateContent returned no text parts"
            ),
        }

        Ok(text)
    }
}

impl TextGenerator for GeminiService {
    fn generate<'a>(
        &'a self,
        model: &'a str,
        prompt: &'a str,
        safety: &'a [SafetySetting],
    ) -> GenerateFuture<'a> {
        Box::pin(GeminiService::generate(self, model, prompt, safety))
    }
}

/* ===========================================================================
HTTP payloads & options
======================================================================== */

/// Request body for `:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<ContentIn<'a>>,
    safety_settings: &'a [SafetySetting],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateContentRequest<'a> {
    /// Builds a single-turn user request from config, prompt and safety settings.
    fn from_cfg(cfg: &LlmClientConfig, prompt: &'a str, safety: &'a [SafetySetting]) -> Self {
        let generation = GenerationConfig {
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_output_tokens: cfg.max_tokens,
        };
        let generation_config = (!generation.is_empty()).then_some(generation);

        Self {
            contents: vec![ContentIn {
                role: "user",
                parts: vec![PartIn { text: prompt }],
            }],
            safety_settings: safety,
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct ContentIn<'a> {
    role: &'a str,
    parts: Vec<PartIn<'a>>,
}

#[derive(Debug, Serialize)]
struct PartIn<'a> {
    text: &'a str,
}

/// Subset of `generationConfig`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.max_output_tokens.is_none()
    }
}

/// Minimal response for `:generateContent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<CandidateOut>,
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate; `None` if there are none.
    fn first_text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }

    fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateOut {
    content: Option<ContentOut>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentOut {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Debug, Deserialize)]
struct PartOut {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}
