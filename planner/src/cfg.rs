//! Runtime configuration loaded once from environment variables.

use ai_llm_service::{
    AiLlmError, LlmClientConfig, config::default_config::config_gemini,
    error_handler::env_opt_string,
};

/// Model identifiers tried in order when `GEMINI_MODELS` is not set.
pub const DEFAULT_CANDIDATES: [&str; 4] = [
    "models/gemini-3-flash-preview",
    "gemini-3-flash-preview",
    "models/gemini-2.0-flash-exp",
    "gemini-2.0-flash-exp",
];

/// Config bag for the planner.
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    /// Gemini client settings (endpoint, key, limits).
    pub llm: LlmClientConfig,
    /// Candidate model identifiers, most preferred first.
    pub candidates: Vec<String>,
}

impl PlannerConfig {
    /// Build from environment variables with defaults.
    ///
    /// - `GEMINI_MODELS`: comma-separated candidate list (blank entries dropped)
    /// - everything else: see [`config_gemini`]
    ///
    /// # Errors
    /// Propagates malformed numeric/URL variables from [`config_gemini`].
    pub fn from_env() -> Result<Self, AiLlmError> {
        Ok(Self {
            llm: config_gemini()?,
            candidates: parse_candidates(env_opt_string("GEMINI_MODELS").as_deref()),
        })
    }

    /// `true` when a non-blank credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.llm
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

/// Splits a comma-separated model list; an empty result yields the defaults.
fn parse_candidates(raw: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if parsed.is_empty() {
        DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect()
    } else {
        parsed
    }
}
