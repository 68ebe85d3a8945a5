//! Study-plan pipeline with a single entry point.
//!
//! Public API: [`Planner::generate_plan`]. It renders the instruction prompt
//! from a [`PlanRequest`], walks the configured model candidates in order
//! until one returns text, isolates the JSON block from the reply and
//! returns the parsed value untouched.

mod cfg;
mod error;
mod extract;
mod invoker;
mod prompt;
mod request;

pub use cfg::{DEFAULT_CANDIDATES, PlannerConfig};
pub use error::{ExtractionError, PlannerError};
pub use extract::extract_json_block;
pub use invoker::{GenerationAttempt, ModelInvoker};
pub use prompt::{DEFAULT_DAILY_MINUTES, DEFAULT_TOTAL_DAYS, build_prompt};
pub use request::{FlexValue, PlanRequest};

use std::sync::Arc;

use ai_llm_service::{GeminiService, TextGenerator};
use serde_json::Value;
use tracing::{info, warn};

/// Prompt builder + model invoker bound to one configuration.
///
/// Built once at startup and shared (`Arc`) across requests; holds no
/// mutable state.
pub struct Planner {
    invoker: ModelInvoker,
    candidates: Vec<String>,
}

impl Planner {
    /// Builds the planner from startup config.
    ///
    /// A missing API key is not an error here: the invoker is created
    /// without a generator and every plan request fails with
    /// [`PlannerError::MissingApiKey`].
    ///
    /// # Errors
    /// Returns [`PlannerError::Llm`] if the Gemini client cannot be built.
    pub fn from_config(cfg: &PlannerConfig) -> Result<Self, PlannerError> {
        let generator: Option<Arc<dyn TextGenerator>> = if cfg.has_api_key() {
            Some(Arc::new(GeminiService::new(cfg.llm.clone())?))
        } else {
            warn!("GEMINI_API_KEY is not set; plan requests will fail until it is provided");
            None
        };

        info!(candidates = ?cfg.candidates, "planner ready");
        Ok(Self::new(ModelInvoker::new(generator), cfg.candidates.clone()))
    }

    /// Assembles a planner from parts (used by tests and custom generators).
    pub fn new(invoker: ModelInvoker, candidates: Vec<String>) -> Self {
        Self {
            invoker,
            candidates,
        }
    }

    /// Candidate model identifiers, most preferred first.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Runs the whole pipeline for one request.
    ///
    /// # Errors
    /// See [`ModelInvoker::invoke`].
    pub async fn generate_plan(&self, request: &PlanRequest) -> Result<Value, PlannerError> {
        let prompt = build_prompt(request);
        self.invoker.invoke(&prompt, &self.candidates).await
    }
}
