//! Typed errors for the planner crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Why the fenced block could not be isolated from the model reply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// A fence was found but nothing but whitespace sits inside it.
    #[error("model reply contains an empty `{fence}` block")]
    EmptyBlock { fence: &'static str },
}

/// Fatal outcomes of one plan request.
///
/// Display strings are the exact texts returned to HTTP callers.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// No credential configured; raised before any model is called.
    #[error("Server missing API Key.")]
    MissingApiKey,

    /// Every candidate failed or returned no text.
    #[error("All models failed. Last error: {last_error}")]
    AllModelsFailed {
        /// Display text of the last recorded candidate error.
        last_error: String,
        /// Number of candidates attempted.
        attempts: usize,
    },

    /// Fence delimiters did not yield a usable block.
    #[error("{source}")]
    Extraction {
        raw: String,
        #[source]
        source: ExtractionError,
    },

    /// The extracted text is not valid JSON.
    #[error("{source}")]
    ResponseParse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Gemini client could not be configured.
    #[error(transparent)]
    Llm(#[from] AiLlmError),
}

impl PlannerError {
    /// Raw model text for extraction/parse failures.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            PlannerError::Extraction { raw, .. } | PlannerError::ResponseParse { raw, .. } => {
                Some(raw)
            }
            _ => None,
        }
    }
}
