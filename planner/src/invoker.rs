//! Ordered model fallback + reply extraction.

use std::sync::Arc;

use ai_llm_service::{
    AiLlmError, SafetySetting, TextGenerator, config::safety::BLOCK_NONE_ALL,
    error_handler::make_snippet,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{error::PlannerError, extract::extract_json_block};

/// Outcome of one candidate.
#[derive(Debug)]
pub enum GenerationAttempt {
    /// Reply text from at least one content part, possibly empty.
    Text(String),
    /// The provider answered without any text part.
    Empty,
    /// The call failed.
    Failed(AiLlmError),
}

/// Walks model candidates in order and turns the first reply into JSON.
///
/// Holds only immutable data, so one instance is shared by all requests.
pub struct ModelInvoker {
    /// `None` when no API key is configured.
    generator: Option<Arc<dyn TextGenerator>>,
    safety: Vec<SafetySetting>,
}

impl ModelInvoker {
    /// Creates an invoker that sends [`BLOCK_NONE_ALL`] with every call.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            safety: BLOCK_NONE_ALL.to_vec(),
        }
    }

    /// Generates with the first candidate that yields text, then parses it.
    ///
    /// Candidates are tried strictly sequentially with no delay; after the
    /// first success the rest are skipped. Per-candidate failures are logged
    /// and swallowed.
    ///
    /// # Errors
    /// - [`PlannerError::MissingApiKey`] before any call if no generator is configured
    /// - [`PlannerError::AllModelsFailed`] with the last recorded candidate error
    /// - [`PlannerError::Extraction`] / [`PlannerError::ResponseParse`] if the reply is not JSON
    pub async fn invoke(&self, prompt: &str, candidates: &[String]) -> Result<Value, PlannerError> {
        let generator = self
            .generator
            .as_deref()
            .ok_or(PlannerError::MissingApiKey)?;

        let raw = self.first_reply(generator, prompt, candidates).await?;
        parse_reply(raw)
    }

    /// Runs one candidate and classifies the outcome.
    pub async fn attempt(
        &self,
        generator: &dyn TextGenerator,
        model: &str,
        prompt: &str,
    ) -> GenerationAttempt {
        match generator.generate(model, prompt, &self.safety).await {
            Ok(Some(text)) => GenerationAttempt::Text(text),
            Ok(None) => GenerationAttempt::Empty,
            Err(e) => GenerationAttempt::Failed(e),
        }
    }

    async fn first_reply(
        &self,
        generator: &dyn TextGenerator,
        prompt: &str,
        candidates: &[String],
    ) -> Result<String, PlannerError> {
        let mut last_error: Option<AiLlmError> = None;

        for (idx, model) in candidates.iter().enumerate() {
            info!(model = %model, attempt = idx + 1, total = candidates.len(), "trying model");

            match self.attempt(generator, model, prompt).await {
                GenerationAttempt::Text(text) => {
                    info!(model = %model, text_len = text.len(), "model succeeded");
                    return Ok(text);
                }
                GenerationAttempt::Empty => {
                    warn!(model = %model, "model returned no content; trying next");
                }
                GenerationAttempt::Failed(e) => {
                    warn!(model = %model, error = %e, "model failed; trying next");
                    last_error = Some(e);
                }
            }
        }

        let last_error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        error!(attempts = candidates.len(), %last_error, "all models failed");

        Err(PlannerError::AllModelsFailed {
            last_error,
            attempts: candidates.len(),
        })
    }
}

/// Extracts the JSON block from `raw` and parses it without schema checks.
fn parse_reply(raw: String) -> Result<Value, PlannerError> {
    match extract_json_block(&raw).map(serde_json::from_str::<Value>) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => {
            error!(error = %source, raw = %make_snippet(&raw), "model reply is not valid JSON");
            Err(PlannerError::ResponseParse { raw, source })
        }
        Err(source) => {
            error!(error = %source, raw = %make_snippet(&raw), "could not isolate JSON block");
            Err(PlannerError::Extraction { raw, source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use ai_llm_service::{
        GenerateFuture, LlmProvider,
        error_handler::{ProviderError, ProviderErrorKind},
    };
    use serde_json::json;

    use crate::error::ExtractionError;

    enum Reply {
        Text(&'static str),
        Empty,
        Fail,
    }

    /// Replies per model and records every call.
    struct Scripted {
        replies: HashMap<&'static str, Reply>,
        calls: Mutex<Vec<String>>,
        safety_seen: Mutex<Vec<usize>>,
    }

    impl Scripted {
        fn new(replies: Vec<(&'static str, Reply)>) -> Arc<Self> {
            Arc::new(Self {
                replies: replies.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
                safety_seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TextGenerator for Scripted {
        fn generate<'a>(
            &'a self,
            model: &'a str,
            _prompt: &'a str,
            safety: &'a [SafetySetting],
        ) -> GenerateFuture<'a> {
            self.calls.lock().unwrap().push(model.to_string());
            self.safety_seen.lock().unwrap().push(safety.len());
            let out = match self.replies.get(model) {
                Some(Reply::Text(t)) => Ok(Some(t.to_string())),
                Some(Reply::Empty) => Ok(None),
                Some(Reply::Fail) | None => Err(ProviderError::new(
                    LlmProvider::Gemini,
                    ProviderErrorKind::Decode(format!("{model} unavailable")),
                )
                .into()),
            };
            Box::pin(async move { out })
        }
    }

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn invoker(g: &Arc<Scripted>) -> ModelInvoker {
        ModelInvoker::new(Some(g.clone() as Arc<dyn TextGenerator>))
    }

    #[tokio::test]
    async fn falls_back_until_first_success_and_stops() {
        let g = Scripted::new(vec![
            ("A", Reply::Fail),
            ("B", Reply::Fail),
            ("C", Reply::Text("```json\n{\"plan\":[]}\n```")),
            ("D", Reply::Text("{\"never\":true}")),
        ]);
        let out = invoker(&g)
            .invoke("p", &models(&["A", "B", "C", "D"]))
            .await
            .unwrap();

        assert_eq!(out, json!({ "plan": [] }));
        assert_eq!(g.calls(), models(&["A", "B", "C"]));
        assert!(g.safety_seen.lock().unwrap().iter().all(|n| *n == 4));
    }

    #[tokio::test]
    async fn all_failed_reports_last_error() {
        let g = Scripted::new(vec![("A", Reply::Fail), ("B", Reply::Fail), ("C", Reply::Fail)]);
        let err = invoker(&g)
            .invoke("p", &models(&["A", "B", "C"]))
            .await
            .unwrap_err();

        match &err {
            PlannerError::AllModelsFailed {
                last_error,
                attempts,
            } => {
                assert!(last_error.contains("C unavailable"));
                assert!(!last_error.contains("A unavailable"));
                assert_eq!(*attempts, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("All models failed. Last error: "));
        assert_eq!(g.calls().len(), 3);
    }

    #[tokio::test]
    async fn empty_reply_does_not_replace_last_error() {
        let g = Scripted::new(vec![("A", Reply::Fail), ("B", Reply::Empty)]);
        let err = invoker(&g).invoke("p", &models(&["A", "B"])).await.unwrap_err();
        assert!(err.to_string().contains("A unavailable"));
    }

    #[tokio::test]
    async fn only_empty_replies_report_unknown_error() {
        let g = Scripted::new(vec![("A", Reply::Empty), ("B", Reply::Empty)]);
        let err = invoker(&g).invoke("p", &models(&["A", "B"])).await.unwrap_err();
        assert_eq!(err.to_string(), "All models failed. Last error: Unknown error");
        assert_eq!(g.calls(), models(&["A", "B"]));
    }

    #[tokio::test]
    async fn empty_text_part_stops_the_loop_and_fails_parsing() {
        let g = Scripted::new(vec![("A", Reply::Text("")), ("B", Reply::Text("{}"))]);
        let err = invoker(&g).invoke("p", &models(&["A", "B"])).await.unwrap_err();

        assert!(matches!(err, PlannerError::ResponseParse { .. }));
        assert_eq!(err.raw_text(), Some(""));
        assert_eq!(g.calls(), models(&["A"]));
    }

    #[tokio::test]
    async fn no_candidates_is_an_aggregate_failure() {
        let g = Scripted::new(vec![]);
        let err = invoker(&g).invoke("p", &[]).await.unwrap_err();
        assert!(matches!(err, PlannerError::AllModelsFailed { attempts: 0, .. }));
        assert!(g.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_call() {
        let err = ModelInvoker::new(None)
            .invoke("p", &models(&["A"]))
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::MissingApiKey));
        assert_eq!(err.to_string(), "Server missing API Key.");
    }

    #[tokio::test]
    async fn unfenced_and_unlabeled_replies_parse() {
        let g = Scripted::new(vec![
            ("raw", Reply::Text("{\"plan\":[],\"focus_areas\":[]}")),
            ("plain", Reply::Text("```\n{\"x\":1}\n```")),
        ]);
        let inv = invoker(&g);
        assert_eq!(
            inv.invoke("p", &models(&["raw"])).await.unwrap(),
            json!({ "plan": [], "focus_areas": [] })
        );
        assert_eq!(inv.invoke("p", &models(&["plain"])).await.unwrap(), json!({ "x": 1 }));
    }

    #[tokio::test]
    async fn invalid_json_keeps_raw_text() {
        let raw = "Sure! Here is your plan: day one, read chapter 1.";
        let g = Scripted::new(vec![("A", Reply::Text(raw)), ("B", Reply::Text("{}"))]);
        let err = invoker(&g).invoke("p", &models(&["A", "B"])).await.unwrap_err();

        assert!(matches!(err, PlannerError::ResponseParse { .. }));
        assert_eq!(err.raw_text(), Some(raw));
        assert_eq!(g.calls(), models(&["A"]));
    }

    #[tokio::test]
    async fn empty_fence_is_an_extraction_error() {
        let g = Scripted::new(vec![("A", Reply::Text("```json\n\n```"))]);
        let err = invoker(&g).invoke("p", &models(&["A"])).await.unwrap_err();
        match err {
            PlannerError::Extraction { raw, source } => {
                assert_eq!(raw, "```json\n\n```");
                assert_eq!(source, ExtractionError::EmptyBlock { fence: "```json" });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
