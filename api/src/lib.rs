//! HTTP surface of the study-plan backend.
//!
//! - `GET /`: liveness text
//! - `POST /api/generate-plan`: study plan JSON from the model fallback chain

use std::sync::Arc;

pub mod app;
mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

pub use crate::app::app_state::{AppConfig, AppState, ServerConfig};
pub use crate::error_handler::{AppError, AppResult};

use crate::routes::{generate_plan::generate_plan_route::generate_plan, home_route::home};

/// Builds the router with permissive CORS (the browser client is served
/// from a different origin).
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/api/generate-plan", post(generate_plan))
        .layer(cors)
        .with_state(state)
}

/// Binds `server` and serves until Ctrl+C.
pub async fn start(server: ServerConfig, state: Arc<AppState>) -> AppResult<()> {
    let addr = server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;

    info!(%addr, "study-plan backend listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ai_llm_service::{
        GenerateFuture, LlmProvider, SafetySetting, TextGenerator,
        error_handler::{ProviderError, ProviderErrorKind},
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use planner::{ModelInvoker, Planner};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Returns a fixed reply for every model, or fails every call.
    struct Fixed(Option<&'static str>);

    impl TextGenerator for Fixed {
        fn generate<'a>(
            &'a self,
            model: &'a str,
            _prompt: &'a str,
            _safety: &'a [SafetySetting],
        ) -> GenerateFuture<'a> {
            let out = match self.0 {
                Some(text) => Ok(Some(text.to_string())),
                None => Err(ProviderError::new(
                    LlmProvider::Gemini,
                    ProviderErrorKind::Decode(format!("{model} quota exceeded")),
                )
                .into()),
            };
            Box::pin(async move { out })
        }
    }

    fn app(generator: Option<Fixed>) -> Router {
        let generator = generator.map(|g| Arc::new(g) as Arc<dyn TextGenerator>);
        let planner = Planner::new(
            ModelInvoker::new(generator),
            vec!["model-a".into(), "model-b".into()],
        );
        router(Arc::new(AppState::new(planner)))
    }

    fn plan_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate-plan")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn home_reports_liveness() {
        let resp = app(None)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            &bytes[..],
            b"Backend is running! Use /api/generate-plan for requests."
        );
    }

    #[tokio::test]
    async fn missing_key_is_500_with_fixed_message() {
        let resp = app(None)
            .oneshot(plan_request(r#"{"topic":"Rust"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(resp).await,
            json!({ "error": "Server missing API Key.", "code": "MISSING_API_KEY" })
        );
    }

    #[tokio::test]
    async fn model_json_is_passed_through() {
        let reply = "```json\n{\"plan\":[{\"unit_title\":\"Day 1\"}],\"focus_areas\":[],\"extra\":1}\n```";
        let resp = app(Some(Fixed(Some(reply))))
            .oneshot(plan_request(r#"{"topic":"Rust","hours":"1.5","days":""}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await,
            json!({ "plan": [{ "unit_title": "Day 1" }], "focus_areas": [], "extra": 1 })
        );
    }

    #[tokio::test]
    async fn all_models_failed_is_500_with_last_error() {
        let resp = app(Some(Fixed(None)))
            .oneshot(plan_request("{}"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(resp).await;
        assert_eq!(body["code"], "ALL_MODELS_FAILED");
        let msg = body["error"].as_str().unwrap();
        assert!(msg.starts_with("All models failed. Last error: "));
        assert!(msg.contains("model-b quota exceeded"));
    }

    #[tokio::test]
    async fn unparseable_reply_is_500() {
        let resp = app(Some(Fixed(Some("I cannot produce JSON today."))))
            .oneshot(plan_request("{}"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(resp).await;
        assert_eq!(body["code"], "RESPONSE_PARSE_ERROR");
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let resp = app(None)
            .oneshot(plan_request("{not json"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_origin() {
        let resp = app(None)
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/generate-plan")
                    .header(header::ORIGIN, "http://localhost:5500")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
