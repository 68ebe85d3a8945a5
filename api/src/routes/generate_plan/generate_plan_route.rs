//! POST /api/generate-plan: builds a study plan via the model fallback chain.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use planner::PlanRequest;
use serde_json::Value;
use tracing::info;

use crate::{app::app_state::AppState, error_handler::AppResult};

/// Handler: POST /api/generate-plan
///
/// The response body is the model's JSON, passed through without schema
/// checks. Failures map to `{"error": "...", "code": "..."}`.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5001/api/generate-plan \
///   -H 'content-type: application/json' \
///   -d '{"topic":"Thermodynamics","hours":"1.5","days":"3","level":"Beginner","goal":"Exam Prep"}'
/// ```
pub async fn generate_plan(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(request) = payload?;
    info!(
        topic = request.topic.as_deref().unwrap_or(""),
        level = request.level.as_deref().unwrap_or(""),
        "generate-plan request"
    );

    let plan = state.planner.generate_plan(&request).await?;
    Ok(Json(plan))
}
