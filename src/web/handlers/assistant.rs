//! # Assistant Handler

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::services::AssistantReply;
use crate::web::errors::ApiResult;
use crate::web::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantRequest {
    pub prompt: String,
}

/// Relay a prompt to the assistant: POST /api/assistant/
pub async fn ask_assistant(
    State(state): State<AppState>,
    payload: Result<Json<AssistantRequest>, JsonRejection>,
) -> ApiResult<Json<AssistantReply>> {
    let Json(request) = payload?;
    Ok(Json(state.assistant.ask(&request.prompt).await?))
}
