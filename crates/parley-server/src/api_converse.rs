//! Conversational turn and session management endpoints.

use crate::api::{session_id_or_default, ApiError};
use crate::conversation::TurnError;
use crate::AppState;
use axum::{body::Bytes, extract::Extension, Json};
use parley_types::Intent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ConverseRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConverseResponse {
    pub success: bool,
    pub intent: Intent,
    pub confidence: f32,
    pub reasoning: String,
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct ClearSessionResponse {
    pub success: bool,
    pub message: String,
}

/// Handler for `POST /api/converse`.
///
/// Runs one conversational turn. Provider trouble degrades inside the
/// orchestrator; the only client error is an empty message.
pub async fn converse_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<ConverseRequest>,
) -> Result<Json<ConverseResponse>, ApiError> {
    let session_id = session_id_or_default(request.session_id);

    let outcome = state
        .orchestrator
        .handle_turn(&session_id, &request.message)
        .await
        .map_err(|e| match e {
            TurnError::EmptyMessage => ApiError::BadRequest("No message provided".to_string()),
        })?;

    Ok(Json(ConverseResponse {
        success: true,
        intent: outcome.classification.intent,
        confidence: outcome.classification.confidence,
        reasoning: outcome.classification.reasoning,
        response: outcome.response,
    }))
}

/// Optional-JSON body for `POST /api/clear-session`; parsing is
/// best-effort like the stream start/stop endpoints.
#[derive(Debug, Default, Deserialize)]
struct ClearSessionRequest {
    #[serde(default)]
    session_id: Option<String>,
}

/// Handler for `POST /api/clear-session`.
pub async fn clear_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Json<ClearSessionResponse> {
    let parsed = serde_json::from_slice::<ClearSessionRequest>(&body)
        .ok()
        .and_then(|request| request.session_id);
    let session_id = session_id_or_default(parsed);

    state.sessions.clear(&session_id);
    tracing::info!(session_id = %session_id, "conversation session cleared");

    Json(ClearSessionResponse {
        success: true,
        message: "Session cleared".to_string(),
    })
}
