//! Chunked streaming endpoints simulating live transcription: a client
//! uploads short audio chunks and polls the accumulated transcript.

use crate::api::{session_id_or_default, ApiError};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Extension, Multipart, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Optional-JSON request body carrying only a session id. The original
/// surface tolerated absent or malformed bodies here, so parsing is
/// best-effort and any failure falls back to the default session.
#[derive(Debug, Default, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

fn session_id_from_body(body: &Bytes) -> String {
    let parsed = serde_json::from_slice::<SessionRequest>(body)
        .ok()
        .and_then(|request| request.session_id);
    session_id_or_default(parsed)
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StreamStartResponse {
    pub success: bool,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct StreamChunkResponse {
    pub success: bool,
    pub partial: String,
    pub transcript: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct StreamTranscriptResponse {
    pub success: bool,
    pub transcript: String,
    pub session_id: String,
}

/// Handler for `POST /api/stream/start`.
///
/// Resets the session's transcript buffer. Destructive by contract:
/// starting again loses whatever the previous stream accumulated.
pub async fn stream_start_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Json<StreamStartResponse> {
    let session_id = session_id_from_body(&body);
    state.transcripts.start(&session_id);
    tracing::info!(session_id = %session_id, "streaming session started");
    Json(StreamStartResponse {
        success: true,
        session_id,
    })
}

/// Handler for `POST /api/stream/chunk`.
///
/// Accepts a multipart form with an `audio` file and an optional
/// `session_id` field. Returns `400` when the audio part is missing.
pub async fn stream_chunk_handler(
    Extension(state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<StreamChunkResponse>, ApiError> {
    let mut session_id: Option<String> = None;
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("multipart error: {}", e)))?
    {
        let name = field.name().map(|name| name.to_string());
        match name.as_deref() {
            Some("session_id") => {
                session_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("multipart error: {}", e)))?,
                );
            }
            Some("audio") => {
                audio = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("multipart error: {}", e)))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let audio = audio.ok_or_else(|| ApiError::BadRequest("No audio file provided".to_string()))?;
    let session_id = session_id_or_default(session_id);

    let outcome = state.transcriber.submit_chunk(&session_id, audio).await;

    Ok(Json(StreamChunkResponse {
        success: true,
        partial: outcome.partial,
        transcript: outcome.transcript,
        session_id,
    }))
}

/// Handler for `GET /api/stream/status`.
pub async fn stream_status_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> Json<StreamTranscriptResponse> {
    let session_id = session_id_or_default(query.session_id);
    let transcript = state.transcripts.snapshot(&session_id);
    Json(StreamTranscriptResponse {
        success: true,
        transcript,
        session_id,
    })
}

/// Handler for `POST /api/stream/stop`.
///
/// Returns the final transcript. The buffer is left in place so late
/// readers still see it; TTL pruning reclaims it eventually.
pub async fn stream_stop_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Json<StreamTranscriptResponse> {
    let session_id = session_id_from_body(&body);
    let transcript = state.transcripts.stop(&session_id);
    tracing::info!(session_id = %session_id, chars = transcript.len(), "streaming session stopped");
    Json(StreamTranscriptResponse {
        success: true,
        transcript,
        session_id,
    })
}
