//! One-shot transcription and synthesis endpoints.

use crate::api::ApiError;
use crate::AppState;
use axum::{
    extract::{Extension, Multipart},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub success: bool,
    pub transcript: String,
}

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub text: String,
}

/// Handler for `POST /api/transcribe`.
///
/// Transcribes a whole uploaded recording in one call. Unlike the
/// streaming chunk path, a recognition miss here is an error response:
/// the client asked for this specific audio to be transcribed.
pub async fn transcribe_handler(
    Extension(state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("multipart error: {}", e)))?
    {
        if field.name() == Some("audio") {
            audio = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("multipart error: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let audio = audio.ok_or_else(|| ApiError::BadRequest("No audio file provided".to_string()))?;
    let audio = state.converter.ensure_wav(audio).await;

    match state.stt.transcribe(&audio).await {
        Ok(Some(transcript)) => Ok(Json(TranscribeResponse {
            success: true,
            transcript,
        })),
        Ok(None) => Err(ApiError::InternalServerError(
            "Could not transcribe audio".to_string(),
        )),
        Err(e) => {
            tracing::error!(error = %e, "transcription failed");
            Err(ApiError::InternalServerError(
                "Could not transcribe audio".to_string(),
            ))
        }
    }
}

/// Handler for `POST /api/synthesize`.
///
/// Returns raw MPEG audio for the given text, or `400`/`500` JSON
/// errors — synthesis has no conversational fallback to degrade to.
pub async fn synthesize_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Response, ApiError> {
    if request.text.is_empty() {
        return Err(ApiError::BadRequest("No text provided".to_string()));
    }

    match state.tts.synthesize(&request.text).await {
        Ok(audio) => Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response()),
        Err(e) => {
            tracing::error!(error = %e, "synthesis failed");
            Err(ApiError::InternalServerError(
                "Could not synthesize speech".to_string(),
            ))
        }
    }
}
