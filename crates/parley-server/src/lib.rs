//! Parley server library logic.
//!
//! Wires the session stores, the provider clients, and the two
//! orchestration components into an axum router exposing the voice
//! interaction API.

pub mod api;
pub mod api_converse;
pub mod api_speech;
pub mod api_stream;
pub mod background;
pub mod config;
pub mod conversation;
pub mod streaming;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use conversation::Orchestrator;
use parley_session::{SessionStore, TranscriptAccumulator};
use parley_speech::{AudioConverter, SttClient, TtsClient};
use std::sync::Arc;
use streaming::LiveTranscriber;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Maximum request body size (2 MiB) for the JSON endpoints.
const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Body size ceiling for the audio upload endpoints (25 MiB). The
/// transcription client enforces its own tighter cap on the decoded
/// payload.
const MAX_AUDIO_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Conversation histories.
    pub sessions: Arc<SessionStore>,
    /// Live-transcription buffers.
    pub transcripts: Arc<TranscriptAccumulator>,
    /// Conversation orchestrator (classify, generate, record).
    pub orchestrator: Orchestrator,
    /// Chunk pipeline (persist, convert, transcribe, accumulate).
    pub transcriber: LiveTranscriber,
    /// Transcription client, used directly by the one-shot endpoint.
    pub stt: Arc<SttClient>,
    /// Synthesis client.
    pub tts: Arc<TtsClient>,
    /// WebM/Ogg to WAV converter.
    pub converter: Arc<AudioConverter>,
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    // Audio uploads need a larger body limit than the JSON endpoints.
    let audio_routes = Router::new()
        .route("/api/stream/chunk", post(api_stream::stream_chunk_handler))
        .route("/api/transcribe", post(api_speech::transcribe_handler))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BODY_BYTES));

    let router = Router::new()
        .route("/health", get(api::health))
        .route("/api/stream/start", post(api_stream::stream_start_handler))
        .route("/api/stream/status", get(api_stream::stream_status_handler))
        .route("/api/stream/stop", post(api_stream::stream_stop_handler))
        .route("/api/synthesize", post(api_speech::synthesize_handler))
        .route("/api/converse", post(api_converse::converse_handler))
        .route(
            "/api/clear-session",
            post(api_converse::clear_session_handler),
        )
        .merge(audio_routes);

    // Serve the browser UI if the directory exists.
    // Configured via PARLEY_STATIC_DIR env var; defaults to "static".
    let static_dir =
        std::env::var("PARLEY_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
    let router = if std::path::Path::new(&static_dir).join("index.html").exists() {
        tracing::info!(path = %static_dir, "serving static UI files");
        let index = format!("{}/index.html", static_dir);
        router.fallback_service(ServeDir::new(&static_dir).fallback(ServeFile::new(index)))
    } else {
        router.fallback(api::not_found)
    };

    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(CatchPanicLayer::custom(api::handle_panic))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
