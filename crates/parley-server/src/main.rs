//! Parley server binary — the voice interaction backend entry point.
//!
//! Starts an axum HTTP server with structured logging, provider client
//! construction, a session pruning task, and graceful shutdown on
//! SIGTERM/SIGINT.

use parley_server::conversation::Orchestrator;
use parley_server::streaming::LiveTranscriber;
use parley_server::{app, background, config, AppState};
use parley_session::{SessionStore, TranscriptAccumulator};
use parley_speech::{AudioConverter, SttClient, TtsClient};
use parley_intent::IntentClient;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("PARLEY_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    // Load configuration
    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the server cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    let missing = config.missing_providers();
    if missing.is_empty() {
        tracing::info!("all providers configured");
    } else {
        tracing::warn!(
            providers = missing.join(", "),
            "configuration incomplete — affected operations will degrade"
        );
    }

    // Build provider clients and session state
    let sessions = Arc::new(SessionStore::new(config.session.ttl()));
    let transcripts = Arc::new(TranscriptAccumulator::new(config.session.ttl()));
    let stt = Arc::new(
        SttClient::new(config.stt.clone()).expect("failed to build transcription client"),
    );
    let tts =
        Arc::new(TtsClient::new(config.tts.clone()).expect("failed to build synthesis client"));
    let intent =
        Arc::new(IntentClient::new(config.intent.clone()).expect("failed to build chat client"));
    let converter = Arc::new(AudioConverter::new(&config.streaming.ffmpeg_path));

    let state = AppState {
        sessions: sessions.clone(),
        transcripts: transcripts.clone(),
        orchestrator: Orchestrator::new(sessions.clone(), intent),
        transcriber: LiveTranscriber::new(
            stt.clone(),
            converter.clone(),
            transcripts.clone(),
            config.streaming.chunk_dir.as_ref().map(PathBuf::from),
        ),
        stt,
        tts,
        converter,
    };

    // Evict idle session state in the background
    if config.session.ttl().is_some() {
        tokio::spawn(background::start_pruning_task(
            sessions,
            transcripts,
            config.session.sweep_interval_seconds,
        ));
    } else {
        tracing::warn!("session TTL disabled; state grows until cleared or restart");
    }

    // Build application
    let app = app(state);
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting parley server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address — is another process using this port?");

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("parley server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
