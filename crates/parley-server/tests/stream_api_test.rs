//! Integration tests for the chunked streaming endpoints.
//!
//! The transcription provider is a wiremock server speaking the Azure
//! Speech response shapes; audio payloads carry a WAV header so the
//! conversion step passes them through untouched.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use parley_intent::{IntentClient, IntentConfig};
use parley_server::conversation::Orchestrator;
use parley_server::streaming::LiveTranscriber;
use parley_server::{app, AppState};
use parley_session::{SessionStore, TranscriptAccumulator};
use parley_speech::{AudioConverter, SttClient, SttConfig, TtsClient, TtsConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARY: &str = "parley-test-boundary";

fn test_state(stt_endpoint: Option<String>) -> AppState {
    let sessions = Arc::new(SessionStore::new(None));
    let transcripts = Arc::new(TranscriptAccumulator::new(None));

    let stt_config = match stt_endpoint {
        Some(endpoint) => SttConfig {
            api_key: "test-key".to_string(),
            endpoint: Some(endpoint),
            ..Default::default()
        },
        None => SttConfig::default(),
    };
    let stt = Arc::new(SttClient::new(stt_config).unwrap());
    let tts = Arc::new(TtsClient::new(TtsConfig::default()).unwrap());
    let intent = Arc::new(IntentClient::new(IntentConfig::default()).unwrap());
    let converter = Arc::new(AudioConverter::new("/nonexistent/ffmpeg"));

    AppState {
        sessions: sessions.clone(),
        transcripts: transcripts.clone(),
        orchestrator: Orchestrator::new(sessions, intent),
        transcriber: LiveTranscriber::new(
            stt.clone(),
            converter.clone(),
            transcripts.clone(),
            None,
        ),
        stt,
        tts,
        converter,
    }
}

fn wav_bytes() -> Vec<u8> {
    let mut bytes = b"RIFF".to_vec();
    bytes.extend_from_slice(&[36, 0, 0, 0]);
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(&[0u8; 16]);
    bytes
}

fn chunk_request(uri: &str, session_id: Option<&str>, audio: Option<&[u8]>) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    if let Some(id) = session_id {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"session_id\"\r\n\r\n{id}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(audio) = audio {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"chunk.wav\"\r\nContent-Type: audio/wav\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(audio);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn recognition(text: &str) -> Value {
    json!({"RecognitionStatus": "Success", "DisplayText": text})
}

#[tokio::test]
async fn chunks_accumulate_into_the_session_transcript() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recognition("hello")))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recognition("world")))
        .mount(&mock_server)
        .await;

    let app = app(test_state(Some(mock_server.uri())));

    let response = app
        .clone()
        .oneshot(json_request("/api/stream/start", json!({"session_id": "s1"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["session_id"], "s1");

    let response = app
        .clone()
        .oneshot(chunk_request("/api/stream/chunk", Some("s1"), Some(&wav_bytes())))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["partial"], "hello");
    assert_eq!(body["transcript"], "hello");

    let response = app
        .clone()
        .oneshot(chunk_request("/api/stream/chunk", Some("s1"), Some(&wav_bytes())))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["partial"], "world");
    assert_eq!(body["transcript"], "hello world");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/stream/status?session_id=s1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["transcript"], "hello world");

    // Stop returns the final transcript without clearing it.
    let response = app
        .clone()
        .oneshot(json_request("/api/stream/stop", json!({"session_id": "s1"})))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["transcript"], "hello world");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stream/status?session_id=s1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["transcript"], "hello world");
}

#[tokio::test]
async fn chunk_without_audio_is_rejected() {
    let app = app(test_state(None));

    let response = app
        .oneshot(chunk_request("/api/stream/chunk", Some("s1"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "No audio file provided");
}

#[tokio::test]
async fn silent_chunk_leaves_the_transcript_unchanged() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recognition("hello")))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"RecognitionStatus": "NoMatch"})),
        )
        .mount(&mock_server)
        .await;

    let app = app(test_state(Some(mock_server.uri())));

    let response = app
        .clone()
        .oneshot(chunk_request("/api/stream/chunk", Some("s1"), Some(&wav_bytes())))
        .await
        .unwrap();
    assert_eq!(response_json(response).await["transcript"], "hello");

    let response = app
        .oneshot(chunk_request("/api/stream/chunk", Some("s1"), Some(&wav_bytes())))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["partial"], "");
    assert_eq!(body["transcript"], "hello");
}

#[tokio::test]
async fn provider_failure_is_silent_for_streaming_chunks() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let app = app(test_state(Some(mock_server.uri())));

    let response = app
        .oneshot(chunk_request("/api/stream/chunk", Some("s1"), Some(&wav_bytes())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["partial"], "");
    assert_eq!(body["transcript"], "");
}

#[tokio::test]
async fn status_for_an_unknown_session_is_empty() {
    let app = app(test_state(None));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stream/status?session_id=ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["transcript"], "");
}

#[tokio::test]
async fn start_resets_a_previous_transcript() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recognition("stale words")))
        .mount(&mock_server)
        .await;

    let app = app(test_state(Some(mock_server.uri())));

    let response = app
        .clone()
        .oneshot(chunk_request("/api/stream/chunk", Some("s1"), Some(&wav_bytes())))
        .await
        .unwrap();
    assert_eq!(response_json(response).await["transcript"], "stale words");

    app.clone()
        .oneshot(json_request("/api/stream/start", json!({"session_id": "s1"})))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stream/status?session_id=s1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response_json(response).await["transcript"], "");
}

#[tokio::test]
async fn chunks_are_persisted_for_debugging_when_a_directory_is_configured() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recognition("hello")))
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let transcripts = Arc::new(TranscriptAccumulator::new(None));
    let stt = Arc::new(
        SttClient::new(SttConfig {
            api_key: "test-key".to_string(),
            endpoint: Some(mock_server.uri()),
            ..Default::default()
        })
        .unwrap(),
    );
    let transcriber = LiveTranscriber::new(
        stt,
        Arc::new(AudioConverter::new("/nonexistent/ffmpeg")),
        transcripts,
        Some(temp_dir.path().to_path_buf()),
    );

    let outcome = transcriber.submit_chunk("caller-7", wav_bytes()).await;
    assert_eq!(outcome.partial, "hello");

    let session_dir = temp_dir.path().join("caller-7");
    let persisted: Vec<_> = std::fs::read_dir(&session_dir).unwrap().collect();
    assert_eq!(persisted.len(), 1);
    let name = persisted[0].as_ref().unwrap().file_name();
    assert!(name.to_string_lossy().ends_with(".wav"));
    assert_eq!(
        std::fs::read(session_dir.join(name)).unwrap(),
        wav_bytes()
    );
}

#[tokio::test]
async fn absent_body_falls_back_to_the_default_session() {
    let app = app(test_state(None));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/stream/start")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["session_id"], "default");
}
