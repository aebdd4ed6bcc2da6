//! Per-chunk live transcription: convert, recognize, accumulate.

use parley_session::TranscriptAccumulator;
use parley_speech::{AudioConverter, SttClient};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of one chunk submission.
#[derive(Debug, Clone)]
pub struct ChunkOutcome {
    /// Text recognized from this chunk alone; empty when nothing was
    /// recognized.
    pub partial: String,
    /// The session's full transcript after this chunk.
    pub transcript: String,
}

/// Feeds audio chunks through the recognizer and into the per-session
/// transcript buffers.
#[derive(Clone)]
pub struct LiveTranscriber {
    stt: Arc<SttClient>,
    converter: Arc<AudioConverter>,
    transcripts: Arc<TranscriptAccumulator>,
    /// When set, every incoming chunk is also written here for
    /// debugging, best-effort.
    chunk_dir: Option<PathBuf>,
}

impl LiveTranscriber {
    pub fn new(
        stt: Arc<SttClient>,
        converter: Arc<AudioConverter>,
        transcripts: Arc<TranscriptAccumulator>,
        chunk_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            stt,
            converter,
            transcripts,
            chunk_dir,
        }
    }

    /// Transcribes one chunk and appends any recognized text to the
    /// session's buffer.
    ///
    /// Recognition misses are expected and silent: the buffer stays
    /// unchanged and `partial` comes back empty. Provider errors are
    /// logged and treated the same way — a live stream must keep
    /// accepting chunks through provider hiccups.
    pub async fn submit_chunk(&self, session_id: &str, audio: Vec<u8>) -> ChunkOutcome {
        if let Some(dir) = &self.chunk_dir {
            persist_chunk(dir, session_id, &audio).await;
        }

        let audio = self.converter.ensure_wav(audio).await;

        let partial = match self.stt.transcribe(&audio).await {
            Ok(Some(text)) => text,
            Ok(None) => String::new(),
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "chunk transcription unavailable");
                String::new()
            }
        };

        let transcript = if partial.is_empty() {
            self.transcripts.snapshot(session_id)
        } else {
            self.transcripts.append(session_id, &partial)
        };

        ChunkOutcome {
            partial,
            transcript,
        }
    }
}

/// Writes the chunk under `<dir>/<session>/<utc timestamp>.wav`.
/// Failures only warn: debug persistence must never fail a request.
async fn persist_chunk(dir: &Path, session_id: &str, audio: &[u8]) {
    let session_dir = dir.join(sanitize_session_dir(session_id));
    if let Err(e) = tokio::fs::create_dir_all(&session_dir).await {
        tracing::warn!(error = %e, "failed to create chunk directory");
        return;
    }
    let name = format!("{}.wav", chrono::Utc::now().format("%Y%m%dT%H%M%S%6f"));
    if let Err(e) = tokio::fs::write(session_dir.join(name), audio).await {
        tracing::warn!(error = %e, "failed to persist audio chunk");
    }
}

/// Session ids are client-supplied opaque strings; squash anything that
/// could escape the chunk directory before using one as a path segment.
fn sanitize_session_dir(session_id: &str) -> String {
    let cleaned: String = session_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}
