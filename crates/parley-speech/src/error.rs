use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech provider not configured: {0}")]
    NotConfigured(&'static str),

    #[error("speech provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("speech provider returned status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("unexpected speech provider response: {0}")]
    Malformed(String),

    #[error("audio data exceeds maximum size: {len} bytes (limit: {limit} bytes)")]
    AudioTooLarge { len: usize, limit: usize },

    #[error("text exceeds maximum size: {len} bytes (limit: {limit} bytes)")]
    TextTooLarge { len: usize, limit: usize },

    #[error("audio conversion failed: {0}")]
    Convert(String),
}
