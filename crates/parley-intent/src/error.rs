use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("chat provider not configured: {0}")]
    NotConfigured(&'static str),

    #[error("chat provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat provider returned status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("malformed chat provider response: {0}")]
    Malformed(String),
}
