use crate::config::TtsConfig;
use crate::error::SpeechError;
use serde_json::json;
use std::time::Duration;

/// Maximum text input size for synthesis (64 KiB). Prevents resource
/// exhaustion from oversized synthesis requests.
const MAX_TTS_INPUT_BYTES: usize = 64 * 1024;

/// Timeout for a single synthesis request.
const TTS_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the ElevenLabs text-to-speech endpoint.
#[derive(Debug, Clone)]
pub struct TtsClient {
    config: TtsConfig,
    http: reqwest::Client,
}

impl TtsClient {
    pub fn new(config: TtsConfig) -> Result<Self, SpeechError> {
        let http = reqwest::Client::builder().timeout(TTS_TIMEOUT).build()?;
        Ok(Self { config, http })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Synthesizes speech from text, returning MPEG audio bytes.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if !self.config.is_configured() {
            return Err(SpeechError::NotConfigured("elevenlabs"));
        }
        if text.len() > MAX_TTS_INPUT_BYTES {
            return Err(SpeechError::TextTooLarge {
                len: text.len(),
                limit: MAX_TTS_INPUT_BYTES,
            });
        }

        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url(),
            self.config.voice_id
        );
        let response = self
            .http
            .post(&url)
            .header("xi-api-key", &self.config.api_key)
            .json(&json!({
                "text": text,
                "model_id": self.config.model_id,
                "voice_settings": {
                    "stability": 0.5,
                    "similarity_boost": 0.5,
                },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?;
        tracing::info!(bytes = audio.len(), "synthesized speech");
        Ok(audio.to_vec())
    }
}
