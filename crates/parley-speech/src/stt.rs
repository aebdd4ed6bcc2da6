use crate::config::SttConfig;
use crate::error::SpeechError;
use reqwest::header;
use serde::Deserialize;
use std::time::Duration;

/// Maximum audio input size for transcription (10 MiB). Prevents OOM
/// from oversized payloads.
const MAX_STT_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Timeout for a single recognition request.
const STT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response shape of the Azure Speech short-audio recognition endpoint.
#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    #[serde(rename = "RecognitionStatus")]
    status: String,
    #[serde(rename = "DisplayText", default)]
    display_text: Option<String>,
}

/// Client for the Azure Speech short-audio transcription endpoint.
#[derive(Debug, Clone)]
pub struct SttClient {
    config: SttConfig,
    http: reqwest::Client,
}

impl SttClient {
    pub fn new(config: SttConfig) -> Result<Self, SpeechError> {
        let http = reqwest::Client::builder().timeout(STT_TIMEOUT).build()?;
        Ok(Self { config, http })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Transcribes a WAV payload.
    ///
    /// `Ok(None)` means the provider answered but recognized no speech —
    /// an expected outcome for silent or unintelligible chunks, not an
    /// error. Configuration gaps, transport failures, and non-success
    /// provider statuses are returned as [`SpeechError`]s for the caller
    /// to degrade on.
    pub async fn transcribe(&self, audio: &[u8]) -> Result<Option<String>, SpeechError> {
        if !self.config.is_configured() {
            return Err(SpeechError::NotConfigured("azure speech"));
        }
        if audio.len() > MAX_STT_INPUT_BYTES {
            return Err(SpeechError::AudioTooLarge {
                len: audio.len(),
                limit: MAX_STT_INPUT_BYTES,
            });
        }

        let url = format!(
            "{}/speech/recognition/conversation/cognitiveservices/v1",
            self.config.base_url()
        );
        let response = self
            .http
            .post(&url)
            .query(&[("language", self.config.language.as_str()), ("format", "simple")])
            .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
            .header(
                header::CONTENT_TYPE,
                "audio/wav; codecs=audio/pcm; samplerate=16000",
            )
            .header(header::ACCEPT, "application/json")
            .body(audio.to_vec())
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

        let body = response.text().await?;
        let recognition: RecognitionResponse = serde_json::from_str(&body)
            .map_err(|e| SpeechError::Malformed(format!("{e}: {body}")))?;

        match recognition.status.as_str() {
            "Success" => {
                let text = recognition.display_text.unwrap_or_default();
                let text = text.trim();
                if text.is_empty() {
                    Ok(None)
                } else {
                    tracing::info!(chars = text.len(), "recognized speech");
                    Ok(Some(text.to_string()))
                }
            }
            "NoMatch" => {
                tracing::debug!("no speech could be recognized");
                Ok(None)
            }
            reason => {
                tracing::warn!(reason, "recognition failed");
                Ok(None)
            }
        }
    }
}
