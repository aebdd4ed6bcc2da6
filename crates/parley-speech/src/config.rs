use serde::Deserialize;
use std::fmt;

/// ElevenLabs voice used when none is configured.
pub const DEFAULT_TTS_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// ElevenLabs model used for synthesis.
pub const DEFAULT_TTS_MODEL_ID: &str = "eleven_turbo_v2_5";

fn default_language() -> String {
    "en-US".to_string()
}

fn default_tts_voice_id() -> String {
    DEFAULT_TTS_VOICE_ID.to_string()
}

fn default_tts_model_id() -> String {
    DEFAULT_TTS_MODEL_ID.to_string()
}

fn default_tts_endpoint() -> String {
    "https://api.elevenlabs.io".to_string()
}

/// Azure Speech transcription settings.
#[derive(Clone, Deserialize)]
pub struct SttConfig {
    /// Subscription key. Empty means the provider is unconfigured.
    #[serde(default)]
    pub api_key: String,

    /// Azure region (e.g. "eastus") the endpoint is derived from.
    #[serde(default)]
    pub region: String,

    /// Recognition language.
    #[serde(default = "default_language")]
    pub language: String,

    /// Full endpoint base overriding the region-derived one. Used for
    /// sovereign clouds and for pointing tests at a mock server.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            region: String::new(),
            language: default_language(),
            endpoint: None,
        }
    }
}

impl fmt::Debug for SttConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SttConfig")
            .field("api_key", &"[REDACTED]")
            .field("region", &self.region)
            .field("language", &self.language)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl SttConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && (!self.region.is_empty() || self.endpoint.is_some())
    }

    /// Endpoint base without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.stt.speech.microsoft.com", self.region),
        }
    }
}

/// ElevenLabs synthesis settings.
#[derive(Clone, Deserialize)]
pub struct TtsConfig {
    /// API key. Empty means the provider is unconfigured.
    #[serde(default)]
    pub api_key: String,

    /// Voice to synthesize with.
    #[serde(default = "default_tts_voice_id")]
    pub voice_id: String,

    /// Synthesis model.
    #[serde(default = "default_tts_model_id")]
    pub model_id: String,

    /// Endpoint base. Overridable for tests.
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            voice_id: default_tts_voice_id(),
            model_id: default_tts_model_id(),
            endpoint: default_tts_endpoint(),
        }
    }
}

impl fmt::Debug for TtsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtsConfig")
            .field("api_key", &"[REDACTED]")
            .field("voice_id", &self.voice_id)
            .field("model_id", &self.model_id)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl TtsConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Endpoint base without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}
