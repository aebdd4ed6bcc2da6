//! Server configuration loading from file and environment variables.

use parley_intent::IntentConfig;
use parley_speech::{SttConfig, TtsConfig};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Session state retention settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Audio streaming settings.
    #[serde(default)]
    pub streaming: StreamingConfig,

    /// Azure Speech transcription provider.
    #[serde(default)]
    pub stt: SttConfig,

    /// ElevenLabs synthesis provider.
    #[serde(default)]
    pub tts: TtsConfig,

    /// Azure OpenAI chat provider.
    #[serde(default)]
    pub intent: IntentConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "parley_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Idle-session eviction configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Seconds of inactivity before conversation and transcript state
    /// is dropped. 0 disables eviction — state then grows until cleared
    /// explicitly or the process restarts.
    #[serde(default = "default_session_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Seconds between pruning sweeps.
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

/// Audio streaming configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamingConfig {
    /// Directory for best-effort debug persistence of uploaded chunks.
    /// Unset disables persistence.
    #[serde(default)]
    pub chunk_dir: Option<String>,

    /// ffmpeg binary used for WebM/Ogg to WAV conversion.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    5002
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_session_ttl_seconds() -> u64 {
    3600
}

fn default_sweep_interval_seconds() -> u64 {
    60
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_session_ttl_seconds(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_dir: None,
            ffmpeg_path: default_ffmpeg_path(),
        }
    }
}

impl SessionConfig {
    /// The idle TTL, or `None` when eviction is disabled.
    pub fn ttl(&self) -> Option<Duration> {
        if self.ttl_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.ttl_seconds))
        }
    }
}

impl Config {
    /// Names of providers that are not configured. Used for the startup
    /// status log; the server runs regardless, degrading per operation.
    pub fn missing_providers(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.stt.is_configured() {
            missing.push("Azure Speech");
        }
        if !self.tts.is_configured() {
            missing.push("ElevenLabs");
        }
        if !self.intent.is_configured() {
            missing.push("Azure OpenAI");
        }
        missing
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `PARLEY_HOST` overrides `server.host`
/// - `PARLEY_PORT` overrides `server.port`
/// - `PARLEY_LOG_LEVEL` overrides `logging.level`
/// - `PARLEY_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `PARLEY_SESSION_TTL_SECONDS` overrides `session.ttl_seconds`
/// - `PARLEY_CHUNK_DIR` overrides `streaming.chunk_dir`
/// - `PARLEY_FFMPEG_PATH` overrides `streaming.ffmpeg_path`
/// - `AZURE_SPEECH_KEY` / `AZURE_SPEECH_REGION` override `stt.*`
/// - `ELEVENLABS_API_KEY` overrides `tts.api_key`
/// - `AZURE_OPENAI_API_KEY` / `AZURE_OPENAI_ENDPOINT` /
///   `AZURE_OPENAI_API_VERSION` override `intent.*`
///
/// The provider secrets keep the names the original deployment used, so
/// existing environments carry over unchanged.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("PARLEY_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("PARLEY_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("PARLEY_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("PARLEY_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(ttl) = std::env::var("PARLEY_SESSION_TTL_SECONDS") {
        if let Ok(parsed) = ttl.parse() {
            config.session.ttl_seconds = parsed;
        }
    }
    if let Ok(dir) = std::env::var("PARLEY_CHUNK_DIR") {
        config.streaming.chunk_dir = if dir.is_empty() { None } else { Some(dir) };
    }
    if let Ok(ffmpeg) = std::env::var("PARLEY_FFMPEG_PATH") {
        config.streaming.ffmpeg_path = ffmpeg;
    }

    if let Ok(key) = std::env::var("AZURE_SPEECH_KEY") {
        config.stt.api_key = key;
    }
    if let Ok(region) = std::env::var("AZURE_SPEECH_REGION") {
        config.stt.region = region;
    }
    if let Ok(key) = std::env::var("ELEVENLABS_API_KEY") {
        config.tts.api_key = key;
    }
    if let Ok(key) = std::env::var("AZURE_OPENAI_API_KEY") {
        config.intent.api_key = key;
    }
    if let Ok(endpoint) = std::env::var("AZURE_OPENAI_ENDPOINT") {
        config.intent.endpoint = endpoint;
    }
    if let Ok(version) = std::env::var("AZURE_OPENAI_API_VERSION") {
        config.intent.api_version = version;
    }

    Ok(config)
}
