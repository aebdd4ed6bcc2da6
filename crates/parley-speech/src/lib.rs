//! Speech provider adapters for the Parley voice backend.
//!
//! Wraps the two external speech collaborators behind narrow typed
//! clients: Azure Speech for transcription ([`SttClient`]) and
//! ElevenLabs for synthesis ([`TtsClient`]). Browser audio arrives as
//! WebM/Ogg; [`AudioConverter`] shells out to ffmpeg to turn it into
//! the WAV the recognizer expects.
//!
//! Every provider call runs under a bounded timeout and surfaces
//! failures as [`SpeechError`] variants — callers pattern-match and
//! degrade instead of receiving sentinel values. No call is ever
//! retried.

pub mod config;
pub mod convert;
pub mod error;
pub mod stt;
pub mod tts;

pub use config::{SttConfig, TtsConfig, DEFAULT_TTS_MODEL_ID, DEFAULT_TTS_VOICE_ID};
pub use convert::AudioConverter;
pub use error::SpeechError;
pub use stt::SttClient;
pub use tts::TtsClient;
