use crate::error::SpeechError;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Timeout for ffmpeg execution.
const CONVERT_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns `true` if the bytes carry a RIFF/WAVE header.
pub fn looks_like_wav(data: &[u8]) -> bool {
    data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WAVE"
}

/// Converts browser-captured audio (WebM/Ogg) to the 16 kHz mono PCM
/// WAV the recognizer expects, by piping it through an ffmpeg process.
///
/// The codec work itself stays delegated to ffmpeg; this type only
/// manages the subprocess.
#[derive(Debug, Clone)]
pub struct AudioConverter {
    ffmpeg: PathBuf,
}

impl AudioConverter {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Runs ffmpeg over `audio`, reading from stdin and writing WAV to
    /// stdout.
    pub async fn convert_to_wav(&self, audio: &[u8]) -> Result<Vec<u8>, SpeechError> {
        let mut command = Command::new(&self.ffmpeg);
        command
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg("pipe:0")
            .arg("-f")
            .arg("wav")
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg("-ar")
            .arg("16000")
            .arg("-ac")
            .arg("1")
            .arg("pipe:1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command
            .spawn()
            .map_err(|e| SpeechError::Convert(format!("failed to spawn ffmpeg: {}", e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SpeechError::Convert("failed to open stdin".to_string()))?;
        let audio_owned = audio.to_vec();

        // Write input from a task so a full stdout buffer cannot deadlock
        // against an unread stdin pipe.
        let write_task = tokio::spawn(async move { stdin.write_all(&audio_owned).await });

        let output = tokio::time::timeout(CONVERT_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| {
                SpeechError::Convert(format!(
                    "ffmpeg timed out after {} seconds",
                    CONVERT_TIMEOUT.as_secs()
                ))
            })?
            .map_err(|e| SpeechError::Convert(format!("failed to wait for ffmpeg: {}", e)))?;

        match write_task.await {
            Ok(Ok(())) => {}
            // A broken pipe here usually means ffmpeg already failed and
            // exited; the status check below reports the real cause.
            Ok(Err(e)) => tracing::debug!("ffmpeg stdin write ended early: {}", e),
            Err(e) => return Err(SpeechError::Convert(format!("stdin task failed: {}", e))),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::Convert(format!("ffmpeg failed: {}", stderr)));
        }

        Ok(output.stdout)
    }

    /// Returns WAV bytes for `audio`, converting when the payload is not
    /// already WAV. Conversion failures fall back to the original bytes —
    /// the recognizer then decides whether it can use them.
    pub async fn ensure_wav(&self, audio: Vec<u8>) -> Vec<u8> {
        if looks_like_wav(&audio) {
            return audio;
        }
        match self.convert_to_wav(&audio).await {
            Ok(wav) => wav,
            Err(e) => {
                tracing::warn!("audio conversion unavailable, using original data: {}", e);
                audio
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_is_detected() {
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&[0, 0, 0, 0]);
        wav.extend_from_slice(b"WAVE");
        assert!(looks_like_wav(&wav));
    }

    #[test]
    fn webm_and_short_payloads_are_not_wav() {
        assert!(!looks_like_wav(&[0x1A, 0x45, 0xDF, 0xA3, 0, 0, 0, 0, 0, 0, 0, 0]));
        assert!(!looks_like_wav(b"RIFF"));
        assert!(!looks_like_wav(&[]));
    }

    #[tokio::test]
    async fn missing_ffmpeg_binary_falls_back_to_original_bytes() {
        let converter = AudioConverter::new("/nonexistent/ffmpeg");
        let webm = vec![0x1A, 0x45, 0xDF, 0xA3, 1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(converter.ensure_wav(webm.clone()).await, webm);
    }

    #[tokio::test]
    async fn wav_input_is_passed_through_untouched() {
        let converter = AudioConverter::new("/nonexistent/ffmpeg");
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&[4, 0, 0, 0]);
        wav.extend_from_slice(b"WAVE");
        assert_eq!(converter.ensure_wav(wav.clone()).await, wav);
    }
}
