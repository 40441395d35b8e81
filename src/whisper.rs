use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::config::{ConfigSource, UpstreamConfig};
use crate::error::UpstreamError;

const API_NAME: &str = "Local Whisper API";

/// Label reported by the health endpoint for the transcription backend.
pub const WHISPER_TYPE: &str = "local";

const UPLOAD_FIELD: &str = "file";
const UPLOAD_FILENAME: &str = "recording.wav";
const UPLOAD_MIME: &str = "audio/wav";

/// Speech-to-text backend. Mirrors `SearchBackend`: handlers depend on the
/// trait, tests substitute their own.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Forwards the audio bytes upstream and returns the transcript.
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, UpstreamError>;
}

/// Client for a locally hosted Whisper-style transcription service.
pub struct LocalWhisperClient {
    http: reqwest::Client,
    config: Arc<dyn ConfigSource>,
}

impl LocalWhisperClient {
    pub fn new(http: reqwest::Client, config: Arc<dyn ConfigSource>) -> LocalWhisperClient {
        LocalWhisperClient { http, config }
    }
}

#[async_trait]
impl TranscriptionBackend for LocalWhisperClient {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, UpstreamError> {
        let config = UpstreamConfig::load(self.config.as_ref());
        let Some(url) = config.whisper_url else {
            return Err(UpstreamError::NotConfigured(
                "Local Whisper API not configured. Please set LOCAL_WHISPER_URL \
                 in your .env file."
                    .to_string(),
            ));
        };

        let part = Part::bytes(audio)
            .file_name(UPLOAD_FILENAME)
            .mime_str(UPLOAD_MIME)
            .map_err(|source| UpstreamError::Transport {
                api: API_NAME,
                source,
            })?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        // Longer timeout than search: local transcription is slow.
        let response = self
            .http
            .post(&url)
            .timeout(Duration::from_millis(config.whisper_timeout_ms))
            .multipart(form)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                api: API_NAME,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UpstreamError::Status {
                api: API_NAME,
                status,
                detail,
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|source| UpstreamError::Transport {
                api: API_NAME,
                source,
            })?;

        Ok(extract_text(&data))
    }
}

/// Pulls the transcript out of whichever shape the service answered with.
/// An unrecognized shape means no speech was transcribed, not an error.
pub fn extract_text(data: &Value) -> String {
    let candidates = [
        data.get("text"),
        data.get("transcription"),
        data.get("result"),
        data.get("response"),
    ];
    for field in candidates.into_iter().flatten() {
        if let Some(text) = field.as_str() {
            return text.to_string();
        }
    }
    String::new()
}
