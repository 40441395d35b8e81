use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    // Absent query deserializes to the empty string and is rejected by the
    // handler, matching the "Query is required" contract.
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub html: String,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct WhisperResponse {
    pub success: bool,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub tandem_configured: bool,
    pub whisper_configured: bool,
    pub whisper_type: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn validation(error: &'static str) -> ErrorResponse {
        ErrorResponse {
            error,
            message: None,
        }
    }

    pub fn upstream(error: &'static str, message: String) -> ErrorResponse {
        ErrorResponse {
            error,
            message: Some(message),
        }
    }
}
