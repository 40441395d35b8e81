use reqwest::StatusCode;
use thiserror::Error;

/// Failures from an upstream integration. Configuration absence is checked
/// before any network I/O; everything else comes back from the wire.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0}")]
    NotConfigured(String),

    #[error("{api} error: {} - {detail}", status.as_u16())]
    Status {
        api: &'static str,
        status: StatusCode,
        detail: String,
    },

    #[error("{api} request failed: {source}")]
    Transport {
        api: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_carries_code_and_detail() {
        let err = UpstreamError::Status {
            api: "Local Whisper API",
            status: StatusCode::TOO_MANY_REQUESTS,
            detail: "rate limited".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("429"));
        assert!(message.contains("rate limited"));
    }
}
