use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{ConfigSource, UpstreamConfig};
use crate::error::UpstreamError;

const API_NAME: &str = "Tandem API";

/// Answer backend for search queries. The HTTP handlers only see this
/// trait, so tests run against canned implementations.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Forwards `query` upstream and returns the HTML answer payload.
    async fn search(&self, query: &str) -> Result<String, UpstreamError>;
}

/// Client for the remote Tandem search/answer API.
pub struct TandemClient {
    http: reqwest::Client,
    config: Arc<dyn ConfigSource>,
}

impl TandemClient {
    pub fn new(http: reqwest::Client, config: Arc<dyn ConfigSource>) -> TandemClient {
        TandemClient { http, config }
    }
}

#[async_trait]
impl SearchBackend for TandemClient {
    async fn search(&self, query: &str) -> Result<String, UpstreamError> {
        let config = UpstreamConfig::load(self.config.as_ref());
        let (url, key) = match (config.tandem_url, config.tandem_key) {
            (Some(url), Some(key)) => (url, key),
            _ => {
                return Err(UpstreamError::NotConfigured(
                    "Tandem API not configured. Please set TANDEM_API_URL and \
                     TANDEM_API_KEY in your .env file."
                        .to_string(),
                ));
            }
        };

        // Exactly one attempt; failures propagate to the route boundary.
        let response = self
            .http
            .post(&url)
            .bearer_auth(&key)
            .timeout(Duration::from_millis(config.tandem_timeout_ms))
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                api: API_NAME,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                api: API_NAME,
                status,
                detail: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|source| UpstreamError::Transport {
                api: API_NAME,
                source,
            })?;

        Ok(extract_html(&data))
    }
}

/// Pulls the HTML payload out of whichever shape the API answered with.
/// Falls back to the raw JSON so the caller always gets something to render.
pub fn extract_html(data: &Value) -> String {
    let candidates = [
        data.get("html"),
        data.get("content"),
        data.get("result").and_then(|r| r.get("html")),
        data.get("response"),
    ];
    for field in candidates.into_iter().flatten() {
        if let Some(text) = field.as_str() {
            return text.to_string();
        }
    }
    data.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_html_prefers_html_field() {
        let data = json!({"html": "<p>answer</p>", "content": "other"});
        assert_eq!(extract_html(&data), "<p>answer</p>");
    }

    #[test]
    fn test_extract_html_priority_order() {
        let data = json!({"content": "from content", "response": "from response"});
        assert_eq!(extract_html(&data), "from content");

        let data = json!({"result": {"html": "nested"}, "response": "flat"});
        assert_eq!(extract_html(&data), "nested");

        let data = json!({"response": "only response"});
        assert_eq!(extract_html(&data), "only response");
    }

    #[test]
    fn test_extract_html_takes_present_empty_string() {
        // A present-but-empty field wins; later fields are not consulted.
        let data = json!({"html": "", "content": "ignored"});
        assert_eq!(extract_html(&data), "");
    }

    #[test]
    fn test_extract_html_falls_back_to_raw_json() {
        let data = json!({"status": "done"});
        assert_eq!(extract_html(&data), r#"{"status":"done"}"#);
    }

    #[test]
    fn test_extract_html_skips_non_string_fields() {
        let data = json!({"html": 42, "content": "usable"});
        assert_eq!(extract_html(&data), "usable");
    }
}
