//! HTTP recognition service client.
//!
//! Encodes a chunk as an in-memory WAV and POSTs it to the configured
//! endpoint. Transport failures and throttling/server statuses map to
//! transient errors; anything the service outright rejects is fatal and
//! will not be retried.

use crate::audio::wav;
use crate::defaults;
use crate::error::{Result, ScribeError};
use crate::segment::AudioChunk;
use crate::stt::client::{RecognizeError, RecognizeOutcome, RecognizeResult, SpeechService};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Configuration for the HTTP recognition client.
#[derive(Debug, Clone)]
pub struct HttpServiceConfig {
    /// Recognition endpoint URL.
    pub endpoint: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Language hint passed as a query parameter.
    pub language: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::SERVICE_ENDPOINT.to_string(),
            api_key: None,
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(defaults::SERVICE_TIMEOUT_SECS),
        }
    }
}

/// Recognition client for whisper.cpp-style HTTP servers.
pub struct HttpSpeechService {
    client: reqwest::Client,
    config: HttpServiceConfig,
}

impl HttpSpeechService {
    /// Creates a client with the given configuration.
    pub fn new(config: HttpServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScribeError::Service {
                message: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

/// Response body of the recognition endpoint.
#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl SpeechService for HttpSpeechService {
    async fn recognize(&self, chunk: &AudioChunk) -> RecognizeResult {
        let payload = wav::encode_wav(&chunk.samples, chunk.sample_rate).map_err(|e| {
            RecognizeError::Fatal {
                message: e.to_string(),
            }
        })?;

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .query(&[("language", self.config.language.as_str())])
            .body(payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        // Connect errors and timeouts are transport-level and presumed
        // recoverable.
        let response = request.send().await.map_err(|e| RecognizeError::Transient {
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            let parsed: RecognizeResponse =
                response.json().await.map_err(|e| RecognizeError::Fatal {
                    message: format!("malformed response: {e}"),
                })?;
            Ok(match parsed.text {
                Some(text) if !text.trim().is_empty() => RecognizeOutcome::Transcribed(text),
                _ => RecognizeOutcome::Unintelligible,
            })
        } else if is_retryable(status) {
            Err(RecognizeError::Transient {
                message: format!("service returned {status}"),
            })
        } else {
            Err(RecognizeError::Fatal {
                message: format!("service returned {status}"),
            })
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Statuses worth retrying: throttling, server trouble, gateway timeouts.
fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpServiceConfig::default();
        assert_eq!(config.endpoint, defaults::SERVICE_ENDPOINT);
        assert_eq!(config.language, "en");
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_client_construction() {
        let service = HttpSpeechService::new(HttpServiceConfig::default()).unwrap();
        assert_eq!(service.name(), "http");
        assert_eq!(service.endpoint(), defaults::SERVICE_ENDPOINT);
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable(StatusCode::REQUEST_TIMEOUT));
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));

        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable(StatusCode::PAYLOAD_TOO_LARGE));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_response_with_text() {
        let parsed: RecognizeResponse = serde_json::from_str(r#"{"text": "hello world"}"#).unwrap();
        assert_eq!(parsed.text.as_deref(), Some("hello world"));
    }

    #[test]
    fn test_response_without_text_field() {
        let parsed: RecognizeResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text, None);
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let parsed: RecognizeResponse =
            serde_json::from_str(r#"{"text": "ok", "duration": 1.5, "lang": "en"}"#).unwrap();
        assert_eq!(parsed.text.as_deref(), Some("ok"));
    }
}
