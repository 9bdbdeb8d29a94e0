// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! Maps HTTP outcomes onto the feed error taxonomy: 429 and 5xx become
//! [`FeedError::TransientRemote`], every other failure is terminal. The
//! client makes exactly one request per call; retrying is the caller's job.

use std::time::Duration;

use quizfeed_core::FeedError;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tracing::debug;

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new client authenticated with `api_key`.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| FeedError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::TerminalRemote {
                status: None,
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Sends one `generateContent` request.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, FeedError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .json(request)
            .send()
            .await
            .map_err(|e| FeedError::TerminalRemote {
                status: None,
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model, "generateContent response received");

        let body = response.text().await.map_err(|e| FeedError::TerminalRemote {
            status: Some(status.as_u16()),
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                FeedError::MalformedResponse(format!("unexpected response envelope: {e}"))
            });
        }

        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!(
                "Gemini API error ({}): {}",
                api_err.error.status.as_deref().unwrap_or("UNKNOWN"),
                api_err.error.message
            ),
            Err(_) => format!("API returned {status}: {body}"),
        };

        if is_transient_status(status) {
            Err(FeedError::TransientRemote {
                status: status.as_u16(),
                message,
            })
        } else {
            Err(FeedError::TerminalRemote {
                status: Some(status.as_u16()),
                message,
                source: None,
            })
        }
    }
}

/// Rate limiting and server faults are worth retrying.
pub fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses() {
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_transient_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_transient_status(StatusCode::BAD_REQUEST));
        assert!(!is_transient_status(StatusCode::UNAUTHORIZED));
        assert!(!is_transient_status(StatusCode::FORBIDDEN));
    }

    #[test]
    fn endpoint_includes_model_and_trims_slash() {
        let client = GeminiClient::new("k", "http://localhost:1234/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint("gemini-x"),
            "http://localhost:1234/v1beta/models/gemini-x:generateContent"
        );
    }

    #[test]
    fn invalid_api_key_is_config_error() {
        let result = GeminiClient::new("bad\nkey", DEFAULT_BASE_URL, Duration::from_secs(1));
        assert!(matches!(result, Err(FeedError::Config(_))));
    }
}
