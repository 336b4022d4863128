//! HTTP client for the parking-spot detection service.
//!
//! Provides a minimal client with a generic multipart POST helper and the
//! `/process_media` call. No authentication is sent. The CLI uses this client
//! directly, and the submission form uses it through `MediaProcessor`.

pub mod api;

use anyhow::{Context, Result};
use parkwatch_core::{ClientConfig, SubmitError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Path of the processing endpoint on the detection service.
pub const PROCESS_MEDIA_PATH: &str = "/process_media";

/// Error body returned by the detection service on 4xx/5xx.
#[derive(Debug, serde::Deserialize)]
struct ServerErrorBody {
    error: String,
}

/// HTTP client for the detection service.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// `timeout` of `None` waits for the response indefinitely.
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.server_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST multipart form and deserialize the JSON response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, SubmitError> {
        let url = self.build_url(path);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SubmitError::Server {
                status: status.as_u16(),
                message: server_message(status, &error_text),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, e))?;
        serde_json::from_slice(&body)
            .map_err(|e| SubmitError::Decode(format!("Failed to parse response as JSON: {}", e)))
    }

    /// Reachability probe. Any HTTP answer counts as reachable.
    pub async fn health(&self) -> Result<u16, SubmitError> {
        let url = self.build_url("/");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        Ok(response.status().as_u16())
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> SubmitError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    SubmitError::Transport(format!("{} {}: {}", url, kind, err))
}

/// Prefer the service's `{"error": ...}` message, then the raw body, then the reason phrase.
fn server_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ServerErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let client = ApiClient::new("http://127.0.0.1:5000/".to_string(), None).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
        assert_eq!(
            client.build_url(PROCESS_MEDIA_PATH),
            "http://127.0.0.1:5000/process_media"
        );
    }

    #[test]
    fn test_server_message_prefers_error_field() {
        assert_eq!(
            server_message(
                StatusCode::BAD_REQUEST,
                r#"{"error": "Both video and mask files are required"}"#
            ),
            "Both video and mask files are required"
        );
        assert_eq!(
            server_message(StatusCode::BAD_GATEWAY, " upstream down \n"),
            "upstream down"
        );
        assert_eq!(
            server_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
    }
}
