//! Headless-browser render service client.
//!
//! Talks to a browserless-style HTTP API: a `POST /content` with the target
//! URL returns the fully rendered HTML after client-side scripts have run.

use std::time::Duration;

use serde_json::json;
use thiserror::Error;

use crate::config::RENDER_TIMEOUT_SECS;

/// Errors from the render service.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Transport-level failure reaching the service.
    #[error("render request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("render service error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Client for a browserless-compatible content endpoint.
pub struct RenderClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RenderClient {
    /// Creates a client for the given service base URL and access token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, RenderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(RENDER_TIMEOUT_SECS))
            .build()?;
        Ok(RenderClient {
            http,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    /// Renders the page and returns the post-JavaScript HTML.
    pub async fn render(&self, url: &str) -> Result<String, RenderError> {
        let endpoint = format!(
            "{}/content?token={}",
            self.base_url.trim_end_matches('/'),
            self.token
        );

        let response = self
            .http
            .post(&endpoint)
            .json(&json!({ "url": url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RenderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = RenderClient::new("http://localhost:3000/", "secret").unwrap();
        let endpoint = format!(
            "{}/content?token={}",
            client.base_url.trim_end_matches('/'),
            client.token
        );
        assert_eq!(endpoint, "http://localhost:3000/content?token=secret");
    }

    #[test]
    fn test_api_error_display() {
        let err = RenderError::Api {
            status: 429,
            message: "too many sessions".into(),
        };
        assert_eq!(
            err.to_string(),
            "render service error (status 429): too many sessions"
        );
    }
}
