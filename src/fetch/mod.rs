//! Page content acquisition.
//!
//! A static HTTP GET is always tried first. The body only counts as usable
//! when the response is 200 and the stripped visible text clears a minimum
//! length; thin bodies are treated as client-side-rendered shells and handed
//! to the render service for one fallback attempt. There are no retries
//! beyond that single fallback.

mod render;

pub use render::{RenderClient, RenderError};

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use crate::config::{DEFAULT_USER_AGENT, MIN_RENDERED_TEXT_LEN, STATIC_FETCH_TIMEOUT_SECS};
use crate::document::MarkupDocument;
use crate::error_handling::{ErrorStats, ErrorType};

/// Retrieves the HTML body for a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the page HTML, or an error when no usable body could be
    /// obtained by any strategy.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Static-first fetcher with an optional render-service fallback.
pub struct PageFetcher {
    client: reqwest::Client,
    render: Option<RenderClient>,
    stats: Arc<ErrorStats>,
}

impl PageFetcher {
    /// Builds a fetcher around a preconfigured HTTP client.
    pub fn new(
        client: reqwest::Client,
        render: Option<RenderClient>,
        stats: Arc<ErrorStats>,
    ) -> Self {
        PageFetcher {
            client,
            render,
            stats,
        }
    }

    /// Builds a fetcher with the default user agent and timeouts.
    pub fn with_defaults(render: Option<RenderClient>, stats: Arc<ErrorStats>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(Duration::from_secs(STATIC_FETCH_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(PageFetcher::new(client, render, stats))
    }

    /// One plain GET. `Ok(Some(body))` only for a 200 response; any other
    /// status is `Ok(None)` so the render fallback can run.
    async fn fetch_static(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Static fetch failed for {url}"))?;

        if response.status() != reqwest::StatusCode::OK {
            log::debug!("Static fetch of {url} returned {}", response.status());
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;
        Ok(Some(body))
    }
}

/// A body is substantial when its stripped text clears the minimum length,
/// counted in characters so non-ASCII pages aren't over-measured. Anything
/// thinner is assumed to be a JavaScript shell.
fn is_substantial(body: &str) -> bool {
    MarkupDocument::parse(body).text.chars().count() >= MIN_RENDERED_TEXT_LEN
}

#[async_trait]
impl Fetcher for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let static_body = match self.fetch_static(url).await {
            Ok(body) => body,
            Err(e) => {
                self.stats.increment(ErrorType::StaticFetchError);
                log::warn!("{e:#}");
                None
            }
        };

        if let Some(body) = &static_body {
            if is_substantial(body) {
                log::debug!("Static fetch of {url} returned substantial content");
                return Ok(static_body.unwrap_or_default());
            }
            self.stats.increment(ErrorType::ThinStaticContent);
        }

        match &self.render {
            Some(render) => {
                log::info!("Static content for {url} too thin; rendering");
                let body = render.render(url).await.inspect_err(|_| {
                    self.stats.increment(ErrorType::RenderFetchError);
                })?;
                Ok(body)
            }
            None => match static_body {
                // No renderer configured: a thin 200 body is better than
                // nothing, so accept it with a warning.
                Some(body) if !body.is_empty() => {
                    log::warn!(
                        "Static content for {url} below render threshold and no render service configured"
                    );
                    Ok(body)
                }
                _ => Err(anyhow!("Failed to fetch website content")),
            },
        }
    }
}
