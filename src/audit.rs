//! Audit orchestration.
//!
//! One audit is: normalize the URL, fetch the page, parse it once into an
//! owned [`MarkupDocument`], run the three analyzers concurrently on
//! blocking threads, then synthesize recommendations. The engine never
//! returns an error to the caller: every failure collapses into an
//! [`AuditResult`] with `failed` status, zero scores, and an error message.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Utc;
use url::Url;

use crate::analyzers::{AeoAnalyzer, GeoAnalyzer, SeoAnalyzer};
use crate::config::MAX_URL_LENGTH;
use crate::document::MarkupDocument;
use crate::fetch::Fetcher;
use crate::recommend::{RecommendationInput, Synthesizer};
use crate::report::{AuditResult, AuditStatus, DimensionReport, QuickAudit};

/// Validates and normalizes a user-supplied URL.
///
/// A bare hostname gets an `https://` prefix. Rejected: empty input,
/// overlong input, non-http(s) schemes, and anything `Url` cannot parse.
pub fn normalize_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("URL cannot be empty"));
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(anyhow!(
            "URL exceeds maximum length of {MAX_URL_LENGTH} characters"
        ));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|e| anyhow!("Invalid URL '{trimmed}': {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed.to_string()),
        scheme => Err(anyhow!("Unsupported URL scheme '{scheme}'")),
    }
}

/// Runs audits end to end. Cheap to share behind an `Arc`.
pub struct AuditEngine {
    fetcher: Arc<dyn Fetcher>,
    synthesizer: Synthesizer,
}

impl AuditEngine {
    /// Assembles an engine from a fetcher and a recommendation chain.
    pub fn new(fetcher: Arc<dyn Fetcher>, synthesizer: Synthesizer) -> Self {
        AuditEngine {
            fetcher,
            synthesizer,
        }
    }

    /// Runs a full audit. Infallible: fetch and join failures surface as a
    /// `failed` result rather than an `Err`.
    pub async fn run_audit(&self, raw_url: &str) -> AuditResult {
        let created_at = Utc::now().timestamp_millis();
        let audit_id = format!("audit_{created_at}");

        let url = match normalize_url(raw_url) {
            Ok(url) => url,
            Err(e) => {
                return AuditResult::failed(audit_id, raw_url.to_string(), e.to_string(), created_at)
            }
        };

        let (seo, aeo, geo) = match self.analyze(&url).await {
            Ok(reports) => reports,
            Err(e) => {
                log::error!("Audit of {url} failed: {e:#}");
                return AuditResult::failed(audit_id, url, format!("{e:#}"), created_at);
            }
        };

        let recommendations = self
            .synthesizer
            .generate(&RecommendationInput {
                url: &url,
                seo: &seo,
                aeo: &aeo,
                geo: &geo,
            })
            .await;

        AuditResult {
            audit_id,
            url,
            seo_score: seo.score,
            aeo_score: aeo.score,
            geo_score: geo.score,
            seo_details: seo,
            aeo_details: aeo,
            geo_details: geo,
            recommendations,
            status: AuditStatus::Completed,
            error: None,
            created_at,
        }
    }

    /// Scores-only variant: same fetch and analysis, no recommendation
    /// synthesis.
    pub async fn quick_audit(&self, raw_url: &str) -> QuickAudit {
        let url = match normalize_url(raw_url) {
            Ok(url) => url,
            Err(e) => {
                return QuickAudit {
                    url: raw_url.to_string(),
                    seo_score: 0,
                    aeo_score: 0,
                    geo_score: 0,
                    status: AuditStatus::Failed,
                    error: Some(e.to_string()),
                }
            }
        };

        match self.analyze(&url).await {
            Ok((seo, aeo, geo)) => QuickAudit {
                url,
                seo_score: seo.score,
                aeo_score: aeo.score,
                geo_score: geo.score,
                status: AuditStatus::Completed,
                error: None,
            },
            Err(e) => QuickAudit {
                url,
                seo_score: 0,
                aeo_score: 0,
                geo_score: 0,
                status: AuditStatus::Failed,
                error: Some(format!("{e:#}")),
            },
        }
    }

    /// Fetches, parses once, and fans the analyzers out onto blocking
    /// threads. The parsed document is owned and `Send`, so the analyzer
    /// tasks can share it without re-parsing.
    async fn analyze(
        &self,
        url: &str,
    ) -> Result<(DimensionReport, DimensionReport, DimensionReport)> {
        let body = self.fetcher.fetch(url).await?;
        let document = Arc::new(MarkupDocument::parse(&body));

        let seo_doc = Arc::clone(&document);
        let aeo_doc = Arc::clone(&document);
        let geo_doc = Arc::clone(&document);
        let seo_url = url.to_string();
        let aeo_url = url.to_string();
        let geo_url = url.to_string();

        let (seo, aeo, geo) = tokio::join!(
            tokio::task::spawn_blocking(move || SeoAnalyzer.analyze(&seo_url, &seo_doc)),
            tokio::task::spawn_blocking(move || AeoAnalyzer.analyze(&aeo_url, &aeo_doc)),
            tokio::task::spawn_blocking(move || GeoAnalyzer.analyze(&geo_url, &geo_doc)),
        );

        Ok((
            seo.map_err(|e| anyhow!("SEO analysis task failed: {e}"))?,
            aeo.map_err(|e| anyhow!("AEO analysis task failed: {e}"))?,
            geo.map_err(|e| anyhow!("GEO analysis task failed: {e}"))?,
        ))
    }
}
