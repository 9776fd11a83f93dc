//! Recommendation synthesis.
//!
//! Findings from the three analyzers are turned into prioritized action
//! items by a chain of [`RecommendationSource`]s: the remote
//! reasoning-service source is tried first, and any failure — service
//! unreachable, not configured, or a reply with zero parseable lines —
//! routes to the deterministic local source. The chain as a whole never
//! fails.

mod local;
mod remote;

pub use local::LocalSource;
pub use remote::RemoteSource;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error_handling::{ErrorStats, ErrorType};
use crate::report::{DimensionReport, Recommendation};

/// Borrowed view of one audit's findings, consumed by sources.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInput<'a> {
    /// The audited URL.
    pub url: &'a str,
    /// SEO findings.
    pub seo: &'a DimensionReport,
    /// AEO findings.
    pub aeo: &'a DimensionReport,
    /// GEO findings.
    pub geo: &'a DimensionReport,
}

/// A strategy for producing recommendations from audit findings.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Produces an ordered recommendation list, higher priority first.
    async fn generate(
        &self,
        input: &RecommendationInput<'_>,
    ) -> anyhow::Result<Vec<Recommendation>>;
}

/// Primary-then-fallback combinator over recommendation sources.
pub struct Synthesizer {
    primary: Option<Box<dyn RecommendationSource>>,
    fallback: Box<dyn RecommendationSource>,
    stats: Option<Arc<ErrorStats>>,
}

impl Synthesizer {
    /// Builds the standard chain: optional remote source, local fallback.
    pub fn new(primary: Option<Box<dyn RecommendationSource>>) -> Self {
        Synthesizer {
            primary,
            fallback: Box::new(LocalSource),
            stats: None,
        }
    }

    /// Attaches the shared failure counters.
    pub fn with_stats(mut self, stats: Arc<ErrorStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Replaces the fallback source (used by tests).
    #[cfg(test)]
    pub fn with_fallback(mut self, fallback: Box<dyn RecommendationSource>) -> Self {
        self.fallback = fallback;
        self
    }

    fn record_fallback(&self) {
        if let Some(stats) = &self.stats {
            stats.increment(ErrorType::ReasoningServiceFallback);
        }
    }

    /// Generates recommendations. Never fails: every primary-path error is
    /// absorbed and the deterministic fallback runs instead.
    pub async fn generate(&self, input: &RecommendationInput<'_>) -> Vec<Recommendation> {
        if let Some(primary) = &self.primary {
            match primary.generate(input).await {
                Ok(recommendations) if !recommendations.is_empty() => return recommendations,
                Ok(_) => {
                    self.record_fallback();
                    log::warn!(
                        "Reasoning service reply had no parseable recommendations for {}; using fallback",
                        input.url
                    );
                }
                Err(e) => {
                    self.record_fallback();
                    log::warn!(
                        "Reasoning service failed for {} ({e:#}); using fallback",
                        input.url
                    );
                }
            }
        } else {
            log::debug!("No reasoning service configured; using local recommendations");
        }

        // The local source is infallible by construction.
        self.fallback.generate(input).await.unwrap_or_default()
    }
}
