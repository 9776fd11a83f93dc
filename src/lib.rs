//! site_audit library: SEO/AEO/GEO website auditing.
//!
//! Fetches a page, scores it along three dimensions (traditional search,
//! answer engines, local search), and synthesizes prioritized remediation
//! recommendations, optionally with the help of an external reasoning
//! service. Audit history is persisted to SQLite.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use site_audit::{AuditEngine, PageFetcher, Synthesizer};
//! use site_audit::error_handling::ErrorStats;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = PageFetcher::with_defaults(None, Arc::new(ErrorStats::new()))?;
//! let engine = AuditEngine::new(Arc::new(fetcher), Synthesizer::new(None));
//!
//! let result = engine.run_audit("example.com").await;
//! println!("SEO {} / AEO {} / GEO {}",
//!          result.seo_score, result.aeo_score, result.geo_score);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or call library functions within an async context.

#![warn(missing_docs)]

pub mod analyzers;
mod audit;
pub mod config;
mod document;
pub mod error_handling;
mod fetch;
pub mod initialization;
mod reasoning;
mod recommend;
mod report;
pub mod storage;

// Re-export public API
pub use audit::{normalize_url, AuditEngine};
pub use config::{Config, LogFormat, LogLevel};
pub use document::MarkupDocument;
pub use fetch::{Fetcher, PageFetcher, RenderClient, RenderError};
pub use reasoning::{OpenAiService, ReasoningService};
pub use recommend::{
    LocalSource, RecommendationInput, RecommendationSource, RemoteSource, Synthesizer,
};
pub use report::{
    AuditResult, AuditStatus, Dimension, DimensionReport, Priority, QuickAudit, Recommendation,
};
