//! The three dimension scoring engines.
//!
//! Each analyzer consumes a [`crate::document::MarkupDocument`] and produces
//! a [`crate::report::DimensionReport`]. The `analyze` methods never fail:
//! internal errors degrade to a fixed score-50 report with a single
//! synthetic issue.

pub mod aeo;
pub mod geo;
pub mod seo;

pub use aeo::AeoAnalyzer;
pub use geo::GeoAnalyzer;
pub use seo::SeoAnalyzer;
