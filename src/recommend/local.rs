//! Deterministic, network-free recommendation source.
//!
//! Used whenever the reasoning service is unavailable or returns nothing
//! usable. Takes the top issues from each dimension (3 SEO, 2 AEO, 2 GEO —
//! at most 7 items total), matches each against a canned solution table,
//! and falls back to a generic per-category suggestion.

use async_trait::async_trait;

use super::{RecommendationInput, RecommendationSource};
use crate::report::{Dimension, DimensionReport, Priority, Recommendation};

const SEO_ITEM_CAP: usize = 3;
const AEO_ITEM_CAP: usize = 2;
const GEO_ITEM_CAP: usize = 2;

// Literal-substring keys, matched case-insensitively against issue text.
// First match wins.
const CANNED_SOLUTIONS: &[(&str, &str)] = &[
    (
        "Missing meta description",
        "Add a compelling 150-160 character meta description that includes your primary keywords and encourages clicks.",
    ),
    (
        "Missing page title",
        "Add a unique, descriptive page title between 50-60 characters that includes your target keywords.",
    ),
    (
        "Images missing alt text",
        "Add descriptive alt text to all images for better accessibility and SEO.",
    ),
    (
        "No structured data",
        "Implement JSON-LD structured data for your organization, products, or content type.",
    ),
    (
        "No question-format content",
        "Add FAQ sections with question-answer format to target featured snippets.",
    ),
    (
        "No phone number detected",
        "Add your business phone number prominently on your website for better local SEO.",
    ),
    (
        "No clear location signals",
        "Include your business address and location information throughout your website.",
    ),
];

/// Rule-based recommendation source. Never fails.
pub struct LocalSource;

impl LocalSource {
    fn items(
        report: &DimensionReport,
        category: Dimension,
        priority: Priority,
        cap: usize,
    ) -> impl Iterator<Item = Recommendation> + '_ {
        report.issues.iter().take(cap).map(move |issue| Recommendation {
            category,
            priority,
            issue: issue.clone(),
            solution: solution_for(issue, category),
        })
    }
}

#[async_trait]
impl RecommendationSource for LocalSource {
    async fn generate(
        &self,
        input: &RecommendationInput<'_>,
    ) -> anyhow::Result<Vec<Recommendation>> {
        let recommendations = Self::items(input.seo, Dimension::Seo, Priority::High, SEO_ITEM_CAP)
            .chain(Self::items(
                input.aeo,
                Dimension::Aeo,
                Priority::Medium,
                AEO_ITEM_CAP,
            ))
            .chain(Self::items(
                input.geo,
                Dimension::Geo,
                Priority::Medium,
                GEO_ITEM_CAP,
            ))
            .collect();
        Ok(recommendations)
    }
}

fn solution_for(issue: &str, category: Dimension) -> String {
    let issue_lower = issue.to_lowercase();
    for (key, solution) in CANNED_SOLUTIONS {
        if issue_lower.contains(&key.to_lowercase()) {
            return (*solution).to_string();
        }
    }
    format!(
        "Review and optimize this aspect of your {category} strategy for better search visibility."
    )
}
