//! Report data model shared by the analyzers, the recommendation
//! synthesizer, and the storage layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// One of the three independent scoring axes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Dimension {
    /// On-page search engine optimization.
    #[serde(rename = "SEO")]
    #[strum(serialize = "SEO")]
    Seo,
    /// Answer engine optimization (structured data, snippet readiness).
    #[serde(rename = "AEO")]
    #[strum(serialize = "AEO")]
    Aeo,
    /// Local / generative engine optimization.
    #[serde(rename = "GEO")]
    #[strum(serialize = "GEO")]
    Geo,
}

impl Dimension {
    /// Points deducted from 100 per recorded issue in this dimension.
    pub fn penalty_per_issue(&self) -> u32 {
        match self {
            Dimension::Seo => 5,
            Dimension::Aeo => 8,
            Dimension::Geo => 7,
        }
    }

    /// The single synthetic issue reported when an analyzer degrades.
    pub fn degraded_message(&self) -> &'static str {
        match self {
            Dimension::Seo => "Error analyzing SEO",
            Dimension::Aeo => "Error analyzing AEO",
            Dimension::Geo => "Error analyzing GEO",
        }
    }
}

/// Remediation priority assigned to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Priority {
    /// Fix first.
    High,
    /// Fix soon.
    Medium,
    /// Nice to have.
    Low,
}

/// The outcome of one analyzer pass: a bounded score plus structured
/// findings.
///
/// `sections` holds the dimension-specific sub-findings (`meta`, `headings`,
/// `contact_info`, ...) and is flattened on serialization so the JSON shape
/// is `{"score": ..., "meta": {...}, ..., "issues": [...], "strengths": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionReport {
    /// Quality score in `[0, 100]`.
    pub score: u8,
    /// Named sub-findings specific to the dimension.
    #[serde(flatten)]
    pub sections: BTreeMap<String, serde_json::Value>,
    /// Problems found, in check order.
    pub issues: Vec<String>,
    /// Positive signals found, in check order.
    pub strengths: Vec<String>,
}

impl DimensionReport {
    /// An empty zero-score report, used as the detail placeholder on failed
    /// audits.
    pub fn empty() -> Self {
        DimensionReport {
            score: 0,
            sections: BTreeMap::new(),
            issues: Vec::new(),
            strengths: Vec::new(),
        }
    }

    /// The fixed score-50 report an analyzer returns when it fails
    /// internally. The failure is absorbed here; it never propagates.
    pub fn degraded(dimension: Dimension, error: &str) -> Self {
        let mut sections = BTreeMap::new();
        sections.insert(
            "error".to_string(),
            serde_json::Value::String(error.to_string()),
        );
        DimensionReport {
            score: 50,
            sections,
            issues: vec![dimension.degraded_message().to_string()],
            strengths: Vec::new(),
        }
    }
}

/// Per-call accumulator for one analyzer pass.
///
/// Each `analyze` invocation creates a fresh builder and threads it through
/// its checks, so no issue/strength state can leak between calls on a reused
/// analyzer instance.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    issues: Vec<String>,
    strengths: Vec<String>,
    sections: BTreeMap<String, serde_json::Value>,
}

impl ReportBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        ReportBuilder::default()
    }

    /// Records a problem. Each issue costs `penalty_per_issue` points.
    pub fn issue(&mut self, message: impl Into<String>) {
        self.issues.push(message.into());
    }

    /// Records a positive signal. Strengths never affect the score.
    pub fn strength(&mut self, message: impl Into<String>) {
        self.strengths.push(message.into());
    }

    /// Stores a named sub-finding. Values that fail to serialize are stored
    /// as JSON null rather than failing the analysis.
    pub fn section(&mut self, name: &str, value: impl Serialize) {
        let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        self.sections.insert(name.to_string(), value);
    }

    /// Computes the score and produces the final report.
    ///
    /// Score invariant: `clamp(100 - issues * penalty, 0, 100)`.
    pub fn finish(self, dimension: Dimension) -> DimensionReport {
        let penalty = dimension.penalty_per_issue() as i64;
        let score = (100 - penalty * self.issues.len() as i64).clamp(0, 100) as u8;
        DimensionReport {
            score,
            sections: self.sections,
            issues: self.issues,
            strengths: self.strengths,
        }
    }
}

/// A single prioritized remediation item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Which dimension the item belongs to.
    pub category: Dimension,
    /// How urgent the fix is.
    pub priority: Priority,
    /// Short description of the problem.
    pub issue: String,
    /// Actionable fix, one or two sentences.
    pub solution: String,
}

/// Terminal state of an audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AuditStatus {
    /// All analyzers ran and a result was assembled.
    Completed,
    /// The fetch (or an analyzer join) failed; scores are zeroed.
    Failed,
}

/// The aggregate outcome of one audit request. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    /// Identifier in the form `audit_<timestamp_millis>`.
    pub audit_id: String,
    /// The normalized URL that was audited.
    pub url: String,
    /// SEO dimension score.
    pub seo_score: u8,
    /// AEO dimension score.
    pub aeo_score: u8,
    /// GEO dimension score.
    pub geo_score: u8,
    /// Full SEO findings.
    pub seo_details: DimensionReport,
    /// Full AEO findings.
    pub aeo_details: DimensionReport,
    /// Full GEO findings.
    pub geo_details: DimensionReport,
    /// Prioritized remediation list, higher priority first.
    pub recommendations: Vec<Recommendation>,
    /// `completed` or `failed`.
    pub status: AuditStatus,
    /// Human-readable failure cause; present exactly when `status` is
    /// `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
}

impl AuditResult {
    /// Builds the sole user-visible failure shape: zero scores, empty
    /// details and recommendations, non-empty error message.
    pub fn failed(audit_id: String, url: String, error: String, created_at: i64) -> Self {
        AuditResult {
            audit_id,
            url,
            seo_score: 0,
            aeo_score: 0,
            geo_score: 0,
            seo_details: DimensionReport::empty(),
            aeo_details: DimensionReport::empty(),
            geo_details: DimensionReport::empty(),
            recommendations: Vec::new(),
            status: AuditStatus::Failed,
            error: Some(error),
            created_at,
        }
    }
}

/// Lightweight audit outcome: scores only, no recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAudit {
    /// The normalized URL that was audited.
    pub url: String,
    /// SEO dimension score.
    pub seo_score: u8,
    /// AEO dimension score.
    pub aeo_score: u8,
    /// GEO dimension score.
    pub geo_score: u8,
    /// `completed` or `failed`.
    pub status: AuditStatus,
    /// Failure cause, when `status` is `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_score_with_no_issues_is_100() {
        let builder = ReportBuilder::new();
        let report = builder.finish(Dimension::Seo);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_score_decreases_by_penalty_per_issue() {
        for dimension in [Dimension::Seo, Dimension::Aeo, Dimension::Geo] {
            let mut builder = ReportBuilder::new();
            builder.issue("first");
            builder.issue("second");
            let report = builder.finish(dimension);
            let expected = 100 - 2 * dimension.penalty_per_issue() as i64;
            assert_eq!(report.score as i64, expected);
        }
    }

    #[test]
    fn test_score_clamps_at_zero() {
        // 15 GEO issues would be -5 before clamping
        let mut builder = ReportBuilder::new();
        for i in 0..15 {
            builder.issue(format!("issue {i}"));
        }
        let report = builder.finish(Dimension::Geo);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_strengths_do_not_affect_score() {
        let mut builder = ReportBuilder::new();
        builder.strength("one");
        builder.strength("two");
        builder.issue("only issue");
        let report = builder.finish(Dimension::Seo);
        assert_eq!(report.score, 95);
        assert_eq!(report.strengths.len(), 2);
    }

    #[test]
    fn test_sections_flatten_on_serialization() {
        let mut builder = ReportBuilder::new();
        builder.section("meta", serde_json::json!({"title_length": 55}));
        let report = builder.finish(Dimension::Seo);
        let json = serde_json::to_value(&report).unwrap();
        // Section keys sit beside score/issues/strengths, not nested
        assert_eq!(json["meta"]["title_length"], 55);
        assert_eq!(json["score"], 100);
    }

    #[test]
    fn test_degraded_report_shape() {
        let report = DimensionReport::degraded(Dimension::Aeo, "boom");
        assert_eq!(report.score, 50);
        assert_eq!(report.issues, vec!["Error analyzing AEO".to_string()]);
        assert!(report.strengths.is_empty());
        assert_eq!(
            report.sections.get("error"),
            Some(&serde_json::Value::String("boom".to_string()))
        );
    }

    #[test]
    fn test_dimension_parses_case_insensitively() {
        assert_eq!(Dimension::from_str("SEO").unwrap(), Dimension::Seo);
        assert_eq!(Dimension::from_str("geo").unwrap(), Dimension::Geo);
        assert_eq!(Dimension::from_str("Aeo").unwrap(), Dimension::Aeo);
        assert!(Dimension::from_str("SERP").is_err());
    }

    #[test]
    fn test_priority_parses_case_insensitively() {
        assert_eq!(Priority::from_str("high").unwrap(), Priority::High);
        assert_eq!(Priority::from_str("MEDIUM").unwrap(), Priority::Medium);
        assert!(Priority::from_str("urgent").is_err());
    }

    #[test]
    fn test_dimension_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&Dimension::Seo).unwrap(),
            "\"SEO\"".to_string()
        );
        assert_eq!(Dimension::Aeo.to_string(), "AEO");
    }

    #[test]
    fn test_failed_result_invariants() {
        let result = AuditResult::failed(
            "audit_1".into(),
            "https://example.com".into(),
            "Failed to fetch website content".into(),
            0,
        );
        assert_eq!(result.status, AuditStatus::Failed);
        assert_eq!(result.seo_score, 0);
        assert_eq!(result.aeo_score, 0);
        assert_eq!(result.geo_score, 0);
        assert!(result.recommendations.is_empty());
        assert!(!result.error.as_deref().unwrap_or("").is_empty());
    }
}
