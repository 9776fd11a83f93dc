//! Answer-engine optimization scoring.
//!
//! Checks the signals answer engines and featured snippets feed on:
//! JSON-LD structured data, microdata, FAQ sections, question-format
//! headings, lists, and tables. Score is `100 - 8 * issues`, clamped.

use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use crate::document::MarkupDocument;
use crate::report::{Dimension, DimensionReport, ReportBuilder};

// Matches headings phrased as questions: an interrogative word, or a
// trailing question mark. Applied to lowercased heading text.
static QUESTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:what|why|how|when|where|which|can|should)\b|\?$")
        .expect("Failed to compile question pattern - this is a bug")
});

/// Stateless answer-engine readiness analyzer.
#[derive(Debug, Default, Clone, Copy)]
pub struct AeoAnalyzer;

impl AeoAnalyzer {
    /// Scores one page. Never fails: the checks are pure, and any panic in
    /// them is absorbed into the fixed score-50 degraded report.
    pub fn analyze(&self, url: &str, document: &MarkupDocument) -> DimensionReport {
        match catch_unwind(AssertUnwindSafe(|| run_checks(document))) {
            Ok(report) => report,
            Err(_) => {
                log::error!("AEO analysis panicked for {url}");
                DimensionReport::degraded(Dimension::Aeo, "AEO analysis panicked")
            }
        }
    }
}

fn run_checks(document: &MarkupDocument) -> DimensionReport {
    let mut builder = ReportBuilder::new();
    check_structured_data(document, &mut builder);
    check_schema_types(document, &mut builder);
    check_qa_format(document, &mut builder);
    check_lists(document, &mut builder);
    check_tables(document, &mut builder);
    builder.finish(Dimension::Aeo)
}

fn check_structured_data(document: &MarkupDocument, builder: &mut ReportBuilder) {
    let count = document.json_ld_blocks.len();

    if count == 0 {
        builder.issue("No structured data (JSON-LD) found");
    } else {
        builder.strength(format!("Found {count} structured data blocks"));
    }

    // Malformed JSON-LD is a parse-level anomaly: skipped, never an error.
    let mut schemas = BTreeSet::new();
    for block in &document.json_ld_blocks {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(block) else {
            continue;
        };
        match value {
            serde_json::Value::Object(ref obj) => collect_types(obj, &mut schemas),
            serde_json::Value::Array(items) => {
                for item in items {
                    if let serde_json::Value::Object(ref obj) = item {
                        collect_types(obj, &mut schemas);
                    }
                }
            }
            _ => {}
        }
    }

    builder.section(
        "structured_data",
        json!({
            "count": count,
            "schemas": schemas.iter().collect::<Vec<_>>(),
            "has_structured_data": count > 0,
        }),
    );
}

fn collect_types(
    object: &serde_json::Map<String, serde_json::Value>,
    schemas: &mut BTreeSet<String>,
) {
    match object.get("@type") {
        Some(serde_json::Value::String(s)) => {
            schemas.insert(s.clone());
        }
        Some(serde_json::Value::Array(items)) => {
            for item in items {
                if let Some(s) = item.as_str() {
                    schemas.insert(s.to_string());
                }
            }
        }
        _ => {}
    }
}

fn check_schema_types(document: &MarkupDocument, builder: &mut ReportBuilder) {
    // Microdata schema name is the trailing path segment of the itemtype URL.
    let microdata_schemas: BTreeSet<&str> = document
        .itemtypes
        .iter()
        .map(|itemtype| itemtype.rsplit('/').next().unwrap_or(itemtype.as_str()))
        .collect();

    if microdata_schemas.is_empty() {
        builder.issue("No schema.org markup found (microdata)");
    } else {
        builder.strength(format!(
            "Found {} schema.org types",
            microdata_schemas.len()
        ));
    }

    let faq_sections = document
        .container_classes
        .iter()
        .filter(|class| class.to_lowercase().contains("faq"))
        .count();
    // Absence of an FAQ block is not penalized, only rewarded when present.
    if faq_sections > 0 {
        builder.strength("FAQ section detected (good for featured snippets)");
    }

    builder.section(
        "schema_types",
        json!({
            "microdata_schemas": microdata_schemas.iter().collect::<Vec<_>>(),
            "faq_sections": faq_sections,
            "has_schema": !microdata_schemas.is_empty() || faq_sections > 0,
        }),
    );
}

fn check_qa_format(document: &MarkupDocument, builder: &mut ReportBuilder) {
    // One hit per heading at most, whichever pattern matches first.
    let question_headings = document
        .h2
        .iter()
        .chain(&document.h3)
        .chain(&document.h4)
        .filter(|heading| QUESTION_PATTERN.is_match(&heading.to_lowercase()))
        .count();

    if question_headings > 0 {
        builder.strength(format!(
            "Found {question_headings} question-format headings (good for featured snippets)"
        ));
    } else {
        builder.issue("No question-format content detected (limits featured snippet potential)");
    }

    builder.section(
        "qa_format",
        json!({
            "question_headings": question_headings,
            "has_qa_format": question_headings > 0,
        }),
    );
}

fn check_lists(document: &MarkupDocument, builder: &mut ReportBuilder) {
    let total_lists = document.ordered_lists + document.unordered_lists;

    if total_lists > 0 {
        builder.strength(format!("Found {total_lists} lists (good for featured snippets)"));
    } else {
        builder.issue("No list formats found (limits featured snippet potential)");
    }

    builder.section(
        "lists",
        json!({
            "ordered_lists": document.ordered_lists,
            "unordered_lists": document.unordered_lists,
            "total_lists": total_lists,
            "has_lists": total_lists > 0,
        }),
    );
}

fn check_tables(document: &MarkupDocument, builder: &mut ReportBuilder) {
    let table_count = document.tables;
    // Tables are optional: present is a strength, absent is not an issue.
    if table_count > 0 {
        builder.strength(format!("Found {table_count} tables (good for featured snippets)"));
    }

    builder.section(
        "tables",
        json!({
            "table_count": table_count,
            "has_tables": table_count > 0,
        }),
    );
}
