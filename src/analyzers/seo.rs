//! On-page SEO scoring.
//!
//! Checks meta tags, heading structure, content volume, image alt coverage,
//! and link structure. Each check appends to issues or strengths (never
//! both); the score is `100 - 5 * issues`, clamped to `[0, 100]`.

use serde_json::json;
use url::Url;

use crate::document::MarkupDocument;
use crate::report::{Dimension, DimensionReport, ReportBuilder};

const TITLE_MIN: usize = 30;
const TITLE_MAX: usize = 60;
const DESCRIPTION_MIN: usize = 120;
const DESCRIPTION_MAX: usize = 160;
const OG_TAGS_COMPLETE: usize = 4;
const MIN_WORD_COUNT: usize = 300;
const MIN_PARAGRAPHS: usize = 3;
const MIN_INTERNAL_LINKS: usize = 3;

/// Stateless on-page SEO analyzer. Reusable across audits; all per-call
/// accumulation lives in a local [`ReportBuilder`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SeoAnalyzer;

impl SeoAnalyzer {
    /// Scores one page. Never fails; internal errors degrade to a fixed
    /// score-50 report.
    pub fn analyze(&self, url: &str, document: &MarkupDocument) -> DimensionReport {
        match run_checks(url, document) {
            Ok(report) => report,
            Err(e) => {
                log::error!("SEO analysis error for {url}: {e}");
                DimensionReport::degraded(Dimension::Seo, &e.to_string())
            }
        }
    }
}

fn run_checks(url: &str, document: &MarkupDocument) -> anyhow::Result<DimensionReport> {
    let base_host = Url::parse(url)?
        .host_str()
        .map(str::to_string)
        .unwrap_or_default();

    let mut builder = ReportBuilder::new();
    check_meta_tags(document, &mut builder);
    check_headings(document, &mut builder);
    check_content(document, &mut builder);
    check_images(document, &mut builder);
    check_links(document, &base_host, &mut builder);
    Ok(builder.finish(Dimension::Seo))
}

fn check_meta_tags(document: &MarkupDocument, builder: &mut ReportBuilder) {
    let title = document.title.as_deref();
    let title_length = title.map(|t| t.chars().count()).unwrap_or(0);

    match title {
        None | Some("") => builder.issue("Missing page title"),
        Some(_) if title_length < TITLE_MIN => builder.issue(format!(
            "Title too short ({title_length} chars, recommended 50-60)"
        )),
        Some(_) if title_length > TITLE_MAX => builder.issue(format!(
            "Title too long ({title_length} chars, recommended 50-60)"
        )),
        Some(_) => builder.strength("Title length is optimal"),
    }

    // Tag presence and content presence are separate: a description tag
    // without content counts as missing.
    let description = document
        .meta_tag("description")
        .map(|tag| tag.content.as_deref().unwrap_or("").trim().to_string());
    let description_length = description.as_deref().map(|d| d.chars().count()).unwrap_or(0);

    match description.as_deref() {
        None | Some("") => builder.issue("Missing meta description"),
        Some(_) if description_length < DESCRIPTION_MIN => builder.issue(format!(
            "Meta description too short ({description_length} chars, recommended 150-160)"
        )),
        Some(_) if description_length > DESCRIPTION_MAX => builder.issue(format!(
            "Meta description too long ({description_length} chars, recommended 150-160)"
        )),
        Some(_) => builder.strength("Meta description length is optimal"),
    }

    let has_viewport = document.meta_tag("viewport").is_some();
    if has_viewport {
        builder.strength("Mobile viewport configured");
    } else {
        builder.issue("Missing viewport meta tag (not mobile-friendly)");
    }

    // Presence of a charset declaration earns nothing; only absence costs.
    let has_charset = document.has_charset();
    if !has_charset {
        builder.issue("Missing charset declaration");
    }

    let robots = document.meta_content("robots").unwrap_or("").to_string();

    let og_count = document.og_tag_count();
    if og_count == 0 {
        builder.issue("Missing Open Graph tags for social sharing");
    } else if og_count < OG_TAGS_COMPLETE {
        builder.issue(
            "Incomplete Open Graph tags (minimum: og:title, og:description, og:image, og:url)",
        );
    } else {
        builder.strength("Open Graph tags present for social sharing");
    }

    builder.section(
        "meta",
        json!({
            "title": title,
            "title_length": title_length,
            "description": description,
            "description_length": description_length,
            "viewport": has_viewport,
            "charset": has_charset,
            "robots": robots,
            "og_tags_count": og_count,
        }),
    );
}

fn check_headings(document: &MarkupDocument, builder: &mut ReportBuilder) {
    let h1_count = document.h1.len();
    match h1_count {
        0 => builder.issue("Missing H1 tag"),
        1 => builder.strength("Single H1 tag present"),
        n => builder.issue(format!("Multiple H1 tags found ({n}), should have only one")),
    }

    let h2_count = document.h2.len();
    let h3_count = document.h3.len();
    let h4_count = document.h4.len();
    if h2_count == 0 {
        builder.issue("No H2 tags found (poor content structure)");
    }

    builder.section(
        "headings",
        json!({
            "h1_count": h1_count,
            "h1_text": document.h1.first(),
            "h2_count": h2_count,
            "h3_count": h3_count,
            "h4_count": h4_count,
            "total_headings": h1_count + h2_count + h3_count + h4_count,
        }),
    );
}

fn check_content(document: &MarkupDocument, builder: &mut ReportBuilder) {
    let word_count = document.word_count();
    // Exactly 300 words sits in a dead band: neither issue nor strength.
    if word_count < MIN_WORD_COUNT {
        builder.issue(format!(
            "Low word count ({word_count} words, recommended 300+ for SEO)"
        ));
    } else if word_count > MIN_WORD_COUNT {
        builder.strength(format!("Good content length ({word_count} words)"));
    }

    let paragraph_count = document.paragraph_count;
    if paragraph_count < MIN_PARAGRAPHS {
        builder.issue("Limited paragraph content");
    }

    builder.section(
        "content",
        json!({
            "word_count": word_count,
            "paragraph_count": paragraph_count,
            "text_length": document.text.chars().count(),
        }),
    );
}

fn check_images(document: &MarkupDocument, builder: &mut ReportBuilder) {
    let total_images = document.image_alts.len();
    // An empty alt attribute counts as missing, same as no attribute.
    let images_without_alt = document
        .image_alts
        .iter()
        .filter(|alt| alt.as_deref().unwrap_or("").is_empty())
        .count();
    let images_with_alt = total_images - images_without_alt;

    if total_images > 0 {
        if images_without_alt > 0 {
            builder.issue(format!(
                "{images_without_alt} of {total_images} images missing alt text"
            ));
        } else {
            builder.strength("All images have alt text");
        }
    }

    let alt_coverage = if total_images > 0 {
        images_with_alt as f64 / total_images as f64 * 100.0
    } else {
        0.0
    };

    builder.section(
        "images",
        json!({
            "total_images": total_images,
            "images_with_alt": images_with_alt,
            "images_without_alt": images_without_alt,
            "alt_coverage": alt_coverage,
        }),
    );
}

fn check_links(document: &MarkupDocument, base_host: &str, builder: &mut ReportBuilder) {
    let total_links = document.anchor_hrefs.len();
    let mut internal_links = 0usize;
    let mut external_links = 0usize;

    for href in &document.anchor_hrefs {
        let href = href.trim();
        // Empty and fragment-only anchors are navigation noise, not links.
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        if href.starts_with("http") {
            let link_host = Url::parse(href)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_default();
            if link_host == base_host {
                internal_links += 1;
            } else {
                external_links += 1;
            }
        } else {
            // Relative URLs resolve against the audited host.
            internal_links += 1;
        }
    }

    if total_links == 0 {
        builder.issue("No links found on the page");
    } else if internal_links < MIN_INTERNAL_LINKS {
        builder.issue("Few internal links (poor site structure)");
    }

    builder.section(
        "links",
        json!({
            "total_links": total_links,
            "internal_links": internal_links,
            "external_links": external_links,
            "broken_links": 0,
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/";

    fn analyze(html: &str) -> DimensionReport {
        SeoAnalyzer.analyze(URL, &MarkupDocument::parse(html))
    }

    /// A page that trips none of the SEO checks.
    fn well_formed_page() -> String {
        let title = "x".repeat(55);
        let description = "d".repeat(140);
        let body_words = "word ".repeat(320);
        format!(
            r#"<html><head>
                <title>{title}</title>
                <meta charset="utf-8">
                <meta name="description" content="{description}">
                <meta name="viewport" content="width=device-width">
                <meta property="og:title" content="t">
                <meta property="og:description" content="d">
                <meta property="og:image" content="i">
                <meta property="og:url" content="u">
            </head><body>
                <h1>Heading</h1>
                <h2>Subheading</h2>
                <p>{body_words}</p><p>second paragraph</p><p>third paragraph</p>
                <a href="/one">1</a><a href="/two">2</a><a href="/three">3</a>
            </body></html>"#
        )
    }

    #[test]
    fn test_well_formed_page_scores_100() {
        let report = analyze(&well_formed_page());
        assert_eq!(report.issues, Vec::<String>::new());
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_analyze_is_idempotent_on_reused_instance() {
        let analyzer = SeoAnalyzer;
        let document = MarkupDocument::parse(&well_formed_page());
        let first = analyzer.analyze(URL, &document);
        let second = analyzer.analyze(URL, &document);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_title() {
        let report = analyze("<html><head></head><body><h2>x</h2></body></html>");
        assert!(report.issues.contains(&"Missing page title".to_string()));
    }

    #[test]
    fn test_empty_title_counts_as_missing() {
        let report = analyze("<html><head><title></title></head><body></body></html>");
        assert!(report.issues.contains(&"Missing page title".to_string()));
    }

    #[test]
    fn test_title_too_short_names_length() {
        let report = analyze("<html><head><title>Short</title></head><body></body></html>");
        assert!(report
            .issues
            .contains(&"Title too short (5 chars, recommended 50-60)".to_string()));
    }

    #[test]
    fn test_title_too_long() {
        let title = "y".repeat(61);
        let report = analyze(&format!("<html><head><title>{title}</title></head></html>"));
        assert!(report
            .issues
            .contains(&"Title too long (61 chars, recommended 50-60)".to_string()));
    }

    #[test]
    fn test_title_boundary_lengths_are_optimal() {
        for len in [30usize, 60] {
            let title = "z".repeat(len);
            let report = analyze(&format!("<html><head><title>{title}</title></head></html>"));
            assert!(
                report.strengths.contains(&"Title length is optimal".to_string()),
                "length {len} should be optimal"
            );
        }
    }

    #[test]
    fn test_meta_description_boundaries() {
        let case = |len: usize| {
            let description = "d".repeat(len);
            analyze(&format!(
                r#"<html><head><meta name="description" content="{description}"></head></html>"#
            ))
        };
        assert!(case(119).issues.contains(
            &"Meta description too short (119 chars, recommended 150-160)".to_string()
        ));
        assert!(case(120)
            .strengths
            .contains(&"Meta description length is optimal".to_string()));
        assert!(case(160)
            .strengths
            .contains(&"Meta description length is optimal".to_string()));
        assert!(case(161).issues.contains(
            &"Meta description too long (161 chars, recommended 150-160)".to_string()
        ));
    }

    #[test]
    fn test_charset_absence_is_issue_presence_is_silent() {
        let with = analyze(r#"<html><head><meta charset="utf-8"></head></html>"#);
        assert!(!with
            .issues
            .contains(&"Missing charset declaration".to_string()));
        // No strength either
        assert!(!with.strengths.iter().any(|s| s.contains("charset")));

        let without = analyze("<html><head></head></html>");
        assert!(without
            .issues
            .contains(&"Missing charset declaration".to_string()));
    }

    #[test]
    fn test_incomplete_open_graph_tags() {
        let report = analyze(
            r#"<html><head>
                <meta property="og:title" content="t">
                <meta property="og:image" content="i">
            </head></html>"#,
        );
        assert!(report.issues.iter().any(|i| i.starts_with("Incomplete Open Graph")));
    }

    #[test]
    fn test_multiple_h1_reports_count() {
        let report = analyze("<body><h1>a</h1><h1>b</h1><h1>c</h1></body>");
        assert!(report
            .issues
            .contains(&"Multiple H1 tags found (3), should have only one".to_string()));
    }

    #[test]
    fn test_word_count_dead_band_at_exactly_300() {
        let body = "w ".repeat(300);
        let report = analyze(&format!("<html><body><p>{body}</p></body></html>"));
        assert!(!report.issues.iter().any(|i| i.starts_with("Low word count")));
        assert!(!report
            .strengths
            .iter()
            .any(|s| s.starts_with("Good content length")));
    }

    #[test]
    fn test_image_alt_ratio_message() {
        let report = analyze(
            r#"<body><img src="a.png" alt="ok"><img src="b.png"><img src="c.png" alt=""></body>"#,
        );
        assert!(report
            .issues
            .contains(&"2 of 3 images missing alt text".to_string()));
    }

    #[test]
    fn test_all_images_with_alt_is_strength() {
        let report = analyze(r#"<body><img src="a.png" alt="one"><img src="b.png" alt="two"></body>"#);
        assert!(report
            .strengths
            .contains(&"All images have alt text".to_string()));
    }

    #[test]
    fn test_no_images_yields_neither() {
        let report = analyze("<body><p>text</p></body>");
        assert!(!report.issues.iter().any(|i| i.contains("images")));
        assert!(!report.strengths.iter().any(|s| s.contains("images")));
    }

    #[test]
    fn test_link_classification() {
        let html = r##"<body>
            <a href="/about">internal relative</a>
            <a href="https://example.com/page">internal absolute</a>
            <a href="https://other.com/page">external</a>
            <a href="#section">fragment, skipped</a>
            <a href="">empty, skipped</a>
        </body>"##;
        let report = analyze(html);
        let links = &report.sections["links"];
        // Fragment and empty hrefs still count toward the total
        assert_eq!(links["total_links"], 5);
        assert_eq!(links["internal_links"], 2);
        assert_eq!(links["external_links"], 1);
        assert!(report
            .issues
            .contains(&"Few internal links (poor site structure)".to_string()));
    }

    #[test]
    fn test_no_links_issue() {
        let report = analyze("<body><p>nothing to click</p></body>");
        assert!(report
            .issues
            .contains(&"No links found on the page".to_string()));
    }

    #[test]
    fn test_invalid_url_degrades() {
        let document = MarkupDocument::parse("<html><body></body></html>");
        let report = SeoAnalyzer.analyze("not a url", &document);
        assert_eq!(report.score, 50);
        assert_eq!(report.issues, vec!["Error analyzing SEO".to_string()]);
        assert!(report.strengths.is_empty());
    }

    #[test]
    fn test_alt_coverage_section_value() {
        let report = analyze(r#"<body><img alt="a"><img></body>"#);
        assert_eq!(report.sections["images"]["alt_coverage"], 50.0);
        let none = analyze("<body></body>");
        assert_eq!(none.sections["images"]["alt_coverage"], 0.0);
    }
}
