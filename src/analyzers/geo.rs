//! Local / generative-engine optimization scoring.
//!
//! Checks the signals that drive local-pack and maps visibility: location
//! keywords, embedded maps, business hours, NAP (name/address/phone)
//! completeness, about/contact navigation, and LocalBusiness schema.
//! Score is `100 - 7 * issues`, clamped.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;
use url::Url;

use crate::document::MarkupDocument;
use crate::report::{Dimension, DimensionReport, ReportBuilder};

const LOCATION_KEYWORDS: &[&str] = &["location", "address", "city", "state", "near me", "local"];
const ADDRESS_KEYWORDS: &[&str] = &["street", "avenue", "road", "blvd", "suite", "building"];

static MAP_EMBED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)google\.com/maps").expect("Failed to compile map pattern - this is a bug")
});

// A weekday token followed, anywhere later in the text, by an HH:MM time.
// Deliberately loose: co-occurrence, not proximity.
static HOURS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(mon|tue|wed|thu|fri|sat|sun|monday|tuesday|wednesday|thursday|friday|saturday|sunday).*\d{1,2}:\d{2}",
    )
    .expect("Failed to compile hours pattern - this is a bug")
});

// North-American phone numbers: area code, exchange, subscriber.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})")
        .expect("Failed to compile phone pattern - this is a bug")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b")
        .expect("Failed to compile email pattern - this is a bug")
});

/// Stateless local-search signal analyzer.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoAnalyzer;

impl GeoAnalyzer {
    /// Scores one page. Never fails; internal errors degrade to a fixed
    /// score-50 report.
    pub fn analyze(&self, url: &str, document: &MarkupDocument) -> DimensionReport {
        match run_checks(url, document) {
            Ok(report) => report,
            Err(e) => {
                log::error!("GEO analysis error for {url}: {e}");
                DimensionReport::degraded(Dimension::Geo, &e.to_string())
            }
        }
    }
}

fn run_checks(url: &str, document: &MarkupDocument) -> anyhow::Result<DimensionReport> {
    let domain = Url::parse(url)?
        .host_str()
        .map(str::to_string)
        .unwrap_or_default();

    let mut builder = ReportBuilder::new();
    check_local_signals(document, &mut builder);
    check_contact_info(document, &mut builder);
    check_business_info(document, &domain, &mut builder);
    check_local_schema(document, &mut builder);
    Ok(builder.finish(Dimension::Geo))
}

fn check_local_signals(document: &MarkupDocument, builder: &mut ReportBuilder) {
    let text = document.text.to_lowercase();

    let location_mentions: usize = LOCATION_KEYWORDS
        .iter()
        .map(|keyword| text.matches(keyword).count())
        .sum();
    if location_mentions > 0 {
        builder.strength(format!("Found {location_mentions} location-related mentions"));
    } else {
        builder.issue("No clear location signals found");
    }

    let has_map_embed = document
        .iframe_srcs
        .iter()
        .any(|src| MAP_EMBED_PATTERN.is_match(src));
    if has_map_embed {
        builder.strength("Google Maps embedded on page");
    } else {
        builder.issue("No embedded Google Maps found");
    }

    let has_business_hours = HOURS_PATTERN.is_match(&text);
    if has_business_hours {
        builder.strength("Business hours information present");
    } else {
        builder.issue("No business hours information found");
    }

    builder.section(
        "local_signals",
        json!({
            "location_mentions": location_mentions,
            "has_map_embed": has_map_embed,
            "has_business_hours": has_business_hours,
        }),
    );
}

fn check_contact_info(document: &MarkupDocument, builder: &mut ReportBuilder) {
    let phone_count = PHONE_PATTERN.find_iter(&document.text).count();
    if phone_count > 0 {
        builder.strength(format!("Phone number(s) found: {phone_count}"));
    } else {
        builder.issue("No phone number detected");
    }

    let email_count = EMAIL_PATTERN.find_iter(&document.text).count();
    if email_count > 0 {
        builder.strength(format!("Email address(es) found: {email_count}"));
    } else {
        builder.issue("No email address found");
    }

    let text = document.text.to_lowercase();
    let has_address = ADDRESS_KEYWORDS
        .iter()
        .any(|keyword| text.contains(keyword));
    if has_address {
        builder.strength("Address information detected");
    } else {
        builder.issue("No clear address information found");
    }

    builder.section(
        "contact_info",
        json!({
            "phone_count": phone_count,
            "email_count": email_count,
            "has_address": has_address,
            "nap_complete": phone_count > 0 && has_address,
        }),
    );
}

fn check_business_info(document: &MarkupDocument, domain: &str, builder: &mut ReportBuilder) {
    // Name comes from the title (text before the first "|", then before the
    // first "-"); the first H1 is the fallback only when there is no
    // <title> element at all.
    let business_name: Option<String> = match &document.title {
        Some(title) => {
            let candidate = title
                .split('|')
                .next()
                .unwrap_or("")
                .split('-')
                .next()
                .unwrap_or("")
                .trim();
            (!candidate.is_empty()).then(|| candidate.to_string())
        }
        None => document
            .h1
            .first()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty()),
    };

    if business_name.is_some() {
        builder.strength("Business name clearly identified");
    } else {
        builder.issue("Business name not clearly identified");
    }

    let has_about_page = document
        .anchor_hrefs
        .iter()
        .any(|href| href.to_lowercase().contains("/about"));
    if has_about_page {
        builder.strength("About page link found");
    }

    let has_contact_page = document
        .anchor_hrefs
        .iter()
        .any(|href| href.to_lowercase().contains("/contact"));
    if has_contact_page {
        builder.strength("Contact page link found");
    }

    builder.section(
        "business_info",
        json!({
            "business_name": business_name,
            "domain": domain,
            "has_about_page": has_about_page,
            "has_contact_page": has_contact_page,
        }),
    );
}

fn check_local_schema(document: &MarkupDocument, builder: &mut ReportBuilder) {
    let mut has_local_business = false;
    let mut has_organization = false;

    // Only top-level objects are inspected; arrays and malformed blocks are
    // skipped. The substring test also catches subtypes like
    // "MedicalOrganization" or ["Store", "LocalBusiness"].
    for block in &document.json_ld_blocks {
        let Ok(serde_json::Value::Object(object)) = serde_json::from_str(block) else {
            continue;
        };
        let schema_type = object
            .get("@type")
            .map(type_repr)
            .unwrap_or_default();

        if schema_type.contains("LocalBusiness") {
            has_local_business = true;
            builder.strength("LocalBusiness schema found");
        }
        if schema_type.contains("Organization") {
            has_organization = true;
            builder.strength("Organization schema found");
        }
    }

    if !has_local_business && !has_organization {
        builder.issue("No LocalBusiness or Organization schema found");
    }

    builder.section(
        "schema",
        json!({
            "has_local_business_schema": has_local_business,
            "has_organization_schema": has_organization,
        }),
    );
}

fn type_repr(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
