//! End-to-end pipeline tests against canned HTML.
//!
//! No network: a stub `Fetcher` serves fixtures, and recommendations come
//! from the deterministic local source.

use std::sync::Arc;

use async_trait::async_trait;

use site_audit::storage::{get_audit, init_db_pool_with_path, insert_audit, list_audits};
use site_audit::{
    AuditEngine, AuditStatus, Dimension, Fetcher, Priority, Synthesizer,
};

struct FixtureFetcher(&'static str);

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, _url: &str) -> anyhow::Result<String> {
        Ok(self.0.to_string())
    }
}

struct FailingFetcher;

#[async_trait]
impl Fetcher for FailingFetcher {
    async fn fetch(&self, _url: &str) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("Failed to fetch website content"))
    }
}

fn engine(html: &'static str) -> AuditEngine {
    AuditEngine::new(Arc::new(FixtureFetcher(html)), Synthesizer::new(None))
}

const SPARSE_PAGE: &str = "<html><head></head><body><p>hello</p></body></html>";

const RICH_PAGE: &str = r#"<html><head>
    <title>Riverside Plumbing | Emergency Plumbers in Portland Area</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Riverside Plumbing offers 24/7 emergency plumbing across Portland. Licensed, insured, and trusted by thousands of local homeowners for repairs and installs.">
    <meta property="og:title" content="Riverside Plumbing">
    <meta property="og:description" content="Emergency plumbers">
    <meta property="og:image" content="https://example.com/og.png">
    <meta property="og:url" content="https://example.com/">
    <script type="application/ld+json">{"@type": "LocalBusiness", "name": "Riverside Plumbing"}</script>
</head><body>
    <h1>Riverside Plumbing</h1>
    <h2>What services do we offer?</h2>
    <ul><li>Drain cleaning</li><li>Water heaters</li></ul>
    <p>Call (503) 555-0142 or email help@riverside.example for service at 1200 River Street, Portland.</p>
    <p>Open Monday to Friday 8:00 to 17:00.</p>
    <a href="/about">About</a> <a href="/contact">Contact</a> <a href="/services">Services</a>
</body></html>"#;

#[tokio::test]
async fn test_sparse_page_scores_low_and_recommends() {
    let result = engine(SPARSE_PAGE).run_audit("https://example.com").await;

    assert_eq!(result.status, AuditStatus::Completed);
    assert!(result.seo_score < 80);
    assert!(result.aeo_score < 80);
    assert!(result.geo_score < 80);

    // The local source caps categories at 3 SEO / 2 AEO / 2 GEO
    assert!(!result.recommendations.is_empty());
    assert!(result.recommendations.len() <= 7);
    let seo_count = result
        .recommendations
        .iter()
        .filter(|r| r.category == Dimension::Seo)
        .count();
    assert!(seo_count <= 3);
    assert!(result
        .recommendations
        .iter()
        .filter(|r| r.category == Dimension::Seo)
        .all(|r| r.priority == Priority::High));
}

#[tokio::test]
async fn test_rich_page_outscores_sparse_page() {
    let rich = engine(RICH_PAGE).run_audit("https://example.com").await;
    let sparse = engine(SPARSE_PAGE).run_audit("https://example.com").await;

    assert!(rich.seo_score > sparse.seo_score);
    assert!(rich.aeo_score > sparse.aeo_score);
    assert!(rich.geo_score > sparse.geo_score);
    assert!(rich
        .geo_details
        .strengths
        .iter()
        .any(|s| s.contains("LocalBusiness")));
}

#[tokio::test]
async fn test_fetch_failure_produces_failed_result() {
    let engine = AuditEngine::new(Arc::new(FailingFetcher), Synthesizer::new(None));
    let result = engine.run_audit("https://down.example").await;

    assert_eq!(result.status, AuditStatus::Failed);
    assert_eq!(result.seo_score, 0);
    assert!(result.recommendations.is_empty());
    assert!(result
        .error
        .as_deref()
        .unwrap_or("")
        .contains("Failed to fetch website content"));
}

#[tokio::test]
async fn test_audit_persists_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_db_pool_with_path(&dir.path().join("audits.db"))
        .await
        .unwrap();

    let result = engine(RICH_PAGE).run_audit("https://example.com").await;
    insert_audit(&pool, &result).await.unwrap();

    let loaded = get_audit(&pool, &result.audit_id).await.unwrap().unwrap();
    assert_eq!(loaded, result);

    let history = list_audits(&pool, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].audit_id, result.audit_id);
    assert_eq!(history[0].seo_score, result.seo_score);
}

#[tokio::test]
async fn test_quick_audit_matches_full_audit_scores() {
    let full = engine(RICH_PAGE).run_audit("https://example.com").await;
    let quick = engine(RICH_PAGE).quick_audit("https://example.com").await;

    assert_eq!(quick.status, AuditStatus::Completed);
    assert_eq!(quick.seo_score, full.seo_score);
    assert_eq!(quick.aeo_score, full.aeo_score);
    assert_eq!(quick.geo_score, full.geo_score);
}
