//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `site_audit` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::Colorize;
use strum::IntoEnumIterator;

use site_audit::config::{RENDER_TOKEN_ENV, RENDER_URL_ENV};
use site_audit::error_handling::{ErrorStats, ErrorType};
use site_audit::initialization::{init_client, init_logger_with};
use site_audit::storage::{insert_audit, list_audits};
use site_audit::{
    AuditEngine, AuditResult, AuditStatus, Config, OpenAiService, PageFetcher, RemoteSource,
    RenderClient, Synthesizer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env (current directory first, then
    // next to the executable) so credentials don't need manual exporting
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Some(limit) = config.history {
        return show_history(&config, limit).await;
    }

    let url = match &config.url {
        Some(url) => url.clone(),
        None => {
            eprintln!("site_audit error: a URL is required unless --history is given");
            process::exit(2);
        }
    };

    let stats = Arc::new(ErrorStats::new());
    let engine = build_engine(&config, Arc::clone(&stats))?;

    if config.quick {
        let quick = engine.quick_audit(&url).await;
        println!(
            "{}  SEO {}  AEO {}  GEO {}",
            quick.url,
            score_colored(quick.seo_score),
            score_colored(quick.aeo_score),
            score_colored(quick.geo_score)
        );
        if quick.status == AuditStatus::Failed {
            eprintln!(
                "site_audit error: {}",
                quick.error.as_deref().unwrap_or("audit failed")
            );
            process::exit(1);
        }
        return Ok(());
    }

    let result = engine.run_audit(&url).await;

    let pool = site_audit::storage::init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to open audit database")?;
    if let Err(e) = insert_audit(&pool, &result).await {
        stats.increment(ErrorType::PersistenceError);
        log::error!("Failed to store audit {}: {e}", result.audit_id);
    }

    print_result(&result);

    for error in ErrorType::iter() {
        let count = stats.get_count(error);
        if count > 0 {
            log::debug!("{}: {count}", error.as_str());
        }
    }

    if result.status == AuditStatus::Failed {
        eprintln!(
            "site_audit error: {}",
            result.error.as_deref().unwrap_or("audit failed")
        );
        process::exit(1);
    }
    Ok(())
}

fn build_engine(config: &Config, stats: Arc<ErrorStats>) -> Result<AuditEngine> {
    let render = match config
        .render_url
        .clone()
        .or_else(|| std::env::var(RENDER_URL_ENV).ok())
    {
        Some(base_url) => {
            let token = std::env::var(RENDER_TOKEN_ENV).unwrap_or_default();
            Some(
                RenderClient::new(base_url, token)
                    .map_err(|e| anyhow!("Failed to build render client: {e}"))?,
            )
        }
        None => None,
    };

    let client = init_client(config).context("Failed to build HTTP client")?;
    let fetcher = PageFetcher::new(client, render, Arc::clone(&stats));

    let primary = OpenAiService::from_env().map(|service| {
        Box::new(RemoteSource::new(Arc::new(service))) as Box<dyn site_audit::RecommendationSource>
    });
    let synthesizer = Synthesizer::new(primary).with_stats(stats);

    Ok(AuditEngine::new(Arc::new(fetcher), synthesizer))
}

async fn show_history(config: &Config, limit: u32) -> Result<()> {
    let pool = site_audit::storage::init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to open audit database")?;
    let audits = list_audits(&pool, limit).await?;

    if audits.is_empty() {
        println!("No stored audits in {}", config.db_path.display());
        return Ok(());
    }

    for audit in audits {
        println!(
            "{}  {}  SEO {}  AEO {}  GEO {}  [{}]",
            audit.audit_id,
            audit.url,
            score_colored(audit.seo_score),
            score_colored(audit.aeo_score),
            score_colored(audit.geo_score),
            audit.status
        );
    }
    Ok(())
}

fn score_colored(score: u8) -> colored::ColoredString {
    let text = format!("{score:>3}");
    match score {
        80..=100 => text.green(),
        50..=79 => text.yellow(),
        _ => text.red(),
    }
}

fn print_result(result: &AuditResult) {
    println!("\n{} {}", "Audit".bold(), result.url.bold());
    println!(
        "  SEO {}   AEO {}   GEO {}",
        score_colored(result.seo_score),
        score_colored(result.aeo_score),
        score_colored(result.geo_score)
    );

    for (name, report) in [
        ("SEO", &result.seo_details),
        ("AEO", &result.aeo_details),
        ("GEO", &result.geo_details),
    ] {
        if !report.issues.is_empty() {
            println!("\n  {name} issues:");
            for issue in &report.issues {
                println!("    - {issue}");
            }
        }
    }

    if !result.recommendations.is_empty() {
        println!("\n  Recommendations:");
        for rec in &result.recommendations {
            println!(
                "    [{}/{}] {} -> {}",
                rec.category, rec.priority, rec.issue, rec.solution
            );
        }
    }
    println!("\nStored as {}", result.audit_id);
}
