//! Configuration constants and CLI options.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Default SQLite database file for audit history.
pub const DB_PATH: &str = "./site_audit.db";

/// Default User-Agent string for static page fetches.
///
/// A mainstream browser UA keeps bot-wary sites from serving degraded or
/// empty markup. Users can override it via the `--user-agent` flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Static GET timeout in seconds.
pub const STATIC_FETCH_TIMEOUT_SECS: u64 = 10;

/// Render-service request timeout in seconds. Rendering runs scripts, so it
/// gets a longer budget than the static fetch.
pub const RENDER_TIMEOUT_SECS: u64 = 30;

/// Minimum stripped-text length for a static body to count as rendered
/// content. Anything shorter is treated as a client-side shell.
pub const MIN_RENDERED_TEXT_LEN: usize = 500;

/// Maximum accepted input URL length.
pub const MAX_URL_LENGTH: usize = 2048;

/// Environment variable naming the render-service base URL.
pub const RENDER_URL_ENV: &str = "RENDER_SERVICE_URL";

/// Environment variable holding the render-service access token.
pub const RENDER_TOKEN_ENV: &str = "RENDER_SERVICE_TOKEN";

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
#[derive(Debug, Clone, Parser)]
#[command(name = "site_audit", about = "SEO/AEO/GEO website audit tool")]
pub struct Config {
    /// URL to audit (scheme optional; https assumed)
    pub url: Option<String>,

    /// Scores only, skip recommendation synthesis
    #[arg(long)]
    pub quick: bool,

    /// Show the N most recent stored audits instead of running one
    #[arg(long, value_name = "N")]
    pub history: Option<u32>,

    /// Database path (SQLite file)
    #[arg(long, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Static fetch timeout in seconds
    #[arg(long, default_value_t = STATIC_FETCH_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Render service base URL (overrides RENDER_SERVICE_URL)
    #[arg(long)]
    pub render_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["site_audit", "example.com"]);
        assert_eq!(config.url.as_deref(), Some("example.com"));
        assert!(!config.quick);
        assert_eq!(config.timeout_seconds, STATIC_FETCH_TIMEOUT_SECS);
        assert_eq!(config.db_path, PathBuf::from(DB_PATH));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_history_flag_without_url() {
        let config = Config::parse_from(["site_audit", "--history", "10"]);
        assert_eq!(config.history, Some(10));
        assert!(config.url.is_none());
    }

    #[test]
    fn test_flag_overrides() {
        let config = Config::parse_from([
            "site_audit",
            "example.com",
            "--quick",
            "--timeout-seconds",
            "20",
            "--log-level",
            "debug",
        ]);
        assert!(config.quick);
        assert_eq!(config.timeout_seconds, 20);
        assert!(matches!(config.log_level, LogLevel::Debug));
    }
}
