//! Error types and failure counters.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Report payload could not be (de)serialized.
    #[error("Report serialization error: {0}")]
    SerializationError(String),
}

/// Failure modes tracked across one process lifetime.
///
/// Each variant is a recoverable condition the audit pipeline absorbs
/// rather than propagates; the counters make those absorptions visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// The plain GET failed at the transport level.
    StaticFetchError,
    /// The static body was a client-side shell below the text threshold.
    ThinStaticContent,
    /// The render-service fallback failed.
    RenderFetchError,
    /// The reasoning service failed and local recommendations were used.
    ReasoningServiceFallback,
    /// An audit result could not be written to the database.
    PersistenceError,
}

impl ErrorType {
    /// Human-readable label for reports and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::StaticFetchError => "Static fetch error",
            ErrorType::ThinStaticContent => "Thin static content",
            ErrorType::RenderFetchError => "Render fetch error",
            ErrorType::ReasoningServiceFallback => "Reasoning service fallback",
            ErrorType::PersistenceError => "Persistence error",
        }
    }
}

/// Thread-safe error statistics tracker.
///
/// Tracks the count of each error type using atomic counters. All error
/// types are initialized to zero on creation, so lookups never miss.
pub struct ErrorStats {
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl ErrorStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        ErrorStats { errors }
    }

    /// Adds one to the counter for `error`.
    pub fn increment(&self, error: ErrorType) {
        // All ErrorType variants are initialized in new(), so unwrap() is safe
        self.errors
            .get(&error)
            .unwrap()
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for `error`.
    pub fn get_count(&self, error: ErrorType) -> usize {
        // All ErrorType variants are initialized in new(), so unwrap() is safe
        self.errors.get(&error).unwrap().load(Ordering::SeqCst)
    }
}

impl Default for ErrorStats {
    fn default() -> Self {
        ErrorStats::new()
    }
}
