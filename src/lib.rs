//! Barrio-Scout: a local business directory crawler
//!
//! This crate drives a headless browser through map-search result lists, one
//! (category, area) search at a time, extracts contact records from each result's
//! detail view and ingests them into a persistent store without phone duplicates.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Barrio-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Storage error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("Detail view still shows the previous card after opening card {0}")]
    StaleDetail(usize),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::SessionPhase,
        to: state::SessionPhase,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing secret: environment variable {0} is not set")]
    MissingSecret(String),
}

/// Result type alias for Barrio-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{BusinessRecord, Candidate, LocationTask, PhoneNumber};
pub use state::{CardOutcome, SessionPhase};
