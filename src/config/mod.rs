//! Configuration module for Barrio-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use barrio_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Locations to search: {}", config.location_tasks().len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, LocationEntry, PaginationMode, SearchConfig, StoreBackend, StoreConfig,
    DEFAULT_CATEGORY,
};

// Re-export parser functions
pub use parser::{load_config, load_config_with_hash};

pub(crate) use validation::validate_http_url;
