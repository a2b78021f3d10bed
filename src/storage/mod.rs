//! Storage module for persisting business entries
//!
//! This module handles the persistent store the ingestion gateway writes to:
//! - the [`Store`] interface (lookup by phone, insert)
//! - a local SQLite backend with a unique phone constraint
//! - a Supabase backend shared with the review dashboard

mod schema;
mod sqlite;
mod supabase;
mod traits;

pub use sqlite::SqliteStore;
pub use supabase::SupabaseStore;
pub use traits::{Store, StoreError, StoreResult};

use crate::config::{validate_http_url, StoreBackend, StoreConfig};
use crate::{ConfigError, Result};
use std::path::Path;
use std::sync::Arc;

/// Environment variable that overrides `supabase-url`
pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";

/// Opens the configured store and checks that it is reachable
///
/// Any failure here is an initialization failure and halts the run.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn Store>> {
    match config.backend {
        StoreBackend::Sqlite => {
            let path = config
                .database_path
                .as_deref()
                .ok_or_else(|| ConfigError::Validation("database-path is not set".to_string()))?;

            tracing::info!("Opening SQLite store at {}", path);
            Ok(Arc::new(SqliteStore::new(Path::new(path))?))
        }
        StoreBackend::Supabase => {
            let url = std::env::var(SUPABASE_URL_ENV)
                .ok()
                .or_else(|| config.supabase_url.clone())
                .ok_or_else(|| ConfigError::MissingSecret(SUPABASE_URL_ENV.to_string()))?;
            validate_http_url("supabase-url", &url)?;

            let api_key = std::env::var(&config.api_key_env)
                .map_err(|_| ConfigError::MissingSecret(config.api_key_env.clone()))?;

            let store = SupabaseStore::new(&url, api_key, &config.table);
            store.ping().await?;

            tracing::info!("Connected to Supabase table '{}'", config.table);
            Ok(Arc::new(store))
        }
    }
}
