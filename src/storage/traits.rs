//! Store trait and error types
//!
//! The crawler only ever reads an entry by phone and inserts new entries; it
//! never updates or deletes.

use crate::model::{BusinessRecord, PersistedEntry, PhoneNumber};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response status {status}: {body}")]
    Status { status: u16, body: String },

    /// The store already holds an entry with this phone
    #[error("Duplicate phone: {0}")]
    DuplicatePhone(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to decode store response: {0}")]
    Decode(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent store of business entries keyed by phone
///
/// Implementations are shared between the orchestrator and the ingestion
/// gateway behind an `Arc`, so they must be usable through `&self`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Looks up the entry stored under exactly this phone
    async fn find_by_phone(&self, phone: &PhoneNumber) -> StoreResult<Option<PersistedEntry>>;

    /// Inserts a new entry and returns its id
    ///
    /// Returns [`StoreError::DuplicatePhone`] when the store enforces phone
    /// uniqueness and an entry with the same phone already exists.
    async fn insert(&self, record: &BusinessRecord) -> StoreResult<i64>;
}
