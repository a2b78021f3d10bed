//! Ingestion gateway
//!
//! Writes validated business records to the store, at most one entry per
//! phone. Store failures are logged with the record's name and reported as an
//! outcome; they never propagate to the caller.

use crate::model::BusinessRecord;
use crate::state::CardOutcome;
use crate::storage::{Store, StoreError};
use std::sync::Arc;

/// Result of ingesting one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A new entry was created with this id
    Inserted(i64),
    /// An entry with the same phone already exists
    Duplicate,
    /// The lookup or insert failed
    Failed,
}

impl From<IngestOutcome> for CardOutcome {
    fn from(outcome: IngestOutcome) -> Self {
        match outcome {
            IngestOutcome::Inserted(_) => CardOutcome::Saved,
            IngestOutcome::Duplicate => CardOutcome::Duplicate,
            IngestOutcome::Failed => CardOutcome::StoreError,
        }
    }
}

/// Lookup-then-insert front of the persistent store
#[derive(Clone)]
pub struct IngestionGateway {
    store: Arc<dyn Store>,
}

impl IngestionGateway {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Ingests one record
    ///
    /// Skips the record when its phone is already stored. An insert rejected
    /// by the store's uniqueness constraint (another writer got there between
    /// the lookup and the insert) also counts as a duplicate.
    pub async fn ingest(&self, record: &BusinessRecord) -> IngestOutcome {
        tracing::debug!("Ingesting {} ({})", record.name, record.phone);

        match self.store.find_by_phone(&record.phone).await {
            Ok(Some(existing)) => {
                tracing::info!(
                    "[SKIP] {} already stored with phone {} (id {})",
                    record.name,
                    record.phone,
                    existing.id
                );
                return IngestOutcome::Duplicate;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Could not check phone for {}: {}", record.name, e);
                return IngestOutcome::Failed;
            }
        }

        match self.store.insert(record).await {
            Ok(id) => {
                tracing::info!("[SAVED] {} ({})", record.name, record.phone);
                IngestOutcome::Inserted(id)
            }
            Err(StoreError::DuplicatePhone(phone)) => {
                tracing::info!(
                    "[SKIP] {} already stored with phone {} (insert conflict)",
                    record.name,
                    phone
                );
                IngestOutcome::Duplicate
            }
            Err(e) => {
                tracing::error!("Could not save {}: {}", record.name, e);
                IngestOutcome::Failed
            }
        }
    }
}
