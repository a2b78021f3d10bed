//! SQLite store implementation

use crate::model::{BusinessRecord, PersistedEntry, PhoneNumber};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Store, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const ENTRY_COLUMNS: &str = "id, name, phone, address, area, population, category";

/// SQLite store backend
///
/// The connection sits behind a mutex so the store can be shared as
/// `Arc<dyn Store>`; every call is short and synchronous.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates the database file and initializes the schema
    pub fn new(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection mutex poisoned".to_string()))
    }

    /// Gets total entry count
    pub fn count_entries(&self) -> StoreResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM businesses", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Counts entries per category, largest first
    pub fn count_by_category(&self) -> StoreResult<Vec<(String, u64)>> {
        self.count_grouped("category")
    }

    /// Counts entries per area, largest first
    pub fn count_by_area(&self) -> StoreResult<Vec<(String, u64)>> {
        self.count_grouped("area")
    }

    fn count_grouped(&self, column: &str) -> StoreResult<Vec<(String, u64)>> {
        let query = format!(
            "SELECT {column}, COUNT(*) AS count
             FROM businesses
             GROUP BY {column}
             ORDER BY count DESC, {column}"
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }

        Ok(counts)
    }

    /// Gets every entry in insertion order
    pub fn entries(&self) -> StoreResult<Vec<PersistedEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM businesses ORDER BY id"
        ))?;

        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<PersistedEntry> {
    Ok(PersistedEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        address: row.get(3)?,
        area: row.get(4)?,
        expected_population: row.get::<_, i64>(5)?.max(0) as u64,
        category: row.get(6)?,
    })
}

/// True when the error is a constraint violation (the unique phone index)
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl Store for SqliteStore {
    async fn find_by_phone(&self, phone: &PhoneNumber) -> StoreResult<Option<PersistedEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM businesses WHERE phone = ?1 LIMIT 1"
        ))?;

        let entry = stmt
            .query_row(params![phone.as_str()], entry_from_row)
            .optional()?;

        Ok(entry)
    }

    async fn insert(&self, record: &BusinessRecord) -> StoreResult<i64> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        let population = i64::try_from(record.expected_population).unwrap_or(i64::MAX);

        let result = conn.execute(
            "INSERT INTO businesses (name, phone, address, area, population, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.name,
                record.phone.as_str(),
                record.address,
                record.area,
                population,
                record.category,
                now
            ],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(e) if is_constraint_violation(&e) => {
                Err(StoreError::DuplicatePhone(record.phone.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
