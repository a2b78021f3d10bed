//! Database schema definitions
//!
//! This module contains the SQL schema for the local business store.

/// SQL schema for the database
///
/// `status` and `notes` belong to the review workflow; the crawler only
/// writes their defaults.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS businesses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT UNIQUE,
    address TEXT,
    area TEXT NOT NULL,
    population INTEGER NOT NULL DEFAULT 0,
    category TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Pendiente',
    notes TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_businesses_area ON businesses(area);
CREATE INDEX IF NOT EXISTS idx_businesses_category ON businesses(category);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
