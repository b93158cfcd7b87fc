//! # Backing Store
//!
//! SQLite database that holds both the endpoint definitions and the tables
//! the registered templates operate on.
//!
//! There is no pool. Every caller gets its own connection from
//! [`Database::connect`] and drops it when the request is done.

mod errors;
pub mod value;

pub use errors::{StoreError, StoreResult};

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

/// Default busy timeout for contended write transactions
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

const BOOTSTRAP_SQL: &str = "
    CREATE TABLE IF NOT EXISTS dynamic_endpoints (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        endpoint_name TEXT NOT NULL,
        method        TEXT NOT NULL,
        credential    TEXT NOT NULL,
        sql_template  TEXT NOT NULL,
        created_at    TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_dynamic_endpoints_lookup
        ON dynamic_endpoints (endpoint_name, method, credential);
";

/// Connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Handle to the primary database file. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    config: DatabaseConfig,
}

impl Database {
    /// Open the database, creating the file and the endpoint table if needed.
    pub fn open(config: DatabaseConfig) -> StoreResult<Self> {
        let db = Self { config };
        let conn = db.connect()?;
        conn.execute_batch(BOOTSTRAP_SQL)?;
        Ok(db)
    }

    /// Path of the primary database file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Open a fresh connection.
    pub fn connect(&self) -> StoreResult<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let display = self.config.path.display().to_string();

        let conn = Connection::open_with_flags(&self.config.path, flags)
            .map_err(|e| StoreError::open(display.as_str(), e))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| StoreError::open(display.as_str(), e))?;
        conn.busy_timeout(Duration::from_millis(self.config.busy_timeout_ms))
            .map_err(|e| StoreError::open(display.as_str(), e))?;

        Ok(conn)
    }
}
