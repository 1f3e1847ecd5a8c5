pub mod migrations;
pub mod models;
pub mod queries;
pub mod values;

pub use values::Values;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Handle to the provider's backing store. A single connection guarded by
/// a mutex serializes writers; WAL keeps concurrent readers off the lock
/// at the SQLite level. The provider layer above holds no state of its
/// own, so this is the only synchronization in the write path.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with the connection held. A poisoned lock (a panic while
    /// holding the connection) surfaces as an error on every later call
    /// rather than a panic, so a wedged writer fails queries instead of
    /// taking the process down.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("connection lock poisoned: {}", e))?;
        f(&conn)
    }
}
