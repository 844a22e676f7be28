//! Database connection management
//!
//! This module provides the single long-lived connection used by studentdb.

use crate::error::{Result, StudentDbError};
use rusqlite::Connection;
use tracing::{debug, warn};

/// Core database connection wrapper
///
/// `DatabaseConn` owns exactly one SQLite connection for the lifetime of the
/// process. The connection runs in autocommit mode; grouped statements open
/// their own transaction on the borrowed [`Connection`]. Closing is explicit and idempotent,
/// and dropping the wrapper releases the connection on every other path.
#[derive(Debug)]
pub struct DatabaseConn {
    conn: Option<Connection>,
}

impl DatabaseConn {
    /// Open a database at the specified path
    ///
    /// If the path is `None`, an in-memory database is created.
    pub fn open(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(p) => Connection::open(p).map_err(|e| {
                StudentDbError::Connection(format!("Failed to open database at '{}': {}", p, e))
            })?,
            None => Connection::open_in_memory().map_err(|e| {
                StudentDbError::Connection(format!("Failed to create in-memory database: {}", e))
            })?,
        };

        let db = DatabaseConn { conn: Some(conn) };
        db.configure()?;
        debug!("database connection opened ({})", path.unwrap_or(":memory:"));
        Ok(db)
    }

    /// Open a database at the specified path (convenience method)
    pub fn open_path(path: &str) -> Result<Self> {
        Self::open(Some(path))
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(None)
    }

    fn configure(&self) -> Result<()> {
        let conn = self.conn()?;

        // in-memory databases answer "memory" here, which is fine
        let _: String = conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
            .map_err(|e| StudentDbError::Connection(format!("Failed to set journal mode: {}", e)))?;

        conn.execute("PRAGMA synchronous=NORMAL", [])
            .map_err(|e| {
                StudentDbError::Connection(format!("Failed to set synchronous mode: {}", e))
            })?;

        Ok(())
    }

    /// Borrow the underlying connection
    ///
    /// Fails with [`StudentDbError::Connection`] once the connection is closed.
    pub fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| StudentDbError::Connection("database connection is closed".to_string()))
    }

    /// Whether the connection is still open
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Close the connection
    ///
    /// Calling this more than once is a no-op.
    pub fn close(&mut self) -> Result<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        conn.close().map_err(|(_, e)| {
            warn!("database connection did not close cleanly: {}", e);
            StudentDbError::Connection(format!("Failed to close database: {}", e))
        })?;
        debug!("database connection closed");
        Ok(())
    }
}
