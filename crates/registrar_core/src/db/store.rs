//! Owned store handle with an explicit open/close lifecycle.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;

/// Process-wide store handle.
///
/// Constructed once at startup and borrowed by repositories through
/// [`Store::connection`]. Dropping the handle also closes the connection,
/// but [`Store::close`] reports close failures instead of swallowing them.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) a file-backed store with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens an empty in-memory store with migrations applied.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Borrowed connection for repository construction.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the underlying connection.
    pub fn close(self) -> DbResult<()> {
        match self.conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                error!("event=db_close module=db status=error error={err}");
                Err(DbError::Sqlite(err))
            }
        }
    }
}
