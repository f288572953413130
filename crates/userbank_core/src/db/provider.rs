//! Connection providers for repository calls.
//!
//! # Responsibility
//! - Supply a ready-to-use connection for the duration of one operation.
//! - Release the connection on every exit path, errors included.
//!
//! # Invariants
//! - Connections are only reachable inside the `with_connection` closure and
//!   are never held across calls by repositories.
//! - Pooling policy, credentials and transport belong to the provider, not
//!   to callers.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::error;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Source of database connections with scoped acquisition.
pub trait ConnectionProvider {
    /// Runs `f` with a live connection and releases it afterwards.
    ///
    /// Acquisition failures are converted into the caller's error type.
    fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>;
}

/// A caller-owned connection acts as its own provider.
impl ConnectionProvider for Connection {
    fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        f(self)
    }
}

impl<P: ConnectionProvider> ConnectionProvider for &P {
    fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        (**self).with_connection(f)
    }
}

/// Opens a fresh connection to a database file for every call.
#[derive(Debug, Clone)]
pub struct FileConnectionProvider {
    path: PathBuf,
}

impl FileConnectionProvider {
    /// Creates a provider and migrates the target database once up front.
    ///
    /// # Errors
    /// - Returns `DbError` when the file cannot be opened or migrated.
    pub fn new(path: impl Into<PathBuf>) -> DbResult<Self> {
        let path = path.into();
        drop(open_db(&path)?);
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionProvider for FileConnectionProvider {
    fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        let conn = open_db(&self.path).map_err(E::from)?;
        f(&conn)
    }
}

/// Shares one connection between callers, serialized by a mutex.
///
/// Mainly useful for in-memory databases, where opening a new connection
/// would yield a different, empty database.
#[derive(Debug)]
pub struct SharedConnectionProvider {
    conn: Mutex<Connection>,
}

impl SharedConnectionProvider {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Creates a provider over a freshly migrated in-memory database.
    pub fn in_memory() -> DbResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Returns the wrapped connection.
    pub fn into_inner(self) -> DbResult<Connection> {
        self.conn.into_inner().map_err(|err| poisoned(&err))
    }
}

impl ConnectionProvider for SharedConnectionProvider {
    fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        let guard = self.conn.lock().map_err(|err| E::from(poisoned(&err)))?;
        f(&guard)
    }
}

fn poisoned(err: &dyn std::fmt::Display) -> DbError {
    error!("event=db_acquire module=db status=error error_code=lock_poisoned error={err}");
    DbError::ConnectionUnavailable(err.to_string())
}
