//! Process-scoped record store handles.
//!
//! # Responsibility
//! - Own the single SQLite connection shared by every request.
//! - Open that connection lazily, exactly once per process.
//!
//! # Invariants
//! - Concurrent first callers of `LazyRecordStore::get` run one initializer;
//!   the rest wait for its result instead of opening their own connection.
//! - A failed initialization leaves the handle empty so the next call retries.
//! - Store access is serialized through one mutex per process.
//! - The record schema is checked once, when the store is opened.

use crate::db::{open_location, DbError, DbLocation, DbResult};
use crate::repo::record_repo::SqliteRecordRepository;
use crate::service::record_service::{RecordService, RecordServiceResult};
use log::{info, warn};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, PoisonError};

/// Opened, migrated record store.
pub struct RecordStore {
    location: DbLocation,
    conn: Mutex<Connection>,
}

impl RecordStore {
    /// Opens the store, applies migrations and checks the record schema.
    ///
    /// # Errors
    /// - `SchemaMismatch` when the migrated file lacks the expected layout.
    pub fn open(location: &DbLocation) -> DbResult<Self> {
        let conn = open_location(location)?;
        if let Err(err) = SqliteRecordRepository::try_new(&conn) {
            return Err(DbError::SchemaMismatch(err.to_string()));
        }
        Ok(Self {
            location: location.clone(),
            conn: Mutex::new(conn),
        })
    }

    /// Returns where this store was opened from.
    pub fn location(&self) -> &DbLocation {
        &self.location
    }

    /// Runs `f` against a record service bound to the shared connection.
    ///
    /// Blocks the calling thread while another caller holds the connection.
    pub fn with_service<T>(
        &self,
        f: impl FnOnce(&RecordService<SqliteRecordRepository<'_>>) -> RecordServiceResult<T>,
    ) -> RecordServiceResult<T> {
        // Poison is ignored: every statement is atomic on the SQLite side.
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&RecordService::new(SqliteRecordRepository::from_checked(&conn)))
    }
}

/// Record store that connects on first use.
pub struct LazyRecordStore {
    location: Option<DbLocation>,
    cell: OnceCell<Arc<RecordStore>>,
}

impl LazyRecordStore {
    /// Creates an empty handle. `None` means no connection string was configured;
    /// every `get` then fails with [`DbError::NotConfigured`].
    pub fn new(location: Option<DbLocation>) -> Self {
        Self {
            location,
            cell: OnceCell::new(),
        }
    }

    /// Wraps an already-open store.
    pub fn ready(store: RecordStore) -> Self {
        let location = Some(store.location().clone());
        Self {
            location,
            cell: OnceCell::with_value(Arc::new(store)),
        }
    }

    /// Returns the shared store, opening it on first call.
    ///
    /// # Errors
    /// - `NotConfigured` when no location was supplied.
    /// - Any open/migration failure; the next call retries.
    pub fn get(&self) -> DbResult<Arc<RecordStore>> {
        self.cell
            .get_or_try_init(|| {
                let location = self.location.as_ref().ok_or(DbError::NotConfigured)?;
                match RecordStore::open(location) {
                    Ok(store) => {
                        info!("event=store_init module=store status=ok location={location}");
                        Ok(Arc::new(store))
                    }
                    Err(err) => {
                        warn!(
                            "event=store_init module=store status=error location={location} error={err}"
                        );
                        Err(err)
                    }
                }
            })
            .cloned()
    }

    /// Returns whether a connection has been opened.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the configured location, if any.
    pub fn location(&self) -> Option<&DbLocation> {
        self.location.as_ref()
    }
}
