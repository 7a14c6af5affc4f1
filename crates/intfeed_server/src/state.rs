//! Shared handler state.
//!
//! # Responsibility
//! - Hold the process-scoped lazy record store.
//! - Move blocking store work off the async runtime.
//!
//! # Invariants
//! - Every store call goes through `AppState::run`; handlers never touch
//!   the connection directly.
//! - Store connection failures surface as `StoreUnavailable`, never as panics.

use intfeed_core::{
    LazyRecordStore, RecordService, RecordServiceError, RecordServiceResult,
    SqliteRecordRepository,
};
use std::sync::Arc;

/// State cloned into every axum handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<LazyRecordStore>,
}

impl AppState {
    pub fn new(store: LazyRecordStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &LazyRecordStore {
        &self.store
    }

    /// Runs one record use-case on the blocking pool.
    ///
    /// Opens the store first when it has not been opened yet, so an
    /// on-demand deployment retries the connection on every request until
    /// one succeeds.
    pub async fn run<T, F>(&self, operation: &'static str, f: F) -> RecordServiceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&RecordService<SqliteRecordRepository<'_>>) -> RecordServiceResult<T>
            + Send
            + 'static,
    {
        let store = Arc::clone(&self.store);
        let task = tokio::task::spawn_blocking(move || {
            let store = store
                .get()
                .map_err(|err| RecordServiceError::StoreUnavailable(err.to_string()))?;
            store.with_service(f)
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => Err(RecordServiceError::StoreUnavailable(format!(
                "{operation} task failed: {err}"
            ))),
        }
    }
}
