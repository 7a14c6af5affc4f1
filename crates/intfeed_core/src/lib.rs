//! Core domain logic for intFeed.
//! This crate is the single source of truth for record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use db::{DbError, DbLocation};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{NewRecord, Record, RecordId, RecordValidationError};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, SqliteRecordRepository};
pub use service::record_service::{RecordService, RecordServiceError, RecordServiceResult};
pub use store::{LazyRecordStore, RecordStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
