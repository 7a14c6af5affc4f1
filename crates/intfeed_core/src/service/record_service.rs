//! Record use-case service.
//!
//! # Responsibility
//! - Provide the create-or-reject-duplicate and ordered-list use-cases.
//! - Collapse storage failures into one caller-facing category.
//!
//! # Invariants
//! - Duplicates are detected only through the store's unique index, so two
//!   racing creators of the same key can never both succeed.
//! - `list` always re-reads the store; no caching.
//! - Store error details are logged, never carried to callers as text.

use crate::model::record::{NewRecord, Record, RecordValidationError};
use crate::repo::record_repo::{RecordRepository, RepoError};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-facing error taxonomy for record use-cases.
#[derive(Debug)]
pub enum RecordServiceError {
    /// Missing or malformed `name`/`age`; nothing was persisted.
    Validation(RecordValidationError),
    /// A record with the same `(name, age)` already exists.
    Duplicate,
    /// Connection or query failure. Detail is for logs only.
    StoreUnavailable(String),
}

impl Display for RecordServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate => write!(f, "duplicate record already exists"),
            Self::StoreUnavailable(details) => write!(f, "record store unavailable: {details}"),
        }
    }
}

impl Error for RecordServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RecordServiceError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for RecordServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Duplicate { .. } => Self::Duplicate,
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

pub type RecordServiceResult<T> = Result<T, RecordServiceError>;

/// Record service facade over repository implementations.
pub struct RecordService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates raw adapter input and creates one record.
    ///
    /// # Errors
    /// - `Validation` when `name` is missing/blank or `age` is not an integer.
    /// - `Duplicate` when the `(name, age)` key is already stored.
    /// - `StoreUnavailable` for any other store failure.
    pub fn create(&self, name: Option<&str>, age: Option<&str>) -> RecordServiceResult<Record> {
        let record = NewRecord::parse(name, age).map_err(|err| {
            debug!("event=record_create module=service status=rejected reason=validation error={err}");
            err
        })?;
        self.create_record(&record)
    }

    /// Creates one record from already-validated input.
    pub fn create_record(&self, record: &NewRecord) -> RecordServiceResult<Record> {
        match self.repo.insert_record(record) {
            Ok(created) => {
                info!(
                    "event=record_create module=service status=ok record_id={}",
                    created.id
                );
                Ok(created)
            }
            Err(RepoError::Duplicate { .. }) => {
                info!("event=record_create module=service status=rejected reason=duplicate");
                Err(RecordServiceError::Duplicate)
            }
            Err(err) => {
                let mapped = RecordServiceError::from(err);
                if let RecordServiceError::StoreUnavailable(details) = &mapped {
                    error!(
                        "event=record_create module=service status=error error_code=store_unavailable error={details}"
                    );
                }
                Err(mapped)
            }
        }
    }

    /// Lists every record in creation order.
    pub fn list(&self) -> RecordServiceResult<Vec<Record>> {
        self.repo.list_records().map_err(|err| {
            error!(
                "event=record_list module=service status=error error_code=store_unavailable error={err}"
            );
            RecordServiceError::from(err)
        })
    }

    /// Returns the number of stored records.
    pub fn count(&self) -> RecordServiceResult<u64> {
        Ok(self.repo.count_records()?)
    }
}
