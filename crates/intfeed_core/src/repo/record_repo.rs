//! Record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert and ordered-scan APIs over canonical `records` storage.
//! - Translate SQLite constraint failures into semantic duplicate errors.
//!
//! # Invariants
//! - Write paths must call `NewRecord::validate()` before SQL mutations.
//! - The `(name, age)` unique index is the only duplicate authority.
//! - List order is `id ASC`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::record::{NewRecord, Record, RecordValidationError};
use rusqlite::{ffi, params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORD_COLUMNS: &str = "id, name, age, created_at, updated_at";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    /// Unique `(name, age)` index rejected the write.
    Duplicate {
        name: String,
        age: i64,
    },
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate { name, age } => {
                write!(f, "record already exists for name `{name}` and age {age}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for record persistence.
pub trait RecordRepository {
    /// Inserts one record and returns it with store-assigned fields.
    fn insert_record(&self, record: &NewRecord) -> RepoResult<Record>;
    /// Returns every record ordered by `id ASC`.
    fn list_records(&self) -> RepoResult<Vec<Record>>;
    /// Returns the number of stored records.
    fn count_records(&self) -> RepoResult<u64>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_record_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Wraps a connection that already passed `try_new` once.
    pub(crate) fn from_checked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn insert_record(&self, record: &NewRecord) -> RepoResult<Record> {
        record.validate()?;

        let inserted = self.conn.query_row(
            &format!("INSERT INTO records (name, age) VALUES (?1, ?2) RETURNING {RECORD_COLUMNS};"),
            params![record.name.as_str(), record.age],
            |row| Ok(parse_record_row(row)),
        );

        match inserted {
            Ok(parsed) => parsed,
            Err(err) if is_unique_violation(&err) => Err(RepoError::Duplicate {
                name: record.name.clone(),
                age: record.age,
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn list_records(&self) -> RepoResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {RECORD_COLUMNS} FROM records ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn count_records(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative record count `{count}`")))
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let record = Record {
        id: row.get("id")?,
        name: row.get("name")?,
        age: row.get("age")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };

    if record.name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank name in records.name for id {}",
            record.id
        )));
    }

    Ok(record)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && matches!(
                    failure.extended_code,
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
        }
        _ => false,
    }
}

fn ensure_record_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "records")? {
        return Err(RepoError::MissingRequiredTable("records"));
    }

    for column in ["id", "name", "age", "created_at", "updated_at"] {
        if !table_has_column(conn, "records", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "records",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
