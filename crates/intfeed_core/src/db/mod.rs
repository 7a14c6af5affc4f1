//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Resolve the configured store location from a connection string.
//! - Open and configure SQLite connections for intFeed core.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write records before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_location};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Connection string could not be mapped to a store location.
    InvalidLocation(String),
    /// No connection string was supplied by process configuration.
    NotConfigured,
    /// Migrated database does not have the layout this binary reads.
    SchemaMismatch(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidLocation(raw) => write!(f, "invalid database location `{raw}`"),
            Self::NotConfigured => write!(f, "database location is not configured"),
            Self::SchemaMismatch(details) => write!(f, "database schema mismatch: {details}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::InvalidLocation(_)
            | Self::NotConfigured
            | Self::SchemaMismatch(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Where the record store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// Private in-memory database, gone with the connection.
    Memory,
    /// SQLite database file, created on first open.
    File(PathBuf),
}

impl DbLocation {
    /// Parses a connection string.
    ///
    /// Accepted shapes:
    /// - `:memory:` or `sqlite::memory:` -> [`DbLocation::Memory`]
    /// - `sqlite://<path>` or a bare `<path>` -> [`DbLocation::File`]
    ///
    /// # Errors
    /// - Returns [`DbError::InvalidLocation`] when the string is blank or
    ///   names an empty path.
    pub fn parse(raw: &str) -> DbResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DbError::InvalidLocation(raw.to_string()));
        }

        if matches!(trimmed, ":memory:" | "sqlite::memory:" | "sqlite://:memory:") {
            return Ok(Self::Memory);
        }

        let path = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
            .unwrap_or(trimmed);
        if path.is_empty() {
            return Err(DbError::InvalidLocation(raw.to_string()));
        }

        Ok(Self::File(PathBuf::from(path)))
    }
}

impl Display for DbLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, ":memory:"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DbError, DbLocation};
    use std::path::PathBuf;

    #[test]
    fn parse_recognizes_memory_aliases() {
        assert_eq!(DbLocation::parse(":memory:").unwrap(), DbLocation::Memory);
        assert_eq!(
            DbLocation::parse("sqlite::memory:").unwrap(),
            DbLocation::Memory
        );
    }

    #[test]
    fn parse_strips_sqlite_scheme() {
        assert_eq!(
            DbLocation::parse("sqlite:///var/lib/intfeed.db").unwrap(),
            DbLocation::File(PathBuf::from("/var/lib/intfeed.db"))
        );
        assert_eq!(
            DbLocation::parse(" data/intfeed.db ").unwrap(),
            DbLocation::File(PathBuf::from("data/intfeed.db"))
        );
    }

    #[test]
    fn parse_rejects_blank_and_empty_paths() {
        assert!(matches!(
            DbLocation::parse("   "),
            Err(DbError::InvalidLocation(_))
        ));
        assert!(matches!(
            DbLocation::parse("sqlite://"),
            Err(DbError::InvalidLocation(_))
        ));
    }
}
