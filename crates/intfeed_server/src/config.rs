//! Process configuration for the HTTP server.
//!
//! # Responsibility
//! - Read flags and `INTFEED_*` environment variables.
//! - Build the record store handle that matches the deployment mode.
//!
//! # Invariants
//! - Standalone mode opens the store before serving; failure is fatal.
//! - On-demand mode defers opening to the first request; a missing
//!   connection string fails requests, not startup.

use clap::{Parser, ValueEnum};
use intfeed_core::{DbError, DbLocation, LazyRecordStore, RecordStore};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

/// How the server obtains its store connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServeMode {
    /// Long-running process: connect at startup, exit on failure.
    Standalone,
    /// Connect on first request; failures are per-request and retried.
    OnDemand,
}

impl Display for ServeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standalone => write!(f, "standalone"),
            Self::OnDemand => write!(f, "on-demand"),
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "intfeed-server", version, about = "Name/age record keeping over HTTP")]
pub struct ServerConfig {
    /// Store connection string: a file path, `sqlite://<path>` or `:memory:`.
    #[arg(long, env = "INTFEED_DB")]
    pub db: Option<String>,

    /// Listen address.
    #[arg(long, env = "INTFEED_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    #[arg(long, env = "INTFEED_MODE", value_enum, default_value_t = ServeMode::Standalone)]
    pub mode: ServeMode,

    /// Allow cross-origin requests, for clients served from another origin.
    #[arg(long, env = "INTFEED_CORS")]
    pub cors: bool,

    /// trace|debug|info|warn|error. Defaults to `debug` in debug builds, `info` otherwise.
    #[arg(long, env = "INTFEED_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files. Logs go to stderr when unset.
    #[arg(long, env = "INTFEED_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl ServerConfig {
    /// Parses the configured connection string, if any.
    pub fn db_location(&self) -> Result<Option<DbLocation>, DbError> {
        self.db.as_deref().map(DbLocation::parse).transpose()
    }

    /// Builds the store handle for the configured mode.
    ///
    /// # Errors
    /// - Any mode: the connection string is present but malformed.
    /// - Standalone: no connection string, or the store cannot be opened.
    pub fn build_store(&self) -> Result<LazyRecordStore, DbError> {
        let location = self.db_location()?;
        match self.mode {
            ServeMode::Standalone => {
                let location = location.ok_or(DbError::NotConfigured)?;
                Ok(LazyRecordStore::ready(RecordStore::open(&location)?))
            }
            ServeMode::OnDemand => Ok(LazyRecordStore::new(location)),
        }
    }
}
