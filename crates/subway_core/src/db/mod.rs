//! Subway store bootstrap: connection setup and schema migrations.
//!
//! Callers get connections only through [`open_db`] or [`open_db_in_memory`],
//! which guarantee the `station`, `line` and `line_station` tables exist at
//! the version this binary understands.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the subway store.
#[derive(Debug)]
pub enum DbError {
    /// Connection-level failure (open, pragma, version probe).
    Sqlite(rusqlite::Error),
    /// One schema step failed; nothing from the pending batch was kept.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The file was written by a newer binary.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "schema migration {version} ({name}) failed: {source}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "subway store is at schema {found}, this build only knows up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
