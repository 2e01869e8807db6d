//! SQLite medium behind the key-value plan storage.
//!
//! The database holds exactly one table, `kv_store`, stamped with
//! `STORE_SCHEMA_VERSION` through `PRAGMA user_version`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::STORE_SCHEMA_VERSION;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The database file could not be opened or created.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// A statement against `kv_store` failed.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer release with a different layout.
    SchemaTooNew { found: u32, supported: u32 },
    /// The file is stamped as a plan store but has no `kv_store` table.
    MissingKvStore { found: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open plan storage `{}`: {source}", path.display())
            }
            Self::Sqlite(err) => write!(f, "plan storage query failed: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "plan storage layout v{found} is newer than this build supports (v{supported})"
            ),
            Self::MissingKvStore { found } => write!(
                f,
                "plan storage is stamped v{found} but the kv_store table is missing"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::MissingKvStore { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
