//! Key-value storage medium contracts and implementations.
//!
//! # Responsibility
//! - Model a string-keyed, string-valued store with local-storage semantics.
//! - Surface medium rejections (SQLite failures, quota) as `StorageError`.
//!
//! # Invariants
//! - `set_item` replaces the whole value for a key in one statement.
//! - A configured quota is checked before any write reaches the medium.

use crate::db::DbError;
use crate::model::plan::{PlanId, PlanValidationError};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failures raised by the storage medium or by plan collection handling.
#[derive(Debug)]
pub enum StorageError {
    /// The underlying database rejected the read or write.
    Db(DbError),
    /// The value would exceed the configured byte quota.
    QuotaExceeded {
        key: String,
        bytes: usize,
        quota: usize,
    },
    /// The stored value could not be decoded.
    Corrupt(String),
    /// A plan with this id is already stored.
    DuplicateId(PlanId),
    /// The plan failed shape validation before write.
    Validation(PlanValidationError),
    /// The collection could not be encoded.
    Encode(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded { key, bytes, quota } => write!(
                f,
                "storage quota exceeded for `{key}`: {bytes} bytes > {quota} bytes"
            ),
            Self::Corrupt(message) => write!(f, "stored plan data is unreadable: {message}"),
            Self::DuplicateId(id) => write!(f, "plan id already stored: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode plans: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::Corrupt(_) | Self::DuplicateId(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<PlanValidationError> for StorageError {
    fn from(value: PlanValidationError) -> Self {
        Self::Validation(value)
    }
}

/// String key-value medium, shaped after browser local storage.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }
}

/// SQLite-backed medium over the `kv_store` table.
pub struct SqliteStorage<'conn> {
    conn: &'conn Connection,
    quota_bytes: Option<usize>,
}

impl<'conn> SqliteStorage<'conn> {
    /// Wraps a connection with a checked `kv_store` table (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            quota_bytes: None,
        }
    }

    /// Rejects writes whose value is larger than `quota_bytes`.
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }
}

impl KeyValueStorage for SqliteStorage<'_> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        check_quota(self.quota_bytes, key, value)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local medium for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Seeds a raw value, bypassing the quota.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        check_quota(self.quota_bytes, key, value)?;
        self.insert_raw(key, value);
        Ok(())
    }
}

fn check_quota(quota_bytes: Option<usize>, key: &str, value: &str) -> StorageResult<()> {
    match quota_bytes {
        Some(quota) if value.len() > quota => Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            bytes: value.len(),
            quota,
        }),
        _ => Ok(()),
    }
}
