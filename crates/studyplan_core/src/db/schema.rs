//! `kv_store` layout bootstrap.
//!
//! # Invariants
//! - A fresh file (`user_version = 0`) gets the table and the version stamp
//!   in one transaction.
//! - A stamped file is only accepted when the stamp matches and the table
//!   is present; nothing is recreated over an existing store.

use super::{DbError, DbResult};
use log::{info, warn};
use rusqlite::{Connection, OptionalExtension};

/// Layout version written to `PRAGMA user_version`.
pub const STORE_SCHEMA_VERSION: u32 = 1;

const CREATE_KV_STORE: &str = "
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Creates or checks the `kv_store` table on `conn`.
pub(super) fn ensure_kv_store(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;

    if found == 0 {
        let tx = conn.transaction()?;
        tx.execute_batch(CREATE_KV_STORE)?;
        tx.execute_batch(&format!("PRAGMA user_version = {STORE_SCHEMA_VERSION};"))?;
        tx.commit()?;
        info!(
            "event=kv_store_schema module=db status=created version={}",
            STORE_SCHEMA_VERSION
        );
        return Ok(());
    }

    if found > STORE_SCHEMA_VERSION {
        warn!(
            "event=kv_store_schema module=db status=rejected found={} supported={}",
            found, STORE_SCHEMA_VERSION
        );
        return Err(DbError::SchemaTooNew {
            found,
            supported: STORE_SCHEMA_VERSION,
        });
    }

    if !has_kv_store(conn)? {
        warn!(
            "event=kv_store_schema module=db status=rejected found={} error_code=table_missing",
            found
        );
        return Err(DbError::MissingKvStore { found });
    }
    Ok(())
}

fn has_kv_store(conn: &Connection) -> DbResult<bool> {
    let name: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'kv_store';",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(name.is_some())
}
