//! Versioned schema steps for the subway store.
//!
//! # Invariants
//! - Steps are listed in strictly increasing `version` order.
//! - All pending steps commit together; the stored `PRAGMA user_version`
//!   only ever names a fully applied step.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

/// One forward-only schema step.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Migration {
    pub(crate) version: u32,
    pub(crate) name: &'static str,
    pub(crate) sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "station_line_tables",
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    latest_in(MIGRATIONS)
}

/// Brings the store up to [`latest_version`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    apply_steps(conn, MIGRATIONS)
}

/// Reads the schema version stored in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

fn latest_in(steps: &[Migration]) -> u32 {
    steps.iter().map(|step| step.version).max().unwrap_or(0)
}

pub(crate) fn apply_steps(conn: &mut Connection, steps: &[Migration]) -> DbResult<()> {
    let found = current_user_version(conn)?;
    let supported = latest_in(steps);
    if found > supported {
        return Err(DbError::UnsupportedSchemaVersion { found, supported });
    }

    let pending: Vec<&Migration> = steps.iter().filter(|step| step.version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        let applied = tx
            .execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version));
        if let Err(source) = applied {
            error!(
                "event=db_migrate module=db status=error version={} name={} error={}",
                step.version, step.name, source
            );
            return Err(DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            });
        }
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;
    Ok(())
}
