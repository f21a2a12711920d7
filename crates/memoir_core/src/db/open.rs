//! Connection bootstrap for the entry store.
//!
//! Returned connections have `foreign_keys=ON`, a busy timeout, and every
//! migration applied.

use super::migrations::apply_migrations;
use super::DbResult;
use crate::logging::LogEvent;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the entry store file and applies pending migrations.
///
/// Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_and_bootstrap("file", || Connection::open(path))
}

/// Opens a private in-memory entry store, mostly for tests.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_and_bootstrap("memory", Connection::open_in_memory)
}

fn open_and_bootstrap(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let failed = |stage: &str, err: &dyn std::fmt::Display| {
        error!(
            "{}",
            LogEvent::new("db_open", "db", "error")
                .field("mode", mode)
                .field("stage", stage)
                .field("duration_ms", started_at.elapsed().as_millis())
                .field("error", err)
        );
    };

    let mut conn = open().map_err(|err| {
        failed("open", &err);
        err
    })?;
    if let Err(err) = bootstrap_connection(&mut conn) {
        failed("bootstrap", &err);
        return Err(err);
    }

    info!(
        "{}",
        LogEvent::new("db_open", "db", "ok")
            .field("mode", mode)
            .field("duration_ms", started_at.elapsed().as_millis())
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
