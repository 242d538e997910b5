//! Graph schema versions.
//!
//! The applied version lives in `PRAGMA user_version`; `0` is a fresh file.
//! Each step runs in one transaction together with the version bump, so a
//! crash mid-step leaves the previous version intact.

use rusqlite::{Connection, types::Type};
use tracing::info;

use crate::schema;

/// Newest schema this crate writes.
pub const LATEST_SCHEMA_VERSION: u32 = 1;

struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[Step {
    version: 1,
    name: "vertices and edges",
    sql: schema::MIGRATION_V1_SQL,
}];

/// Schema version recorded in the database file.
///
/// # Errors
///
/// Fails on SQLite errors or a negative / oversized `user_version`.
pub fn current_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let raw: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    u32::try_from(raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(err)))
}

/// Bring the graph schema up to [`LATEST_SCHEMA_VERSION`] and return the
/// version now recorded. Versions above the latest are left untouched.
///
/// # Errors
///
/// Fails if a step cannot be applied; steps already committed stay.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<u32> {
    let from = current_schema_version(conn)?;
    let mut version = from;

    for step in STEPS.iter().filter(|step| step.version > from) {
        let tx = conn.transaction()?;
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", i64::from(step.version))?;
        tx.commit()?;

        info!(version = step.version, step = step.name, "graph schema migrated");
        version = step.version;
    }

    Ok(version)
}
