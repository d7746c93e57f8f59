//! Schema upgrades, tracked with `PRAGMA user_version`.
//!
//! [`MIGRATIONS`] is applied in order on every open; a step only runs when
//! the stored version is below its own.

pub mod v001_initial;

use rusqlite::Connection;

use crate::error::{Result, StoreError};

type Step = fn(&Connection) -> std::result::Result<(), rusqlite::Error>;

/// `(version, name, step)`, ascending.
const MIGRATIONS: &[(u32, &str, Step)] = &[(1, "v001_initial", v001_initial::up as Step)];

/// Version the database ends at after [`run_migrations`].
pub const CURRENT_VERSION: u32 = 1;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let stored: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if stored >= CURRENT_VERSION {
        tracing::debug!(version = stored, "Schema up to date");
        return Ok(());
    }

    for &(version, name, step) in MIGRATIONS.iter().filter(|(v, _, _)| *v > stored) {
        tracing::info!(from = stored, to = version, name, "Upgrading schema");
        step(conn).map_err(|source| StoreError::Migration { version, source })?;
        conn.pragma_update(None, "user_version", version)?;
    }

    Ok(())
}
