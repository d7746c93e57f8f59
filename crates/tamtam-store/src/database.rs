//! The client database file.
//!
//! Opening a [`Database`] always brings the schema up to date first, so the
//! accessors in [`crate::preferences`] and [`crate::positions`] can assume
//! their tables exist.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

const DB_FILE_NAME: &str = "tamtam.db";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open `tamtam.db` in the per-user data directory
    /// (`~/.local/share/tamtam` on Linux).
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("org", "tamtam", "tamtam").ok_or(StoreError::NoDataDir)?;
        Self::open_at(&dirs.data_dir().join(DB_FILE_NAME))
    }

    /// Open the database at `path`, creating the file and its directory if
    /// needed.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        tracing::debug!(path = %path.display(), "Opening database");
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}
