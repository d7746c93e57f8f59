use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("No data directory available on this platform")]
    NoDataDir,

    #[error("Cannot prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema upgrade to version {version} failed: {source}")]
    Migration {
        version: u32,
        #[source]
        source: rusqlite::Error,
    },

    /// The stored preferences row is not valid JSON for [`crate::Preferences`].
    #[error("Stored preferences are unreadable: {0}")]
    Json(#[from] serde_json::Error),

    /// `recorded_at` of the cached fix is not RFC 3339.
    #[error("Cached fix has a bad timestamp: {0}")]
    ChronoParse(#[from] chrono::ParseError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
