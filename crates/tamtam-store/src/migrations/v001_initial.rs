//! v001 -- Initial schema creation.
//!
//! Creates the two single-row tables: `preferences` and `last_fix`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Preferences (serialized as one camelCase JSON object)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS preferences (
    id         INTEGER PRIMARY KEY CHECK (id = 1),
    json       TEXT NOT NULL,
    updated_at TEXT NOT NULL                  -- RFC-3339
);

-- ----------------------------------------------------------------
-- Last position fix, kept across sessions
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS last_fix (
    id          INTEGER PRIMARY KEY CHECK (id = 1),
    lon         REAL NOT NULL,
    lat         REAL NOT NULL,
    recorded_at TEXT NOT NULL                 -- RFC-3339
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
