use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use tamtam_shared::Position;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::CachedFix;

impl Database {
    pub fn save_last_fix(&self, fix: &CachedFix) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO last_fix (id, lon, lat, recorded_at) VALUES (1, ?1, ?2, ?3)",
            params![fix.position.lon, fix.position.lat, fix.recorded_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn load_last_fix(&self) -> Result<Option<CachedFix>> {
        let row: Option<(f64, f64, String)> = self
            .conn()
            .query_row(
                "SELECT lon, lat, recorded_at FROM last_fix WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((lon, lat, recorded)) = row else {
            return Ok(None);
        };
        let recorded_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&recorded)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(StoreError::ChronoParse)?;

        Ok(Some(CachedFix {
            position: Position::new(lon, lat),
            recorded_at,
        }))
    }

    /// Forget the cached fix.  Returns whether one was stored.
    pub fn clear_last_fix(&self) -> Result<bool> {
        let affected = self.conn().execute("DELETE FROM last_fix WHERE id = 1", [])?;
        Ok(affected > 0)
    }
}
