use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;
use crate::models::Preferences;

impl Database {
    /// Stored preferences, or freshly generated defaults on first run.
    ///
    /// Defaults are written back immediately so the generated device tag
    /// stays the same across runs. The same applies to a stored row that
    /// lacks `deviceTag`: the tag generated while loading it is persisted.
    pub fn load_preferences(&self) -> Result<Preferences> {
        let stored: Option<String> = self
            .conn()
            .query_row("SELECT json FROM preferences WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match stored {
            Some(json) => {
                let value: serde_json::Value = serde_json::from_str(&json)?;
                let has_tag = value.get("deviceTag").is_some();
                let prefs: Preferences = serde_json::from_value(value)?;
                if !has_tag {
                    self.save_preferences(&prefs)?;
                    tracing::info!(device_tag = %prefs.device_tag, "Stored preferences had no device tag, generated one");
                }
                Ok(prefs)
            }
            None => {
                let prefs = Preferences::default();
                self.save_preferences(&prefs)?;
                tracing::info!(device_tag = %prefs.device_tag, "Created default preferences");
                Ok(prefs)
            }
        }
    }

    pub fn save_preferences(&self, prefs: &Preferences) -> Result<()> {
        let json = serde_json::to_string(prefs)?;
        self.conn().execute(
            "INSERT OR REPLACE INTO preferences (id, json, updated_at) VALUES (1, ?1, ?2)",
            params![json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
