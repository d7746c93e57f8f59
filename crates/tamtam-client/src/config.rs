//! Client configuration loaded from environment variables.
//!
//! Environment values override the stored preferences for a single run and
//! are never written back to the database.

use std::path::PathBuf;
use std::time::Duration;

use tamtam_shared::{DeviceTag, UserId};
use tamtam_store::{Database, Preferences, StoreError};

/// Default time allowed for one `PUT` request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Database file.
    /// Env: `TAMTAM_DB_PATH`
    /// Default: platform data directory.
    pub db_path: Option<PathBuf>,

    /// Env: `TAMTAM_SERVER_HOST` (scheme and host, e.g. `http://localhost`)
    pub server_host: Option<String>,

    /// Env: `TAMTAM_SERVER_PORT`
    pub server_port: Option<u16>,

    /// Env: `TAMTAM_USER_ID`
    pub user_id: Option<String>,

    /// Env: `TAMTAM_DEVICE_TAG`
    pub device_tag: Option<DeviceTag>,

    /// Env: `TAMTAM_REQUEST_TIMEOUT_SECS`
    /// Default: 10 seconds.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            server_host: None,
            server_port: None,
            user_id: None,
            device_tag: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("TAMTAM_DB_PATH") {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(host) = lookup("TAMTAM_SERVER_HOST") {
            if host.starts_with("http://") || host.starts_with("https://") {
                config.server_host = Some(host);
            } else {
                tracing::warn!(value = %host, "TAMTAM_SERVER_HOST needs an http(s) scheme, ignoring");
            }
        }

        if let Some(port) = lookup("TAMTAM_SERVER_PORT") {
            match port.parse::<u16>() {
                Ok(p) => config.server_port = Some(p),
                Err(_) => tracing::warn!(value = %port, "Invalid TAMTAM_SERVER_PORT, ignoring"),
            }
        }

        if let Some(user) = lookup("TAMTAM_USER_ID") {
            if !user.is_empty() {
                config.user_id = Some(user);
            }
        }

        if let Some(tag) = lookup("TAMTAM_DEVICE_TAG") {
            match DeviceTag::new(tag) {
                Ok(tag) => config.device_tag = Some(tag),
                Err(e) => tracing::warn!(error = %e, "Invalid TAMTAM_DEVICE_TAG, ignoring"),
            }
        }

        if let Some(secs) = lookup("TAMTAM_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(n) if n > 0 => config.request_timeout = Duration::from_secs(n),
                _ => tracing::warn!(value = %secs, "Invalid TAMTAM_REQUEST_TIMEOUT_SECS, using default"),
            }
        }

        config
    }

    /// Layer the environment overrides over stored preferences.
    pub fn apply(&self, prefs: &mut Preferences) {
        if let Some(host) = &self.server_host {
            prefs.server_host = host.clone();
        }
        if let Some(port) = self.server_port {
            prefs.server_port = port;
        }
        if let Some(user) = &self.user_id {
            prefs.user_id = UserId(user.clone());
        }
        if let Some(tag) = &self.device_tag {
            prefs.device_tag = tag.clone();
        }
    }

    pub fn open_database(&self) -> Result<Database, StoreError> {
        match &self.db_path {
            Some(path) => Database::open_at(path),
            None => Database::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert!(config.db_path.is_none());
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);

        let mut prefs = Preferences::default();
        let before = prefs.clone();
        config.apply(&mut prefs);
        assert_eq!(prefs, before);
    }

    #[test]
    fn test_overrides_apply() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TAMTAM_SERVER_HOST", "http://127.0.0.1"),
            ("TAMTAM_SERVER_PORT", "8080"),
            ("TAMTAM_USER_ID", "idUser7"),
            ("TAMTAM_DEVICE_TAG", "bench-phone"),
            ("TAMTAM_REQUEST_TIMEOUT_SECS", "3"),
        ]));
        let mut prefs = Preferences::default();
        config.apply(&mut prefs);

        assert_eq!(prefs.base_url(), "http://127.0.0.1:8080");
        assert_eq!(prefs.user_id, UserId("idUser7".to_string()));
        assert_eq!(prefs.device_tag.as_str(), "bench-phone");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TAMTAM_SERVER_HOST", "systev.com"),
            ("TAMTAM_SERVER_PORT", "99999"),
            ("TAMTAM_DEVICE_TAG", "  "),
            ("TAMTAM_REQUEST_TIMEOUT_SECS", "0"),
        ]));
        assert!(config.server_host.is_none());
        assert!(config.server_port.is_none());
        assert!(config.device_tag.is_none());
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }
}
