//! Domain model structs persisted in the local SQLite database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tamtam_shared::constants::{
    DEFAULT_CURRENCY, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_USER_ID,
};
use tamtam_shared::{CurrencyCode, DeviceTag, JpegQuality, Position, PricePolicy, UserId, WireSchema};

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// User-editable settings.  Stored as a single JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Scheme and host of the listing server, without port.
    pub server_host: String,
    /// Listing server port.
    pub server_port: u16,
    /// Account the listings are published under.
    pub user_id: UserId,
    /// Stable per-device prefix of every listing identifier.
    pub device_tag: DeviceTag,
    /// Currency attached to every price.
    pub currency: CurrencyCode,
    /// Quality of the JPEG recompression before hex encoding.
    pub jpeg_quality: JpegQuality,
    /// Fallback applied when the price text is not a number.
    pub price_policy: PricePolicy,
    /// Revision of the listing document sent to the server.
    pub wire_schema: WireSchema,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            user_id: UserId(DEFAULT_USER_ID.to_string()),
            device_tag: generate_device_tag(),
            currency: CurrencyCode(DEFAULT_CURRENCY),
            jpeg_quality: JpegQuality::default(),
            price_policy: PricePolicy::default(),
            wire_schema: WireSchema::default(),
        }
    }
}

impl Preferences {
    /// `<server_host>:<server_port>`, e.g. `http://systev.com:5003`.
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.server_host.trim_end_matches('/'), self.server_port)
    }
}

/// A fresh random device tag.  Only meaningful once persisted.
pub fn generate_device_tag() -> DeviceTag {
    DeviceTag::new(format!("tamtam-{}", uuid::Uuid::new_v4().simple()))
        .expect("generated device tag is never blank")
}

// ---------------------------------------------------------------------------
// Cached position fix
// ---------------------------------------------------------------------------

/// The most recent position fix, carried over to later sessions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CachedFix {
    pub position: Position,
    /// When the fix was received.
    pub recorded_at: DateTime<Utc>,
}
