use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CURRENCY, DEFAULT_JPEG_QUALITY};
use crate::error::{DeviceTagError, EncodingError};

/// Stable per-device string that prefixes every listing identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceTag(String);

impl DeviceTag {
    /// Fails with [`DeviceTagError::Empty`] for an empty or blank tag.
    pub fn new(tag: impl Into<String>) -> Result<Self, DeviceTagError> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(DeviceTagError::Empty);
        }
        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeviceTag {
    type Error = DeviceTagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceTag> for String {
    fn from(tag: DeviceTag) -> Self {
        tag.0
    }
}

impl std::fmt::Display for DeviceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listing identifier: device tag followed by a hex millisecond timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account the listing is published under on the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// ISO 4217 numeric currency code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CurrencyCode(pub u16);

impl Default for CurrencyCode {
    fn default() -> Self {
        Self(DEFAULT_CURRENCY)
    }
}

/// Asking price of a listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price {
    pub currency: CurrencyCode,
    /// Parsed as a 32-bit float, widened to a JSON double on the wire.
    pub amount: f32,
}

/// WGS84 coordinates in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    /// Longitude
    pub lon: f64,
    /// Latitude
    pub lat: f64,
}

impl Position {
    /// Placeholder sent when no fix is available.
    pub const ORIGIN: Position = Position { lon: 0.0, lat: 0.0 };

    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// How trustworthy the position attached to a listing is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PositionQuality {
    /// A fresh fix arrived since location tracking started.
    Known,
    /// Only a fix cached from an earlier session is available.
    LastKnown,
    /// No fix at all; the position is 0.0/0.0.
    NotKnown,
}

impl PositionQuality {
    /// Name used in logs, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Known => "known",
            Self::LastKnown => "lastKnown",
            Self::NotKnown => "notKnown",
        }
    }
}

impl std::fmt::Display for PositionQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JPEG recompression quality, 0 to 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub struct JpegQuality(u8);

impl JpegQuality {
    /// Accepts 0 to 100. Anything above is [`EncodingError::InvalidQuality`].
    pub fn new(quality: u8) -> Result<Self, EncodingError> {
        if quality > 100 {
            return Err(EncodingError::InvalidQuality(quality));
        }
        Ok(Self(quality))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Value handed to the JPEG encoder, which bottoms out at 1.
    pub(crate) fn encoder_value(&self) -> u8 {
        self.0.max(1)
    }
}

impl Default for JpegQuality {
    fn default() -> Self {
        Self(DEFAULT_JPEG_QUALITY)
    }
}

impl TryFrom<u8> for JpegQuality {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JpegQuality> for u8 {
    fn from(quality: JpegQuality) -> Self {
        quality.0
    }
}
