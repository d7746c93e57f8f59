use thiserror::Error;

#[derive(Error, Debug)]
pub enum TamTamError {
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Price error: {0}")]
    Price(#[from] PriceError),

    #[error("Device tag error: {0}")]
    DeviceTag(#[from] DeviceTagError),
}

/// A listing could not be turned into a wire document. Nothing may be
/// published when this is returned.
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Picture could not be decoded: {0}")]
    ImageDecode(#[source] image::ImageError),

    #[error("JPEG compression failed: {0}")]
    JpegEncode(#[source] image::ImageError),

    #[error("Invalid JPEG quality {0} (expected 0-100)")]
    InvalidQuality(u8),

    #[error("Picture payload is not uppercase hex: {0}")]
    MalformedPicture(String),

    #[error("Coordinate {axis} is not a finite number")]
    NonFiniteCoordinate { axis: &'static str },

    #[error("Price is not a finite number")]
    NonFinitePrice,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PriceError {
    #[error("Invalid price: {0:?}")]
    Invalid(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DeviceTagError {
    #[error("Device tag must not be empty")]
    Empty,
}
