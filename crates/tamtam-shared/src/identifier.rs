use chrono::Utc;

use crate::constants::TIMESTAMP_HEX_WIDTH;
use crate::types::{DeviceTag, ListingId};

/// Build a listing identifier from the device tag and the current time.
///
/// The timestamp has millisecond resolution, so two calls made within the
/// same millisecond on the same device return the same identifier. Listings
/// are published one tap at a time, so this is left as is.
pub fn generate_identifier(device_tag: &DeviceTag) -> ListingId {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    generate_identifier_at(device_tag, millis)
}

/// Same as [`generate_identifier`] with an explicit epoch-millisecond clock.
pub fn generate_identifier_at(device_tag: &DeviceTag, millis: u64) -> ListingId {
    ListingId(format!(
        "{}{:0width$X}",
        device_tag.as_str(),
        millis,
        width = TIMESTAMP_HEX_WIDTH
    ))
}
