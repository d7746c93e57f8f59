//! # tamtam-shared
//!
//! Listing encoder for the TamTam marketplace client.
//!
//! Turns a captured photograph and the fields typed by the seller into the
//! JSON document expected by the listing server, plus a per-device unique
//! identifier. Everything here is synchronous and performs no I/O; loading
//! the picture and sending the document are left to the caller.

pub mod constants;
pub mod error;
pub mod identifier;
pub mod listing;
pub mod location;
pub mod picture;
pub mod price;
pub mod types;

pub use error::{DeviceTagError, EncodingError, PriceError, TamTamError};
pub use identifier::generate_identifier;
pub use listing::{build_listing_document, Listing, ListingDocument, ListingFields, WireSchema};
pub use location::{LocationSession, ResolvedPosition};
pub use picture::encode_image_as_hex;
pub use price::{parse_price, PricePolicy};
pub use types::{
    CurrencyCode, DeviceTag, JpegQuality, ListingId, Position, PositionQuality, Price, UserId,
};
