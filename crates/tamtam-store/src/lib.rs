//! # tamtam-store
//!
//! Local SQLite storage for the TamTam client.
//!
//! Holds the user preferences (listing server, account, device tag and
//! encoding options) and the last position fix, which seeds the next
//! session with a `lastKnown` position. Listings themselves are never
//! stored: once handed to the transport they are gone.

pub mod database;
pub mod migrations;
pub mod models;
pub mod positions;
pub mod preferences;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
