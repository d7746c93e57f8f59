/// Application name
pub const APP_NAME: &str = "TamTam";

/// Listing server used until the user changes it in the preferences
pub const DEFAULT_SERVER_HOST: &str = "http://systev.com";

/// Default listing server port
pub const DEFAULT_SERVER_PORT: u16 = 5003;

/// Account every listing is published under until real accounts exist
pub const DEFAULT_USER_ID: &str = "idUser0";

/// ISO 4217 numeric code for the euro
pub const DEFAULT_CURRENCY: u16 = 978;

/// JPEG quality expected by the listing server
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// JPEG quality used when storing the downscaled thumbnail
pub const THUMBNAIL_JPEG_QUALITY: u8 = 100;

/// Thumbnail bounding box in pixels
pub const THUMBNAIL_MAX_WIDTH: u32 = 200;
pub const THUMBNAIL_MAX_HEIGHT: u32 = 200;

/// Width of the hex millisecond timestamp appended to listing identifiers
pub const TIMESTAMP_HEX_WIDTH: usize = 16;

/// Path segment under a user for listings being sold
pub const SELLING_THINGS_PATH: &str = "sellingThings";

/// Serialized documents are logged in slices of this many characters
pub const LOG_CHUNK_LEN: usize = 200;

/// Number of entries kept by the in-app log
pub const LOG_MAX_ENTRIES: usize = 128;
