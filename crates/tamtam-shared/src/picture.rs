//! Picture recompression and hex encoding.
//!
//! The listing server receives the photo as the uppercase hex text of a
//! JPEG stream. The hex step is lossless; the only loss happens when the
//! picture is recompressed at the requested quality.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use crate::constants::THUMBNAIL_JPEG_QUALITY;
use crate::error::EncodingError;
use crate::types::JpegQuality;

/// Decode a picture from its file bytes (JPEG, PNG or WebP).
pub fn load_picture(bytes: &[u8]) -> Result<DynamicImage, EncodingError> {
    image::load_from_memory(bytes).map_err(EncodingError::ImageDecode)
}

/// Recompress `image` to a baseline JPEG stream.
pub fn compress_jpeg(image: &DynamicImage, quality: JpegQuality) -> Result<Vec<u8>, EncodingError> {
    // JPEG has no alpha channel
    let rgb = image.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.encoder_value())
        .encode_image(&rgb)
        .map_err(EncodingError::JpegEncode)?;

    tracing::debug!(bytes = jpeg.len(), quality = quality.get(), "JPEG data bytes");
    Ok(jpeg)
}

/// Two characters from `0123456789ABCDEF` per byte.
pub fn hex_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

pub fn decode_hex(text: &str) -> Result<Vec<u8>, EncodingError> {
    hex::decode(text).map_err(|e| EncodingError::MalformedPicture(e.to_string()))
}

/// Recompress `image` to JPEG at `quality` and return the stream as
/// uppercase hex. The result is always `2 * jpeg_len` characters long.
pub fn encode_image_as_hex(image: &DynamicImage, quality: JpegQuality) -> Result<String, EncodingError> {
    let jpeg = compress_jpeg(image, quality)?;
    Ok(hex_upper(&jpeg))
}

/// True when `text` is what [`hex_upper`] produces.
pub(crate) fn is_upper_hex(text: &str) -> bool {
    text.len() % 2 == 0 && text.bytes().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F'))
}

/// Power-of-two divisor applied to both sides so the picture fits around
/// `max_w` x `max_h`. Mirrors decoder sub-sampling: the ratio is taken on
/// the tighter side and rounded down to a power of two.
pub fn sample_factor(width: u32, height: u32, max_w: u32, max_h: u32) -> u32 {
    let ratio = (width / max_w.max(1)).min(height / max_h.max(1));
    if ratio < 2 {
        return 1;
    }
    1 << (31 - ratio.leading_zeros())
}

/// Decode a captured photo and shrink it towards the thumbnail box.
pub fn make_thumbnail(bytes: &[u8], max_w: u32, max_h: u32) -> Result<DynamicImage, EncodingError> {
    let picture = load_picture(bytes)?;
    let (width, height) = (picture.width(), picture.height());
    let factor = sample_factor(width, height, max_w, max_h);

    tracing::debug!(width, height, factor, "Scale factor");

    if factor == 1 {
        return Ok(picture);
    }
    let thumbnail = picture.resize_exact(
        (width / factor).max(1),
        (height / factor).max(1),
        FilterType::Triangle,
    );
    tracing::debug!(
        width = thumbnail.width(),
        height = thumbnail.height(),
        "Thumbnail size"
    );
    Ok(thumbnail)
}

/// Thumbnail as it is stored between capture and publication: decoded back
/// from a JPEG written at full quality.
pub fn thumbnail_jpeg(bytes: &[u8], max_w: u32, max_h: u32) -> Result<DynamicImage, EncodingError> {
    let thumbnail = make_thumbnail(bytes, max_w, max_h)?;
    let stored = compress_jpeg(&thumbnail, JpegQuality::new(THUMBNAIL_JPEG_QUALITY)?)?;
    load_picture(&stored)
}
