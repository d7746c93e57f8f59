//! Wire documents for listings ("things" being sold).
//!
//! The listing server has seen two revisions of the document. Each
//! revision is its own type so that field names from one never leak into
//! the other.

use serde::{Deserialize, Serialize};

use crate::error::EncodingError;
use crate::picture::is_upper_hex;
use crate::types::{ListingId, Position, PositionQuality, Price};

/// Revision of the listing document understood by the server.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WireSchema {
    /// `id` / `description` / `position`
    #[default]
    Current,
    /// `idThing` / `desc` / `location`
    Legacy,
}

impl std::str::FromStr for WireSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Self::Current),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown wire schema: {other}")),
        }
    }
}

/// Everything the seller confirmed, ready to be turned into a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFields {
    pub id: ListingId,
    /// Output of [`crate::picture::encode_image_as_hex`]
    pub image_hex: String,
    pub description: String,
    pub price: Price,
    pub position: Position,
    /// Computed for every listing but not part of either document revision.
    pub position_quality: PositionQuality,
    /// Reserved by the server, always false at creation
    pub stuck: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceBody {
    pub currency: u16,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PositionBody {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurrentDocument {
    pub id: String,
    pub pict: String,
    pub description: String,
    pub price: PriceBody,
    pub position: PositionBody,
    pub stuck: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyDocument {
    #[serde(rename = "idThing")]
    pub id_thing: String,
    pub pict: String,
    pub desc: String,
    pub price: PriceBody,
    pub location: PositionBody,
    pub stuck: bool,
}

/// Body of `PUT /users/<user>/sellingThings/<id>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListingDocument {
    Current(CurrentDocument),
    Legacy(LegacyDocument),
}

impl ListingDocument {
    pub fn schema(&self) -> WireSchema {
        match self {
            Self::Current(_) => WireSchema::Current,
            Self::Legacy(_) => WireSchema::Legacy,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Current(doc) => &doc.id,
            Self::Legacy(doc) => &doc.id_thing,
        }
    }

    pub fn to_json(&self) -> Result<String, EncodingError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, EncodingError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Assemble the wire document for `fields`.
///
/// Fails without producing anything when a field cannot be represented:
/// a picture that is not uppercase hex, or a non-finite number.
pub fn build_listing_document(
    fields: &ListingFields,
    schema: WireSchema,
) -> Result<ListingDocument, EncodingError> {
    if !is_upper_hex(&fields.image_hex) {
        return Err(EncodingError::MalformedPicture(format!(
            "{} characters, expected even-length uppercase hex",
            fields.image_hex.len()
        )));
    }
    if !fields.position.lon.is_finite() {
        return Err(EncodingError::NonFiniteCoordinate { axis: "lon" });
    }
    if !fields.position.lat.is_finite() {
        return Err(EncodingError::NonFiniteCoordinate { axis: "lat" });
    }
    if !fields.price.amount.is_finite() {
        return Err(EncodingError::NonFinitePrice);
    }

    // The price is a 32-bit float widened to a JSON double
    let price = PriceBody {
        currency: fields.price.currency.0,
        price: f64::from(fields.price.amount),
    };
    let position = PositionBody {
        lon: fields.position.lon,
        lat: fields.position.lat,
    };

    Ok(match schema {
        WireSchema::Current => ListingDocument::Current(CurrentDocument {
            id: fields.id.0.clone(),
            pict: fields.image_hex.clone(),
            description: fields.description.clone(),
            price,
            position,
            stuck: fields.stuck,
        }),
        WireSchema::Legacy => ListingDocument::Legacy(LegacyDocument {
            id_thing: fields.id.0.clone(),
            pict: fields.image_hex.clone(),
            desc: fields.description.clone(),
            price,
            location: position,
            stuck: fields.stuck,
        }),
    })
}

/// An immutable listing together with its validated wire document.
#[derive(Debug, Clone)]
pub struct Listing {
    fields: ListingFields,
    document: ListingDocument,
}

impl Listing {
    pub fn assemble(fields: ListingFields, schema: WireSchema) -> Result<Self, EncodingError> {
        let document = build_listing_document(&fields, schema)?;
        Ok(Self { fields, document })
    }

    pub fn id(&self) -> &ListingId {
        &self.fields.id
    }

    pub fn fields(&self) -> &ListingFields {
        &self.fields
    }

    pub fn document(&self) -> &ListingDocument {
        &self.document
    }

    pub fn position_quality(&self) -> PositionQuality {
        self.fields.position_quality
    }

    pub fn to_json(&self) -> Result<String, EncodingError> {
        self.document.to_json()
    }

    pub fn into_document(self) -> ListingDocument {
        self.document
    }
}

/// Split `text` into slices of at most `len` characters for logging.
pub fn log_chunks(text: &str, len: usize) -> Vec<&str> {
    let len = len.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == len {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}
