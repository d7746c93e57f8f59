//! Publication pipeline.
//!
//! [`Publisher::prepare`] runs synchronously when the seller confirms: it
//! parses the price, resolves the position, builds the identifier, encodes
//! the picture and assembles the document. [`Publisher::dispatch`] then hands
//! the document to the transport on a background task and forgets it.

use std::sync::Arc;

use image::DynamicImage;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use tamtam_shared::constants::LOG_CHUNK_LEN;
use tamtam_shared::listing::log_chunks;
use tamtam_shared::{
    encode_image_as_hex, generate_identifier, parse_price, CurrencyCode, DeviceTag,
    EncodingError, JpegQuality, Listing, ListingFields, ListingId, LocationSession, Price,
    PriceError, PricePolicy, UserId, WireSchema,
};
use tamtam_store::Preferences;

use crate::transport::{listing_url, ListingTransport, TransportError};

/// Why a listing could not be prepared. Nothing is sent in either case.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Price(#[from] PriceError),
}

/// The part of the preferences the pipeline needs.
#[derive(Debug, Clone)]
pub struct PublishSettings {
    /// Scheme, host and port of the listing server.
    pub base_url: String,
    /// Account the listing is published under.
    pub user_id: UserId,
    /// Prefix of every identifier generated on this device.
    pub device_tag: DeviceTag,
    /// Currency attached to the price.
    pub currency: CurrencyCode,
    /// Recompression quality of the picture.
    pub jpeg_quality: JpegQuality,
    /// Handling of a price field that is not a number.
    pub price_policy: PricePolicy,
    /// Document revision sent to the server.
    pub wire_schema: WireSchema,
}

impl From<&Preferences> for PublishSettings {
    fn from(prefs: &Preferences) -> Self {
        Self {
            base_url: prefs.base_url(),
            user_id: prefs.user_id.clone(),
            device_tag: prefs.device_tag.clone(),
            currency: prefs.currency,
            jpeg_quality: prefs.jpeg_quality,
            price_policy: prefs.price_policy,
            wire_schema: prefs.wire_schema,
        }
    }
}

/// What the seller entered on the selling screen.
pub struct PublishDraft {
    /// Photo of the item, already downscaled if a thumbnail is wanted.
    pub picture: DynamicImage,
    pub description: String,
    /// Raw text of the price field
    pub price_text: String,
}

/// A listing ready to be sent.
#[derive(Debug)]
pub struct PreparedListing {
    pub listing: Listing,
    /// Target of the `PUT`.
    pub url: String,
    /// Serialized document, exactly as it will be sent.
    pub body: String,
}

/// Result of a background send.
#[derive(Debug)]
pub enum PublishOutcome {
    /// The server answered with a 2xx `status`.
    Accepted { id: ListingId, status: u16 },
    /// The request failed or the server refused it. Not retried.
    Failed { id: ListingId, error: TransportError },
}

impl PublishOutcome {
    /// Identifier of the listing this outcome is about.
    pub fn id(&self) -> &ListingId {
        match self {
            Self::Accepted { id, .. } | Self::Failed { id, .. } => id,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Prepares listings from drafts and hands them to a [`ListingTransport`].
pub struct Publisher<T> {
    transport: Arc<T>,
    settings: PublishSettings,
}

impl<T: ListingTransport> Publisher<T> {
    pub fn new(transport: Arc<T>, settings: PublishSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Settings captured when the publisher was created.
    pub fn settings(&self) -> &PublishSettings {
        &self.settings
    }

    /// Build the listing for `draft`.  Nothing is sent.
    pub fn prepare(
        &self,
        draft: &PublishDraft,
        location: &LocationSession,
    ) -> Result<PreparedListing, PublishError> {
        let amount = parse_price(&draft.price_text, self.settings.price_policy)?;
        let resolved = location.resolve();
        let id = generate_identifier(&self.settings.device_tag);
        let image_hex = encode_image_as_hex(&draft.picture, self.settings.jpeg_quality)?;

        let fields = ListingFields {
            id,
            image_hex,
            description: draft.description.clone(),
            price: Price {
                currency: self.settings.currency,
                amount,
            },
            position: resolved.position,
            position_quality: resolved.quality,
            stuck: false,
        };
        let listing = Listing::assemble(fields, self.settings.wire_schema)?;
        let body = listing.to_json()?;

        for chunk in log_chunks(&body, LOG_CHUNK_LEN) {
            debug!(target: "tamtam_client::publish::document", "{chunk}");
        }

        let url = listing_url(&self.settings.base_url, &self.settings.user_id, listing.id());
        info!(
            id = %listing.id(),
            quality = %resolved.quality,
            lon = resolved.position.lon,
            lat = resolved.position.lat,
            bytes = body.len(),
            "Listing prepared"
        );

        Ok(PreparedListing { listing, url, body })
    }

    /// Send `prepared` in the background.  Failures are logged and reported
    /// in the outcome; nothing is retried.
    pub fn dispatch(&self, prepared: PreparedListing) -> JoinHandle<PublishOutcome> {
        let transport = Arc::clone(&self.transport);
        let PreparedListing { listing, url, body } = prepared;
        let id = listing.id().clone();
        drop(listing);

        tokio::spawn(async move {
            debug!(url = %url, "Sending listing");
            match transport.put_listing(&url, body).await {
                Ok(status) => {
                    info!(id = %id, status, "Successful response");
                    PublishOutcome::Accepted { id, status }
                }
                Err(e) => {
                    error!(id = %id, error = %e, "Publish failed");
                    PublishOutcome::Failed { id, error: e }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use image::{ImageBuffer, Rgb};
    use tamtam_shared::picture::decode_hex;
    use tamtam_shared::{Position, PositionQuality};

    /// Records every request instead of sending it.
    #[derive(Default)]
    struct RecordingTransport {
        requests: Mutex<Vec<(String, String)>>,
        status: Option<u16>,
    }

    impl ListingTransport for RecordingTransport {
        async fn put_listing(&self, url: &str, body: String) -> Result<u16, TransportError> {
            self.requests.lock().unwrap().push((url.to_string(), body));
            match self.status {
                Some(code) if !(200..300).contains(&code) => Err(TransportError::Status(code)),
                Some(code) => Ok(code),
                None => Ok(200),
            }
        }
    }

    fn settings() -> PublishSettings {
        PublishSettings {
            base_url: "http://localhost:5003".to_string(),
            user_id: UserId("idUser0".to_string()),
            device_tag: DeviceTag::new("phone").unwrap(),
            currency: CurrencyCode(978),
            jpeg_quality: JpegQuality::default(),
            price_policy: PricePolicy::Lenient,
            wire_schema: WireSchema::Current,
        }
    }

    fn draft(price: &str) -> PublishDraft {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(24, 16, |x, _| Rgb([x as u8 * 10, 0, 200]));
        PublishDraft {
            picture: DynamicImage::ImageRgb8(img),
            description: "old bike".to_string(),
            price_text: price.to_string(),
        }
    }

    #[test]
    fn test_prepare_known_position() {
        let publisher = Publisher::new(Arc::new(RecordingTransport::default()), settings());
        let mut session = LocationSession::start(None);
        session.record_fix(Position::new(2.35, 48.85));

        let prepared = publisher.prepare(&draft("15.5"), &session).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&prepared.body).unwrap();

        assert_eq!(prepared.listing.position_quality(), PositionQuality::Known);
        assert_eq!(doc["description"], "old bike");
        assert_eq!(doc["price"], serde_json::json!({"currency": 978, "price": 15.5}));
        assert_eq!(doc["position"], serde_json::json!({"lon": 2.35, "lat": 48.85}));
        assert_eq!(doc["stuck"], false);

        let id = doc["id"].as_str().unwrap();
        assert!(id.starts_with("phone"));
        assert_eq!(id.len(), "phone".len() + 16);
        assert_eq!(
            prepared.url,
            format!("http://localhost:5003/users/idUser0/sellingThings/{id}")
        );

        let jpeg = decode_hex(doc["pict"].as_str().unwrap()).unwrap();
        assert!(image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg).is_ok());
    }

    #[test]
    fn test_prepare_without_location() {
        let publisher = Publisher::new(Arc::new(RecordingTransport::default()), settings());
        let prepared = publisher
            .prepare(&draft("abc"), &LocationSession::start(None))
            .unwrap();
        let doc: serde_json::Value = serde_json::from_str(&prepared.body).unwrap();

        assert_eq!(prepared.listing.position_quality(), PositionQuality::NotKnown);
        assert_eq!(doc["position"], serde_json::json!({"lon": 0.0, "lat": 0.0}));
        assert_eq!(doc["price"]["price"], 0.0);
    }

    #[test]
    fn test_strict_policy_rejects_bad_price() {
        let mut strict = settings();
        strict.price_policy = PricePolicy::Strict;
        let publisher = Publisher::new(Arc::new(RecordingTransport::default()), strict);

        let err = publisher
            .prepare(&draft("abc"), &LocationSession::start(None))
            .unwrap_err();
        assert!(matches!(err, PublishError::Price(_)));
    }

    #[test]
    fn test_legacy_schema() {
        let mut legacy = settings();
        legacy.wire_schema = WireSchema::Legacy;
        let publisher = Publisher::new(Arc::new(RecordingTransport::default()), legacy);

        let session = LocationSession::start(Some(Position::new(2.30, 48.80)));
        let prepared = publisher.prepare(&draft("3"), &session).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&prepared.body).unwrap();

        assert!(doc.get("idThing").is_some());
        assert_eq!(doc["location"], serde_json::json!({"lon": 2.30, "lat": 48.80}));
        assert_eq!(prepared.listing.position_quality(), PositionQuality::LastKnown);
    }

    #[tokio::test]
    async fn test_dispatch_sends_once() {
        let transport = Arc::new(RecordingTransport::default());
        let publisher = Publisher::new(Arc::clone(&transport), settings());
        let prepared = publisher
            .prepare(&draft("1"), &LocationSession::start(None))
            .unwrap();
        let (url, body) = (prepared.url.clone(), prepared.body.clone());

        let outcome = publisher.dispatch(prepared).await.unwrap();
        assert!(outcome.is_accepted());

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.as_slice(), &[(url, body)]);
    }

    #[tokio::test]
    async fn test_dispatch_reports_failure_without_retry() {
        let transport = Arc::new(RecordingTransport {
            status: Some(500),
            ..Default::default()
        });
        let publisher = Publisher::new(Arc::clone(&transport), settings());
        let prepared = publisher
            .prepare(&draft("1"), &LocationSession::start(None))
            .unwrap();

        let outcome = publisher.dispatch(prepared).await.unwrap();
        assert!(matches!(
            outcome,
            PublishOutcome::Failed {
                error: TransportError::Status(500),
                ..
            }
        ));
        assert_eq!(transport.requests.lock().unwrap().len(), 1);
    }
}
