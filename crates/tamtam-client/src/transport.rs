//! HTTP transport for listing documents.
//!
//! The transport only sends: one `PUT` per listing, the response body is
//! ignored and any 2xx status counts as success. Retries are not attempted.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tamtam_shared::constants::SELLING_THINGS_PATH;
use tamtam_shared::{ListingId, UserId};
use tamtam_store::Preferences;

#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, timeout or client construction failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server answered {0}")]
    Status(u16),
}

/// Something able to deliver a serialized listing document.
pub trait ListingTransport: Send + Sync + 'static {
    /// `PUT` `body` (JSON) to `url`; returns the HTTP status on success.
    fn put_listing(
        &self,
        url: &str,
        body: String,
    ) -> impl Future<Output = Result<u16, TransportError>> + Send;
}

/// `<base>/users/<user>/sellingThings/<id>`
pub fn listing_url(base_url: &str, user_id: &UserId, id: &ListingId) -> String {
    format!(
        "{}/users/{}/{}/{}",
        base_url.trim_end_matches('/'),
        user_id,
        SELLING_THINGS_PATH,
        id
    )
}

/// `reqwest`-backed transport.  Clones share the same underlying client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<RwLock<reqwest::Client>>,
    timeout: Duration,
    generation: Arc<AtomicU64>,
}

impl HttpTransport {
    /// Build a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            client: Arc::new(RwLock::new(build_client(timeout)?)),
            timeout,
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Drop the current client (and its connection pool) and start afresh.
    pub fn reinit(&self) -> Result<(), TransportError> {
        let fresh = build_client(self.timeout)?;
        *self.client.write().unwrap_or_else(|e| e.into_inner()) = fresh;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "HTTP client re-initialized");
        Ok(())
    }

    /// How many times [`HttpTransport::reinit`] has run.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Re-initialize the client whenever the preferences change.
    ///
    /// The task ends when every preferences sender is gone.
    pub fn follow_preferences(&self, mut rx: watch::Receiver<Preferences>) -> JoinHandle<()> {
        let transport = self.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let base_url = rx.borrow_and_update().base_url();
                info!(base_url = %base_url, "Server preferences changed, resetting HTTP client");
                if let Err(e) = transport.reinit() {
                    warn!(error = %e, "Failed to rebuild HTTP client");
                }
            }
        })
    }

    fn client(&self) -> reqwest::Client {
        self.client.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ListingTransport for HttpTransport {
    async fn put_listing(&self, url: &str, body: String) -> Result<u16, TransportError> {
        let client = self.client();
        debug!(url, bytes = body.len(), "PUT listing");

        let response = client
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(status.as_u16())
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, TransportError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::PreferencesHandle;

    #[test]
    fn test_listing_url() {
        let url = listing_url(
            "http://systev.com:5003/",
            &UserId("idUser0".to_string()),
            &ListingId("phone0000015737CD8BFB".to_string()),
        );
        assert_eq!(
            url,
            "http://systev.com:5003/users/idUser0/sellingThings/phone0000015737CD8BFB"
        );
    }

    #[tokio::test]
    async fn test_reinit_on_preference_change() {
        let dir = tempfile::tempdir().unwrap();
        let db = tamtam_store::Database::open_at(&dir.path().join("t.db")).unwrap();
        let handle = PreferencesHandle::new(db.load_preferences().unwrap());

        let transport = HttpTransport::new(Duration::from_secs(1)).unwrap();
        let follower = transport.follow_preferences(handle.subscribe());
        assert_eq!(transport.generation(), 0);

        handle.update(&db, |p| p.server_port = 6002).unwrap();
        for _ in 0..50 {
            if transport.generation() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(transport.generation(), 1);

        drop(handle);
        tokio::time::timeout(Duration::from_secs(1), follower)
            .await
            .expect("follower stops once preferences are dropped")
            .unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let transport = HttpTransport::new(Duration::from_secs(1)).unwrap();
        let result = transport
            .put_listing("http://127.0.0.1:9/users/u/sellingThings/x", "{}".to_string())
            .await;
        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
