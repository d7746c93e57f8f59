use thiserror::Error;

use tamtam_shared::EncodingError;
use tamtam_store::StoreError;

use crate::publish::PublishError;
use crate::transport::TransportError;

/// Errors surfaced by the command handlers.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Publish task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
