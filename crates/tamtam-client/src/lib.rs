//! # tamtam-client
//!
//! Publishing side of the TamTam client: configuration, preferences, the
//! HTTP transport, the publish pipeline and the in-app log. The `tamtam`
//! binary in `main.rs` drives these from the command line.

pub mod applog;
pub mod commands;
pub mod config;
pub mod error;
pub mod preferences;
pub mod publish;
pub mod transport;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::applog::LogHub;

pub use error::ClientError;

/// Install the global tracing subscriber: `RUST_LOG` filtering, terminal
/// output, and `hub` receiving every event that passes the filter.
pub fn init_tracing(hub: &LogHub) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("tamtam=info,tamtam_client=info,tamtam_shared=info,tamtam_store=info,warn")
    });

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr),
        )
        .with(hub.layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
