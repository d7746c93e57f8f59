//! Command handlers behind the `tamtam` binary.
//!
//! Each sub-module groups related commands by domain.  Handlers receive the
//! shared [`CommandContext`] and print their result to stdout; diagnostics
//! go through `tracing`.

pub mod location;
pub mod publish;
pub mod settings;

use tamtam_store::Database;

use crate::applog::LogHub;
use crate::config::ClientConfig;

/// Everything a command handler may need.
pub struct CommandContext {
    pub db: Database,
    pub config: ClientConfig,
    pub log: LogHub,
}
