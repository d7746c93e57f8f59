//! # tamtam
//!
//! Command-line front end for publishing listings to a TamTam server.

use clap::{Parser, Subcommand};
use tracing::info;

use tamtam_client::applog::LogHub;
use tamtam_client::commands::location::LocationCommand;
use tamtam_client::commands::publish::PublishArgs;
use tamtam_client::commands::settings::SettingsCommand;
use tamtam_client::commands::{self, CommandContext};
use tamtam_client::config::ClientConfig;
use tamtam_shared::constants::APP_NAME;

#[derive(Parser)]
#[command(name = "tamtam")]
#[command(about = "Publish items for sale to a TamTam listing server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a photo and publish it as a listing
    Publish(PublishArgs),

    /// Show or edit the stored preferences
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Manage the position cached between sessions
    #[command(subcommand)]
    Location(LocationCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log = LogHub::new();
    tamtam_client::init_tracing(&log);
    info!("Starting {} client v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    let db = config.open_database()?;
    let ctx = CommandContext { db, config, log };

    match cli.command {
        Command::Publish(args) => commands::publish::run(&ctx, args).await?,
        Command::Settings(command) => commands::settings::run(&ctx, command)?,
        Command::Location(command) => commands::location::run(&ctx, command)?,
    }

    Ok(())
}
