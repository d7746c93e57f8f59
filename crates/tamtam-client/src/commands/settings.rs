use clap::{Args, Subcommand};

use tamtam_shared::{CurrencyCode, DeviceTag, JpegQuality, PricePolicy, UserId, WireSchema};

use crate::commands::CommandContext;
use crate::error::ClientError;
use crate::preferences::PreferencesHandle;

#[derive(Debug, Clone, Subcommand)]
pub enum SettingsCommand {
    /// Print the stored preferences
    Show,
    /// Change one or more stored preferences
    Set(SetArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct SetArgs {
    /// Scheme and host, e.g. http://systev.com
    #[arg(long)]
    pub server_host: Option<String>,

    #[arg(long)]
    pub server_port: Option<u16>,

    #[arg(long)]
    pub user_id: Option<String>,

    #[arg(long, value_parser = parse_device_tag)]
    pub device_tag: Option<DeviceTag>,

    /// ISO 4217 numeric currency code
    #[arg(long)]
    pub currency: Option<u16>,

    /// JPEG quality, 0-100
    #[arg(long, value_parser = parse_quality)]
    pub quality: Option<JpegQuality>,

    /// `lenient` (bad prices become 0.0) or `strict`
    #[arg(long)]
    pub price_policy: Option<PricePolicy>,

    /// `current` or `legacy`
    #[arg(long)]
    pub schema: Option<WireSchema>,
}

fn parse_device_tag(s: &str) -> Result<DeviceTag, String> {
    DeviceTag::new(s).map_err(|e| e.to_string())
}

fn parse_quality(s: &str) -> Result<JpegQuality, String> {
    let value: u8 = s.parse().map_err(|e| format!("{e}"))?;
    JpegQuality::new(value).map_err(|e| e.to_string())
}

pub fn run(ctx: &CommandContext, command: SettingsCommand) -> Result<(), ClientError> {
    match command {
        SettingsCommand::Show => {
            let prefs = ctx.db.load_preferences()?;
            println!("{}", serde_json::to_string_pretty(&prefs)?);
            println!("listing server: {}", prefs.base_url());
            Ok(())
        }
        SettingsCommand::Set(args) => {
            let handle = PreferencesHandle::new(ctx.db.load_preferences()?);
            let changed = apply_set(&ctx.db, &handle, args)?;
            if changed {
                println!("Preferences saved");
            } else {
                println!("Nothing changed");
            }
            Ok(())
        }
    }
}

/// Write every provided value through `handle`.
pub fn apply_set(
    db: &tamtam_store::Database,
    handle: &PreferencesHandle,
    args: SetArgs,
) -> Result<bool, ClientError> {
    Ok(handle.update(db, |prefs| {
        if let Some(host) = args.server_host {
            prefs.server_host = host;
        }
        if let Some(port) = args.server_port {
            prefs.server_port = port;
        }
        if let Some(user) = args.user_id {
            prefs.user_id = UserId(user);
        }
        if let Some(tag) = args.device_tag {
            prefs.device_tag = tag;
        }
        if let Some(code) = args.currency {
            prefs.currency = CurrencyCode(code);
        }
        if let Some(quality) = args.quality {
            prefs.jpeg_quality = quality;
        }
        if let Some(policy) = args.price_policy {
            prefs.price_policy = policy;
        }
        if let Some(schema) = args.schema {
            prefs.wire_schema = schema;
        }
    })?)
}
