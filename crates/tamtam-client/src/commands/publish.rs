//! `tamtam publish`: photo in, listing out.
//!
//! Stands in for the camera and location subsystems: the photo comes from a
//! file and an explicit `--lon/--lat` pair plays the part of a fresh fix.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use tracing::info;

use tamtam_shared::constants::{THUMBNAIL_MAX_HEIGHT, THUMBNAIL_MAX_WIDTH};
use tamtam_shared::picture::{load_picture, thumbnail_jpeg};
use tamtam_shared::{LocationSession, Position};
use tamtam_store::CachedFix;

use crate::commands::CommandContext;
use crate::error::ClientError;
use crate::publish::{PreparedListing, PublishDraft, PublishOutcome, PublishSettings, Publisher};
use crate::transport::HttpTransport;

#[derive(Debug, Clone, Args)]
pub struct PublishArgs {
    /// Photo of the item (JPEG, PNG or WebP)
    #[arg(long)]
    pub image: PathBuf,

    /// Free-text description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Price as typed by the seller
    #[arg(long, default_value = "")]
    pub price: String,

    /// Longitude of a fix received now
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Latitude of a fix received now
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Send the photo at full resolution instead of a thumbnail
    #[arg(long)]
    pub full_size: bool,

    /// Print the document instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the in-app log when done
    #[arg(long)]
    pub show_log: bool,
}

/// What [`execute`] did with the prepared listing.
#[derive(Debug)]
pub enum Executed {
    /// `--dry-run`: the listing was built but not sent.
    DryRun(PreparedListing),
    /// The listing was sent and the transport reported back.
    Sent(PublishOutcome),
}

pub async fn run(ctx: &CommandContext, args: PublishArgs) -> Result<(), ClientError> {
    let show_log = args.show_log;
    let executed = execute(ctx, args).await;

    if show_log {
        for entry in ctx.log.snapshot() {
            println!("{entry}");
        }
    }

    match executed? {
        Executed::DryRun(prepared) => {
            println!("PUT {}", prepared.url);
            println!("{}", serde_json::to_string_pretty(prepared.listing.document())?);
            Ok(())
        }
        Executed::Sent(PublishOutcome::Accepted { id, status }) => {
            println!("Published {id} ({status})");
            Ok(())
        }
        Executed::Sent(PublishOutcome::Failed { error, .. }) => Err(ClientError::Transport(error)),
    }
}

/// Load the photo, resolve the position, build the listing and send it
/// unless `--dry-run` is set. A fix given with `--lon/--lat` is cached for
/// later sessions whether or not the listing goes out.
pub async fn execute(ctx: &CommandContext, args: PublishArgs) -> Result<Executed, ClientError> {
    let mut prefs = ctx.db.load_preferences()?;
    ctx.config.apply(&mut prefs);

    // Picture: the file handle only lives for the read
    let bytes = tokio::fs::read(&args.image).await?;
    let picture = if args.full_size {
        load_picture(&bytes)?
    } else {
        thumbnail_jpeg(&bytes, THUMBNAIL_MAX_WIDTH, THUMBNAIL_MAX_HEIGHT)?
    };
    drop(bytes);

    let mut session = LocationSession::start(ctx.db.load_last_fix()?.map(|fix| fix.position));
    if let (Some(lon), Some(lat)) = (args.lon, args.lat) {
        session.record_fix(Position::new(lon, lat));
    }

    let transport = Arc::new(HttpTransport::new(ctx.config.request_timeout)?);
    let publisher = Publisher::new(transport, PublishSettings::from(&prefs));

    let draft = PublishDraft {
        picture,
        description: args.description,
        price_text: args.price,
    };
    let prepared = publisher.prepare(&draft, &session)?;

    if let (true, Some(position)) = (session.has_fresh_fix(), session.latest()) {
        ctx.db.save_last_fix(&CachedFix {
            position,
            recorded_at: Utc::now(),
        })?;
        info!(lon = position.lon, lat = position.lat, "Position cached for later sessions");
    }

    if args.dry_run {
        return Ok(Executed::DryRun(prepared));
    }
    Ok(Executed::Sent(publisher.dispatch(prepared).await?))
}
