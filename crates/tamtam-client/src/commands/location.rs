use chrono::Utc;
use clap::Subcommand;

use tamtam_shared::Position;
use tamtam_store::CachedFix;

use crate::commands::CommandContext;
use crate::error::ClientError;

#[derive(Debug, Clone, Subcommand)]
pub enum LocationCommand {
    /// Print the fix cached from earlier sessions
    Show,
    /// Cache a fix, as if the location subsystem had delivered it
    Record {
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
    },
    /// Forget the cached fix
    Forget,
}

pub fn run(ctx: &CommandContext, command: LocationCommand) -> Result<(), ClientError> {
    match command {
        LocationCommand::Show => {
            match ctx.db.load_last_fix()? {
                Some(fix) => println!(
                    "lon={} lat={} recorded_at={}",
                    fix.position.lon,
                    fix.position.lat,
                    fix.recorded_at.to_rfc3339()
                ),
                None => println!("No cached position"),
            }
            Ok(())
        }
        LocationCommand::Record { lon, lat } => {
            let fix = CachedFix {
                position: Position::new(lon, lat),
                recorded_at: Utc::now(),
            };
            ctx.db.save_last_fix(&fix)?;
            tracing::info!(lon, lat, "Position cached");
            Ok(())
        }
        LocationCommand::Forget => {
            if ctx.db.clear_last_fix()? {
                println!("Cached position removed");
            } else {
                println!("No cached position");
            }
            Ok(())
        }
    }
}
