//! Set command handler.

use anyhow::Result;
use wordloop_core::{ProgressStore, validate_playback_settings};

use crate::bootstrap::CliContext;
use crate::commands::SetArgs;
use crate::error::CliError;
use crate::presentation::format_settings;

/// Apply the given settings, or print the current ones when none are given.
///
/// The whole update is validated before anything is written.
pub async fn execute(ctx: &CliContext, args: &SetArgs) -> Result<()> {
    let update = args.to_update();
    let mut config = ctx.store.load().await?;
    if update.is_empty() {
        println!("{}", format_settings(&config));
        return Ok(());
    }

    update.merge_into(&mut config);
    validate_playback_settings(&config).map_err(CliError::from)?;

    let scheduler = &ctx.scheduler;
    if let Some(mode) = update.mode {
        scheduler.set_mode(mode).await.map_err(CliError::from)?;
    }
    if let Some(speed) = update.speed {
        scheduler.set_speed(speed).await.map_err(CliError::from)?;
    }
    if let Some(interval) = update.interval_secs {
        scheduler.set_interval(interval).await.map_err(CliError::from)?;
    }
    if let Some(count) = update.word_repeat_count {
        scheduler.set_repeat_count(count).await.map_err(CliError::from)?;
    }
    if let Some(random) = update.is_random {
        scheduler.set_random(random).await.map_err(CliError::from)?;
    }
    if let Some(looping) = update.is_loop {
        scheduler.set_loop(looping).await.map_err(CliError::from)?;
    }

    println!("{}", format_settings(&ctx.store.load().await?));
    Ok(())
}
