//! Play command handler.
//!
//! Starts the scheduler and follows its state until the list is exhausted,
//! the user presses Ctrl-C, or the requested duration elapses.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};
use wordloop_core::WordId;
use wordloop_speech::SpeechNotice;

use crate::bootstrap::CliContext;
use crate::commands::PlayArgs;
use crate::presentation::format_word_line;

/// Why the play loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayEnd {
    /// The session ended on its own.
    Finished,
    /// Ctrl-C.
    Interrupted,
    /// `--duration` elapsed.
    TimedOut,
    /// Nothing to play.
    Empty,
}

pub async fn execute(ctx: &CliContext, args: &PlayArgs) -> Result<()> {
    match run(ctx, args).await? {
        PlayEnd::Empty => {
            println!("Nothing selected. Use 'wordloop library select <groups>'.");
        }
        PlayEnd::Interrupted => println!("\nStopped."),
        PlayEnd::Finished | PlayEnd::TimedOut => {}
    }
    Ok(())
}

/// Play and print each new word; returns once playback has stopped.
pub async fn run(ctx: &CliContext, args: &PlayArgs) -> Result<PlayEnd> {
    if !args.groups.is_empty() {
        let library = ctx.library_or_active(args.library).await?;
        ctx.scheduler.select_groups(library, &args.groups).await?;
    }

    let mut states = ctx.scheduler.subscribe();
    let initial = ctx.scheduler.refresh().await?;
    if initial.word_count == 0 {
        return Ok(PlayEnd::Empty);
    }
    states.mark_unchanged();

    let mut notices = ctx.queue.subscribe_notices();
    ctx.scheduler.start().await?;
    info!(words = initial.word_count, "Playing");

    let deadline = async {
        match args.duration {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let mut shown: Option<WordId> = None;
    let end = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break PlayEnd::Interrupted,
            () = &mut deadline => break PlayEnd::TimedOut,
            notice = notices.recv() => match notice {
                Ok(SpeechNotice::UnsupportedLanguage { locale }) => {
                    eprintln!("No voice for {locale}, using the default voice");
                }
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Missed speech notices"),
                Err(RecvError::Closed) => break PlayEnd::Finished,
            },
            changed = states.changed() => {
                if changed.is_err() {
                    break PlayEnd::Finished;
                }
                let state = states.borrow_and_update().clone();
                if let Some(word) = &state.current_word {
                    if shown != Some(word.id) {
                        println!("{}", format_word_line(&state, word));
                        shown = Some(word.id);
                    }
                }
                if !state.is_playing {
                    break PlayEnd::Finished;
                }
            }
        }
    };

    ctx.scheduler.stop().await;
    debug!(?end, "Play loop ended");
    Ok(end)
}
