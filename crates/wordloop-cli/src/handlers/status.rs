//! Status command handler.

use anyhow::Result;
use chrono::Local;
use wordloop_core::{ProgressStore, WordSource};

use crate::bootstrap::CliContext;
use crate::presentation::{format_settings, format_word_line};

/// Show the stored selection, position and settings.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let config = ctx.store.load().await?;
    let state = ctx.scheduler.refresh().await?;

    let library = match config.active_library_id {
        Some(id) => ctx.words.library(id).await?,
        None => ctx.words.active_library().await?,
    };
    match &library {
        Some(library) => println!("library  = {} (#{})", library.name, library.id),
        None => println!("library  = --"),
    }
    let groups = if config.selected_group_ids.is_empty() {
        "--".to_string()
    } else {
        config.selected_groups_text()
    };
    println!("groups   = {groups}");
    println!("words    = {}", state.word_count);
    println!("{}", format_settings(&config));

    let last_played = config.last_played_at.map_or_else(
        || "never".to_string(),
        |at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    );
    println!("played   = {last_played}");

    match &state.current_word {
        Some(word) => println!("\n{}", format_word_line(&state, word)),
        None if state.word_count == 0 => {
            println!("\nNothing selected. Use 'wordloop library select <groups>'.");
        }
        None => println!("\nStored position is past the end of the selection."),
    }
    Ok(())
}
