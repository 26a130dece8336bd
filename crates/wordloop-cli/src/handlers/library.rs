//! Library command handlers.

use anyhow::Result;
use chrono::{DateTime, Utc};
use wordloop_core::{GroupId, LibraryId, ProgressStore, WordSource};

use crate::bootstrap::CliContext;
use crate::commands::LibraryCommand;
use crate::error::CliError;
use crate::presentation::{print_separator, truncate_string};

pub async fn execute(ctx: &CliContext, command: LibraryCommand) -> Result<()> {
    match command {
        LibraryCommand::List => list(ctx).await,
        LibraryCommand::Create { name, language_tag } => {
            let library = ctx
                .words
                .create_library(&name, &language_tag)
                .await
                .map_err(CliError::from)?;
            println!("Created library #{} '{}'", library.id, library.name);
            if library.is_active {
                println!("It is now the active library.");
            }
            Ok(())
        }
        LibraryCommand::Activate { id } => activate(ctx, id).await,
        LibraryCommand::Delete { id } => delete(ctx, id).await,
        LibraryCommand::Groups { id } => groups(ctx, id).await,
        LibraryCommand::Select { groups, library } => {
            let library = ctx.library_or_active(library).await?;
            ctx.scheduler
                .select_groups(library, &groups)
                .await
                .map_err(CliError::from)?;
            let state = ctx.scheduler.state();
            println!(
                "Selected {} group(s), {} word(s).",
                groups.len(),
                state.word_count
            );
            Ok(())
        }
        LibraryCommand::Review { groups, library } => review(ctx, library, &groups).await,
        LibraryCommand::ResetDay { id } => {
            let id = ctx.library_or_active(id).await?;
            ctx.tracker
                .reset_daily_marks(id)
                .await
                .map_err(CliError::from)?;
            println!("Cleared today's marks for library #{id}.");
            Ok(())
        }
    }
}

/// Mark groups reviewed and write the marks right away.
async fn review(ctx: &CliContext, library: Option<LibraryId>, groups: &[GroupId]) -> Result<()> {
    let library = ctx.library_or_active(library).await?;
    let known: Vec<GroupId> = ctx
        .words
        .groups(library)
        .await
        .map_err(CliError::from)?
        .iter()
        .map(|g| g.group_id)
        .collect();
    if let Some(missing) = groups.iter().find(|g| !known.contains(*g)) {
        return Err(CliError::NotFound(format!("Group {missing} in library #{library}")).into());
    }

    ctx.tracker.record_groups_reviewed(library, groups);
    ctx.tracker.flush().await.map_err(CliError::from)?;
    println!("Marked {} group(s) reviewed.", groups.len());
    Ok(())
}

async fn list(ctx: &CliContext) -> Result<()> {
    let libraries = ctx.words.list_libraries().await.map_err(CliError::from)?;
    if libraries.is_empty() {
        println!("No libraries yet.");
        println!("Use 'wordloop library create <name>' to add one.");
        return Ok(());
    }

    println!("{:<2} {:<4} {:<30} {:<8} Words", "", "ID", "Name", "Lang");
    print_separator(56);
    for library in libraries {
        let words = ctx.words.library_words(library.id).await?.len();
        println!(
            "{:<2} {:<4} {:<30} {:<8} {}",
            if library.is_active { "*" } else { "" },
            library.id,
            truncate_string(&library.name, 29),
            library.language_tag,
            words
        );
    }
    Ok(())
}

/// Activate a library and point the player at it.
///
/// When the player had nothing selected (or pointed at another library), the
/// first group of the new library is selected.
async fn activate(ctx: &CliContext, id: LibraryId) -> Result<()> {
    ctx.words.activate_library(id).await.map_err(CliError::from)?;

    let config = ctx.store.load().await?;
    if config.active_library_id != Some(id) || config.selected_group_ids.is_empty() {
        let first = ctx
            .words
            .groups(id)
            .await?
            .first()
            .map(|g| g.group_id);
        let groups: Vec<_> = first.into_iter().collect();
        ctx.scheduler
            .select_groups(id, &groups)
            .await
            .map_err(CliError::from)?;
    }

    println!("Library #{id} is active.");
    Ok(())
}

async fn delete(ctx: &CliContext, id: LibraryId) -> Result<()> {
    let library = ctx
        .words
        .library(id)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("Library with ID {id}")))?;

    let config = ctx.store.load().await?;
    if config.active_library_id == Some(id) {
        ctx.scheduler.stop().await;
        ctx.store.set_selection(None, &[]).await?;
        ctx.store.set_current_index(0).await?;
    }
    ctx.words.delete_library(id).await.map_err(CliError::from)?;

    println!("Deleted library #{id} '{}'.", library.name);
    Ok(())
}

fn format_day(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "--".to_string(), |at| at.format("%Y-%m-%d").to_string())
}

async fn groups(ctx: &CliContext, id: Option<LibraryId>) -> Result<()> {
    let id = ctx.library_or_active(id).await?;
    let groups = ctx.words.groups(id).await.map_err(CliError::from)?;
    if groups.is_empty() {
        println!("Library #{id} has no words.");
        return Ok(());
    }

    let selected = ctx.store.load().await?;
    let is_selected = |group: GroupId| {
        selected.active_library_id == Some(id) && selected.selected_group_ids.contains(&group)
    };

    println!(
        "{:<2} {:<6} {:<6} {:<9} {:<9} {:<6} {:<13} Last reviewed",
        "", "Group", "Words", "Listened", "Reviewed", "Today", "Last listened"
    );
    print_separator(80);
    for group in groups {
        let today = match (group.listened_today, group.reviewed_today) {
            (true, true) => "L R",
            (true, false) => "L",
            (false, true) => "R",
            (false, false) => "",
        };
        println!(
            "{:<2} {:<6} {:<6} {:<9} {:<9} {:<6} {:<13} {}",
            if is_selected(group.group_id) { "*" } else { "" },
            group.group_id,
            group.word_count,
            format!("{}/{}", group.listened_words, group.word_count),
            format!("{}/{}", group.reviewed_words, group.word_count),
            today,
            format_day(group.last_listened_at),
            format_day(group.last_reviewed_at)
        );
    }
    Ok(())
}
