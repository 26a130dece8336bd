//! Next / previous command handlers.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::format_word_line;

/// Move one word forward or back and print where the player now stands.
pub async fn execute(ctx: &CliContext, forward: bool) -> Result<()> {
    let before = ctx.scheduler.refresh().await?;
    if before.word_count == 0 {
        println!("Nothing selected.");
        return Ok(());
    }

    if forward {
        ctx.scheduler.next().await?;
    } else {
        ctx.scheduler.previous().await?;
    }

    let after = ctx.scheduler.state();
    if forward && after.current_index == before.current_index && !after.is_loop {
        println!("Already at the last word.");
    }
    if let Some(word) = &after.current_word {
        println!("{}", format_word_line(&after, word));
    }
    Ok(())
}
