//! Word command handlers.

use anyhow::Result;
use wordloop_core::Word;
use wordloop_db::NewWord;

use crate::bootstrap::CliContext;
use crate::commands::WordCommand;
use crate::error::CliError;
use crate::presentation::{format_optional, print_separator, truncate_string};

pub async fn execute(ctx: &CliContext, command: WordCommand) -> Result<()> {
    match command {
        WordCommand::Add {
            text,
            meaning,
            library,
            native,
            pos,
            language_tag,
            logographic,
        } => {
            if text.trim().is_empty() || meaning.trim().is_empty() {
                return Err(CliError::Arguments("text and meaning are required".into()).into());
            }
            let library = ctx.library_or_active(library).await?;
            let word = NewWord {
                native_form: native,
                part_of_speech: pos,
                language_tag,
                is_logographic: logographic,
                ..NewWord::new(text, meaning)
            };
            let added = ctx
                .words
                .add_words(library, &[word])
                .await
                .map_err(CliError::from)?;
            for word in &added {
                println!("Added #{} '{}' to group {}", word.id, word.text, word.group_id);
            }
            Ok(())
        }
        WordCommand::List { library, group } => {
            let library = ctx.library_or_active(library).await?;
            let words: Vec<Word> = ctx
                .words
                .library_words(library)
                .await
                .map_err(CliError::from)?
                .into_iter()
                .filter(|w| group.is_none_or(|g| w.group_id == g))
                .collect();
            print_words(&words);
            Ok(())
        }
        WordCommand::Search { query, limit } => {
            let words = ctx
                .words
                .search(&query, limit)
                .await
                .map_err(CliError::from)?;
            print_words(&words);
            Ok(())
        }
    }
}

fn print_words(words: &[Word]) {
    if words.is_empty() {
        println!("No words found.");
        return;
    }

    println!(
        "{:<6} {:<5} {:<24} {:<24} {:<6} POS",
        "ID", "Group", "Word", "Meaning", "Lang"
    );
    print_separator(76);
    for word in words {
        println!(
            "{:<6} {:<5} {:<24} {:<24} {:<6} {}",
            word.id,
            word.group_id,
            truncate_string(word.display_text(), 23),
            truncate_string(&word.meaning, 23),
            word.language_tag,
            format_optional(word.part_of_speech.as_ref(), "--"),
        );
    }
}
