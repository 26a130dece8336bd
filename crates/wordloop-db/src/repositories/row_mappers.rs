//! Row mapping helpers for `SQLite` queries.

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use wordloop_core::{
    DEFAULT_REPEAT_COUNT, PlaybackConfiguration, PlaybackMode, RepositoryError, Word,
    WordLibrary, decode_group_ids,
};

/// Shared SELECT column list for the progress row.
pub const PROGRESS_SELECT_COLUMNS: &str = "active_library_id, selected_group_ids, current_index, mode, speed, interval_secs, is_random, is_loop, word_repeat_count, last_played_at";

/// Shared SELECT column list for word queries.
pub const WORD_SELECT_COLUMNS: &str = "id, library_id, group_id, text, native_form, meaning, part_of_speech, language_tag, is_logographic";

/// Shared SELECT column list for library queries.
pub const LIBRARY_SELECT_COLUMNS: &str = "id, name, language_tag, is_active";

/// Map a driver error, keeping unique/foreign-key violations distinct.
pub fn storage_error(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
            RepositoryError::Constraint(db.message().to_string())
        }
        _ => RepositoryError::Storage(e.to_string()),
    }
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Parse a stored timestamp: RFC 3339, or `SQLite`'s `datetime('now')` form.
pub fn parse_timestamp(text: Option<String>) -> Option<DateTime<Utc>> {
    text.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(s.trim_end_matches(" UTC"), "%Y-%m-%d %H:%M:%S%.f")
                    .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
            })
            .ok()
    })
}

/// Format a timestamp for storage.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

/// Parse the progress row into a configuration.
///
/// Values outside the domain (negative index, unknown mode) fall back to the
/// defaults instead of failing the read.
#[allow(clippy::cast_possible_truncation)]
pub fn row_to_configuration(row: &SqliteRow) -> Result<PlaybackConfiguration, RepositoryError> {
    let groups: String = column(row, "selected_group_ids")?;
    let mode: String = column(row, "mode")?;
    let index: i64 = column(row, "current_index")?;
    let repeat: i64 = column(row, "word_repeat_count")?;
    let speed: f64 = column(row, "speed")?;
    let interval: f64 = column(row, "interval_secs")?;

    Ok(PlaybackConfiguration {
        active_library_id: column(row, "active_library_id")?,
        selected_group_ids: decode_group_ids(&groups),
        current_index: usize::try_from(index).unwrap_or(0),
        mode: PlaybackMode::from_stored(&mode),
        speed: speed as f32,
        interval_secs: interval as f32,
        is_random: column(row, "is_random")?,
        is_loop: column(row, "is_loop")?,
        word_repeat_count: u32::try_from(repeat).unwrap_or(DEFAULT_REPEAT_COUNT),
        last_played_at: parse_timestamp(column(row, "last_played_at")?),
    })
}

/// Parse a database row into a Word.
pub fn row_to_word(row: &SqliteRow) -> Result<Word, RepositoryError> {
    Ok(Word {
        id: column(row, "id")?,
        library_id: column(row, "library_id")?,
        group_id: column(row, "group_id")?,
        text: column(row, "text")?,
        native_form: column(row, "native_form")?,
        meaning: column(row, "meaning")?,
        part_of_speech: column(row, "part_of_speech")?,
        language_tag: column(row, "language_tag")?,
        is_logographic: column(row, "is_logographic")?,
    })
}

/// Parse a database row into a WordLibrary.
pub fn row_to_library(row: &SqliteRow) -> Result<WordLibrary, RepositoryError> {
    Ok(WordLibrary {
        id: column(row, "id")?,
        name: column(row, "name")?,
        language_tag: column(row, "language_tag")?,
        is_active: column(row, "is_active")?,
    })
}
