//! `SQLite` implementation of the `WordSource` and `ListenedWordRepository`
//! ports, plus the library management the CLI needs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use wordloop_core::{
    GroupId, LibraryId, ListenedWordRepository, RepositoryError, Word, WordId, WordLibrary,
    WordSource, group_for_position,
};

use super::row_mappers::{
    LIBRARY_SELECT_COLUMNS, WORD_SELECT_COLUMNS, format_timestamp, parse_timestamp,
    row_to_library, row_to_word, storage_error,
};

/// A word to append to a library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWord {
    pub text: String,
    pub meaning: String,
    pub native_form: Option<String>,
    pub part_of_speech: Option<String>,
    /// Falls back to the library's tag when absent.
    pub language_tag: Option<String>,
    pub is_logographic: bool,
}

impl NewWord {
    pub fn new(text: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meaning: meaning.into(),
            native_form: None,
            part_of_speech: None,
            language_tag: None,
            is_logographic: false,
        }
    }
}

/// Per-group counts and marks for a library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub group_id: GroupId,
    pub word_count: usize,
    pub listened_words: usize,
    pub reviewed_words: usize,
    /// Set once any word of the group was flushed as listened.
    pub last_listened_at: Option<DateTime<Utc>>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub listened_today: bool,
    pub reviewed_today: bool,
}

impl GroupSummary {
    pub const fn is_listened(&self) -> bool {
        self.last_listened_at.is_some()
    }

    pub const fn is_reviewed(&self) -> bool {
        self.last_reviewed_at.is_some()
    }
}

/// Which of the two flag families a write touches.
#[derive(Debug, Clone, Copy)]
enum Mark {
    Listened,
    Reviewed,
}

impl Mark {
    const fn word_column(self) -> &'static str {
        match self {
            Self::Listened => "is_listened",
            Self::Reviewed => "is_reviewed",
        }
    }

    const fn group_columns(self) -> (&'static str, &'static str) {
        match self {
            Self::Listened => ("last_listened_at", "listened_today"),
            Self::Reviewed => ("last_reviewed_at", "reviewed_today"),
        }
    }
}

/// Escape `LIKE` wildcards so the needle matches literally (`ESCAPE '\'`).
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Libraries and words stored in `SQLite`.
pub struct SqliteWordRepository {
    pool: SqlitePool,
}

impl SqliteWordRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ── Libraries ──────────────────────────────────────────────────

    /// Create a library. The first library created becomes the active one.
    pub async fn create_library(
        &self,
        name: &str,
        language_tag: &str,
    ) -> Result<WordLibrary, RepositoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::Constraint(
                "library name cannot be empty".to_string(),
            ));
        }

        let id = sqlx::query(
            r#"INSERT INTO libraries (name, language_tag, is_active)
            VALUES (?, ?, NOT EXISTS (SELECT 1 FROM libraries WHERE is_active = 1))"#,
        )
        .bind(name)
        .bind(language_tag)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?
        .last_insert_rowid();

        info!(id, name, "Created library");
        self.library(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Library with ID {id}")))
    }

    pub async fn list_libraries(&self) -> Result<Vec<WordLibrary>, RepositoryError> {
        let query = format!("SELECT {LIBRARY_SELECT_COLUMNS} FROM libraries ORDER BY id");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(row_to_library).collect()
    }

    /// Make `id` the only active library.
    pub async fn activate_library(&self, id: LibraryId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let exists = sqlx::query("SELECT 1 FROM libraries WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_error)?
            .is_some();
        if !exists {
            return Err(RepositoryError::NotFound(format!("Library with ID {id}")));
        }

        sqlx::query("UPDATE libraries SET is_active = (id = ?)")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        info!(id, "Activated library");
        Ok(())
    }

    /// Delete a library with its words and group flags.
    pub async fn delete_library(&self, id: LibraryId) -> Result<(), RepositoryError> {
        let deleted = sqlx::query("DELETE FROM libraries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?
            .rows_affected();
        if deleted == 0 {
            return Err(RepositoryError::NotFound(format!("Library with ID {id}")));
        }

        info!(id, "Deleted library");
        Ok(())
    }

    // ── Words ──────────────────────────────────────────────────────

    /// Append words to a library, continuing its group partitioning.
    pub async fn add_words(
        &self,
        library: LibraryId,
        words: &[NewWord],
    ) -> Result<Vec<Word>, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let library_tag: String = sqlx::query("SELECT language_tag FROM libraries WHERE id = ?")
            .bind(library)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| RepositoryError::NotFound(format!("Library with ID {library}")))?
            .try_get("language_tag")
            .map_err(storage_error)?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM words WHERE library_id = ?")
            .bind(library)
            .fetch_one(&mut *tx)
            .await
            .map_err(storage_error)?;
        let start = usize::try_from(existing).unwrap_or(0);

        let mut added = Vec::with_capacity(words.len());
        for (offset, new) in words.iter().enumerate() {
            let position = start + offset;
            let group_id = group_for_position(position);
            let language_tag = new.language_tag.clone().unwrap_or_else(|| library_tag.clone());

            let id = sqlx::query(
                r#"INSERT INTO words (
                    library_id, group_id, position, text, native_form, meaning,
                    part_of_speech, language_tag, is_logographic
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(library)
            .bind(group_id)
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .bind(&new.text)
            .bind(&new.native_form)
            .bind(&new.meaning)
            .bind(&new.part_of_speech)
            .bind(&language_tag)
            .bind(new.is_logographic)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?
            .last_insert_rowid();

            added.push(Word {
                id,
                library_id: library,
                group_id,
                text: new.text.clone(),
                native_form: new.native_form.clone(),
                meaning: new.meaning.clone(),
                part_of_speech: new.part_of_speech.clone(),
                language_tag,
                is_logographic: new.is_logographic,
            });
        }
        tx.commit().await.map_err(storage_error)?;

        debug!(library, count = added.len(), "Added words");
        Ok(added)
    }

    /// Every word of a library in position order.
    pub async fn library_words(&self, library: LibraryId) -> Result<Vec<Word>, RepositoryError> {
        let query = format!(
            "SELECT {WORD_SELECT_COLUMNS} FROM words WHERE library_id = ? ORDER BY position, id"
        );
        let rows = sqlx::query(&query)
            .bind(library)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(row_to_word).collect()
    }

    /// Groups of a library with word counts and marks.
    pub async fn groups(&self, library: LibraryId) -> Result<Vec<GroupSummary>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT w.group_id AS group_id,
                COUNT(*) AS word_count,
                SUM(w.is_listened) AS listened_words,
                SUM(w.is_reviewed) AS reviewed_words,
                g.last_listened_at AS last_listened_at,
                g.last_reviewed_at AS last_reviewed_at,
                COALESCE(g.listened_today, 0) AS listened_today,
                COALESCE(g.reviewed_today, 0) AS reviewed_today
            FROM words w
            LEFT JOIN group_marks g
                ON g.library_id = w.library_id AND g.group_id = w.group_id
            WHERE w.library_id = ?
            GROUP BY w.group_id
            ORDER BY w.group_id"#,
        )
        .bind(library)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter()
            .map(|row| {
                let word_count: i64 = row.try_get("word_count").map_err(storage_error)?;
                let listened: i64 = row.try_get("listened_words").map_err(storage_error)?;
                let reviewed: i64 = row.try_get("reviewed_words").map_err(storage_error)?;
                let listened_today: i64 = row.try_get("listened_today").map_err(storage_error)?;
                let reviewed_today: i64 = row.try_get("reviewed_today").map_err(storage_error)?;
                Ok(GroupSummary {
                    group_id: row.try_get("group_id").map_err(storage_error)?,
                    word_count: usize::try_from(word_count).unwrap_or(0),
                    listened_words: usize::try_from(listened).unwrap_or(0),
                    reviewed_words: usize::try_from(reviewed).unwrap_or(0),
                    last_listened_at: parse_timestamp(
                        row.try_get("last_listened_at").map_err(storage_error)?,
                    ),
                    last_reviewed_at: parse_timestamp(
                        row.try_get("last_reviewed_at").map_err(storage_error)?,
                    ),
                    listened_today: listened_today != 0,
                    reviewed_today: reviewed_today != 0,
                })
            })
            .collect()
    }

    /// Words whose text, native form or meaning contains `needle`, across all
    /// libraries. `%` and `_` in the needle match literally.
    pub async fn search(&self, needle: &str, limit: u32) -> Result<Vec<Word>, RepositoryError> {
        let needle = needle.trim();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", escape_like(needle));
        let query = format!(
            r"SELECT {WORD_SELECT_COLUMNS} FROM words
             WHERE text LIKE ? ESCAPE '\'
                OR native_form LIKE ? ESCAPE '\'
                OR meaning LIKE ? ESCAPE '\'
             ORDER BY library_id, position LIMIT ?"
        );
        let rows = sqlx::query(&query)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(row_to_word).collect()
    }

    /// Ids of the listened words of a library.
    pub async fn listened_word_ids(
        &self,
        library: LibraryId,
    ) -> Result<Vec<WordId>, RepositoryError> {
        self.flagged_word_ids(library, Mark::Listened).await
    }

    /// Ids of the reviewed words of a library.
    pub async fn reviewed_word_ids(
        &self,
        library: LibraryId,
    ) -> Result<Vec<WordId>, RepositoryError> {
        self.flagged_word_ids(library, Mark::Reviewed).await
    }

    async fn flagged_word_ids(
        &self,
        library: LibraryId,
        mark: Mark,
    ) -> Result<Vec<WordId>, RepositoryError> {
        let query = format!(
            "SELECT id FROM words WHERE library_id = ? AND {} = 1 ORDER BY position",
            mark.word_column()
        );
        sqlx::query_scalar(&query)
            .bind(library)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)
    }

    // ── Marks ──────────────────────────────────────────────────────

    async fn flag_words(&self, mark: Mark, ids: &[WordId]) -> Result<(), RepositoryError> {
        let query = format!("UPDATE words SET {} = 1 WHERE id = ?", mark.word_column());
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        for id in ids {
            sqlx::query(&query)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(storage_error)?;
        }
        tx.commit().await.map_err(storage_error)
    }

    async fn flag_groups(
        &self,
        mark: Mark,
        library: LibraryId,
        groups: &[GroupId],
    ) -> Result<(), RepositoryError> {
        let (at, today) = mark.group_columns();
        let query = format!(
            r#"INSERT INTO group_marks (library_id, group_id, {at}, {today})
            VALUES (?, ?, ?, 1)
            ON CONFLICT(library_id, group_id) DO UPDATE SET
                {at} = excluded.{at},
                {today} = 1"#
        );
        let now = format_timestamp(Utc::now());
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        for group in groups {
            sqlx::query(&query)
                .bind(library)
                .bind(group)
                .bind(&now)
                .execute(&mut *tx)
                .await
                .map_err(storage_error)?;
        }
        tx.commit().await.map_err(storage_error)
    }
}

#[async_trait]
impl WordSource for SqliteWordRepository {
    async fn active_library(&self) -> Result<Option<WordLibrary>, RepositoryError> {
        let query = format!(
            "SELECT {LIBRARY_SELECT_COLUMNS} FROM libraries WHERE is_active = 1 ORDER BY id LIMIT 1"
        );
        let row = sqlx::query(&query)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.as_ref().map(row_to_library).transpose()
    }

    async fn library(&self, id: LibraryId) -> Result<Option<WordLibrary>, RepositoryError> {
        let query = format!("SELECT {LIBRARY_SELECT_COLUMNS} FROM libraries WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.as_ref().map(row_to_library).transpose()
    }

    async fn words_for(
        &self,
        library: LibraryId,
        groups: &[GroupId],
    ) -> Result<Vec<Word>, RepositoryError> {
        let query = format!(
            "SELECT {WORD_SELECT_COLUMNS} FROM words \
             WHERE library_id = ? AND group_id = ? ORDER BY position, id"
        );

        // Selection order, not id order
        let mut words = Vec::new();
        for group in groups {
            let rows = sqlx::query(&query)
                .bind(library)
                .bind(group)
                .fetch_all(&self.pool)
                .await
                .map_err(storage_error)?;
            for row in &rows {
                words.push(row_to_word(row)?);
            }
        }
        Ok(words)
    }
}

#[async_trait]
impl ListenedWordRepository for SqliteWordRepository {
    async fn mark_words_listened(&self, ids: &[WordId]) -> Result<(), RepositoryError> {
        self.flag_words(Mark::Listened, ids).await
    }

    async fn mark_groups_listened(
        &self,
        library: LibraryId,
        groups: &[GroupId],
    ) -> Result<(), RepositoryError> {
        self.flag_groups(Mark::Listened, library, groups).await
    }

    async fn mark_words_reviewed(&self, ids: &[WordId]) -> Result<(), RepositoryError> {
        self.flag_words(Mark::Reviewed, ids).await
    }

    async fn mark_groups_reviewed(
        &self,
        library: LibraryId,
        groups: &[GroupId],
    ) -> Result<(), RepositoryError> {
        self.flag_groups(Mark::Reviewed, library, groups).await
    }

    async fn reset_daily_marks(&self, library: LibraryId) -> Result<(), RepositoryError> {
        let cleared = sqlx::query(
            "UPDATE group_marks SET listened_today = 0, reviewed_today = 0 WHERE library_id = ?",
        )
        .bind(library)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?
        .rows_affected();

        debug!(library, cleared, "Reset daily group marks");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::setup_test_database;

    async fn repo() -> SqliteWordRepository {
        SqliteWordRepository::new(setup_test_database().await.unwrap())
    }

    fn batch(prefix: &str, n: usize) -> Vec<NewWord> {
        (0..n)
            .map(|i| NewWord::new(format!("{prefix}{i}"), format!("m{i}")))
            .collect()
    }

    #[tokio::test]
    async fn first_library_becomes_active() {
        let repo = repo().await;

        let first = repo.create_library("basics", "en").await.unwrap();
        let second = repo.create_library("verbs", "ja-JP").await.unwrap();

        assert!(first.is_active);
        assert!(!second.is_active);
        assert_eq!(repo.active_library().await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn duplicate_library_name_is_a_constraint_error() {
        let repo = repo().await;
        repo.create_library("basics", "en").await.unwrap();

        let err = repo.create_library("basics", "en").await.unwrap_err();

        assert!(matches!(err, RepositoryError::Constraint(_)));
    }

    #[tokio::test]
    async fn activate_switches_the_single_active_library() {
        let repo = repo().await;
        repo.create_library("basics", "en").await.unwrap();
        let verbs = repo.create_library("verbs", "ja-JP").await.unwrap();

        repo.activate_library(verbs.id).await.unwrap();

        let active: Vec<_> = repo
            .list_libraries()
            .await
            .unwrap()
            .into_iter()
            .filter(|l| l.is_active)
            .map(|l| l.id)
            .collect();
        assert_eq!(active, vec![verbs.id]);
        assert!(matches!(
            repo.activate_library(99).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn words_are_partitioned_into_groups_of_fifty() {
        let repo = repo().await;
        let lib = repo.create_library("basics", "en").await.unwrap();

        repo.add_words(lib.id, &batch("w", 60)).await.unwrap();
        let more = repo.add_words(lib.id, &batch("x", 45)).await.unwrap();

        assert_eq!(more[0].group_id, 2);
        assert_eq!(more[44].group_id, 3);
        let groups = repo.groups(lib.id).await.unwrap();
        let counts: Vec<_> = groups.iter().map(|g| (g.group_id, g.word_count)).collect();
        assert_eq!(counts, vec![(1, 50), (2, 50), (3, 5)]);
    }

    #[tokio::test]
    async fn words_for_follows_selection_order() {
        let repo = repo().await;
        let lib = repo.create_library("basics", "en").await.unwrap();
        repo.add_words(lib.id, &batch("w", 55)).await.unwrap();

        let words = repo.words_for(lib.id, &[2, 1]).await.unwrap();

        assert_eq!(words.len(), 55);
        assert_eq!(words[0].text, "w50");
        assert_eq!(words[5].text, "w0");
        assert!(repo.words_for(lib.id, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn language_tag_defaults_to_library() {
        let repo = repo().await;
        let lib = repo.create_library("verbs", "ja-JP").await.unwrap();
        let mut tagged = NewWord::new("apple", "苹果");
        tagged.language_tag = Some("en".to_string());

        let added = repo
            .add_words(lib.id, &[NewWord::new("taberu", "吃"), tagged])
            .await
            .unwrap();

        assert_eq!(added[0].language_tag, "ja-JP");
        assert_eq!(added[1].language_tag, "en");
        assert_eq!(repo.library_words(lib.id).await.unwrap(), added);
    }

    #[tokio::test]
    async fn adding_to_missing_library_fails() {
        let repo = repo().await;

        let err = repo.add_words(7, &batch("w", 1)).await.unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn listened_flags_are_persisted() {
        let repo = repo().await;
        let lib = repo.create_library("basics", "en").await.unwrap();
        let words = repo.add_words(lib.id, &batch("w", 3)).await.unwrap();

        repo.mark_words_listened(&[words[0].id, words[2].id])
            .await
            .unwrap();
        repo.mark_groups_listened(lib.id, &[1]).await.unwrap();
        repo.mark_groups_listened(lib.id, &[1]).await.unwrap();

        assert_eq!(
            repo.listened_word_ids(lib.id).await.unwrap(),
            vec![words[0].id, words[2].id]
        );
        let groups = repo.groups(lib.id).await.unwrap();
        assert_eq!(groups[0].listened_words, 2);
        assert!(groups[0].is_listened());
    }

    #[tokio::test]
    async fn search_matches_text_and_meaning() {
        let repo = repo().await;
        let lib = repo.create_library("basics", "en").await.unwrap();
        repo.add_words(
            lib.id,
            &[NewWord::new("apple", "苹果"), NewWord::new("banana", "香蕉")],
        )
        .await
        .unwrap();

        let by_text = repo.search("app", 10).await.unwrap();
        let by_meaning = repo.search("香蕉", 10).await.unwrap();

        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].text, "apple");
        assert_eq!(by_meaning[0].text, "banana");
        assert!(repo.search("  ", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_library_removes_its_words() {
        let repo = repo().await;
        let lib = repo.create_library("basics", "en").await.unwrap();
        repo.add_words(lib.id, &batch("w", 3)).await.unwrap();

        repo.delete_library(lib.id).await.unwrap();

        assert!(repo.library_words(lib.id).await.unwrap().is_empty());
        assert_eq!(repo.active_library().await.unwrap(), None);
        assert!(matches!(
            repo.delete_library(lib.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn reviewed_flags_are_kept_apart_from_listened() {
        let repo = repo().await;
        let lib = repo.create_library("basics", "en").await.unwrap();
        let words = repo.add_words(lib.id, &batch("w", 55)).await.unwrap();

        repo.mark_words_reviewed(&[words[1].id, words[52].id])
            .await
            .unwrap();
        repo.mark_groups_reviewed(lib.id, &[2]).await.unwrap();

        assert_eq!(
            repo.reviewed_word_ids(lib.id).await.unwrap(),
            vec![words[1].id, words[52].id]
        );
        assert!(repo.listened_word_ids(lib.id).await.unwrap().is_empty());
        let groups = repo.groups(lib.id).await.unwrap();
        assert_eq!(groups[0].reviewed_words, 1);
        assert!(!groups[0].is_reviewed());
        assert!(groups[1].is_reviewed());
        assert!(groups[1].reviewed_today);
        assert!(!groups[1].is_listened());
        assert!(!groups[1].listened_today);
    }

    #[tokio::test]
    async fn daily_reset_clears_today_flags_of_one_library() {
        let repo = repo().await;
        let basics = repo.create_library("basics", "en").await.unwrap();
        let verbs = repo.create_library("verbs", "en").await.unwrap();
        repo.add_words(basics.id, &batch("w", 2)).await.unwrap();
        repo.add_words(verbs.id, &batch("v", 2)).await.unwrap();
        for lib in [basics.id, verbs.id] {
            repo.mark_groups_listened(lib, &[1]).await.unwrap();
            repo.mark_groups_reviewed(lib, &[1]).await.unwrap();
        }

        repo.reset_daily_marks(basics.id).await.unwrap();

        let reset = &repo.groups(basics.id).await.unwrap()[0];
        assert!(!reset.listened_today);
        assert!(!reset.reviewed_today);
        // History survives the reset.
        assert!(reset.is_listened());
        assert!(reset.is_reviewed());
        let untouched = &repo.groups(verbs.id).await.unwrap()[0];
        assert!(untouched.listened_today);
        assert!(untouched.reviewed_today);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let repo = repo().await;
        let lib = repo.create_library("basics", "en").await.unwrap();
        repo.add_words(
            lib.id,
            &[
                NewWord::new("100%", "百分之百"),
                NewWord::new("1000", "一千"),
                NewWord::new("snake_case", "蛇形"),
                NewWord::new("snakeXcase", "x"),
            ],
        )
        .await
        .unwrap();

        let percent = repo.search("0%", 10).await.unwrap();
        let underscore = repo.search("e_c", 10).await.unwrap();

        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].text, "100%");
        assert_eq!(underscore.len(), 1);
        assert_eq!(underscore[0].text, "snake_case");
    }
}
