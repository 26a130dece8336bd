//! Database setup and initialization.
//!
//! Entry points call [`setup_database`] with the resolved database path.

use anyhow::Result;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use std::path::Path;

/// Open (creating if missing) the `SQLite` database and ensure the schema.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The database file cannot be opened or created
/// - Schema creation fails
///
/// # Example
///
/// ```rust,no_run
/// use wordloop_db::setup_database;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = setup_database(Path::new("/tmp/wordloop/data/wordloop.db")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true),
    )
    .await?;

    create_schema(&pool).await?;
    tracing::debug!(path = %db_path.display(), "Database ready");

    Ok(pool)
}

/// In-memory database with the production schema.
///
/// The pool holds a single connection; every `sqlite::memory:` connection
/// would otherwise be its own empty database.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Create all tables and indexes. Safe to call repeatedly.
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS libraries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            language_tag TEXT NOT NULL DEFAULT 'en',
            is_active INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            library_id INTEGER NOT NULL,
            group_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            text TEXT NOT NULL,
            native_form TEXT,
            meaning TEXT NOT NULL,
            part_of_speech TEXT,
            language_tag TEXT NOT NULL,
            is_logographic INTEGER NOT NULL DEFAULT 0,
            is_listened INTEGER NOT NULL DEFAULT 0,
            is_reviewed INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (library_id) REFERENCES libraries(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Word lists are always read per (library, group) in position order
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_words_library_group ON words(library_id, group_id, position)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS group_marks (
            library_id INTEGER NOT NULL,
            group_id INTEGER NOT NULL,
            last_listened_at TEXT,
            last_reviewed_at TEXT,
            listened_today INTEGER NOT NULL DEFAULT 0,
            reviewed_today INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (library_id, group_id),
            FOREIGN KEY (library_id) REFERENCES libraries(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playback_progress (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            active_library_id INTEGER,
            selected_group_ids TEXT NOT NULL DEFAULT '',
            current_index INTEGER NOT NULL DEFAULT 0,
            mode TEXT NOT NULL DEFAULT 'WORD_THEN_MEANING',
            speed REAL NOT NULL DEFAULT 1.0,
            interval_secs REAL NOT NULL DEFAULT 1.0,
            is_random INTEGER NOT NULL DEFAULT 0,
            is_loop INTEGER NOT NULL DEFAULT 0,
            word_repeat_count INTEGER NOT NULL DEFAULT 1,
            last_played_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
