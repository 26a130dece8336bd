//! `SQLite` implementation of the `ProgressStore` port.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::watch;
use tracing::{debug, info};

use wordloop_core::{
    PlaybackConfiguration, ProgressStore, ProgressUpdate, RepositoryError, encode_group_ids,
};

use super::row_mappers::{
    PROGRESS_SELECT_COLUMNS, format_timestamp, row_to_configuration, storage_error,
};

/// Single-row progress store.
///
/// Every successful write is applied to the cached record and published to
/// subscribers; the row itself stays the source of truth for `load`.
pub struct SqliteProgressStore {
    pool: SqlitePool,
    tx: watch::Sender<PlaybackConfiguration>,
}

impl SqliteProgressStore {
    /// Open the store, creating the default row on first run.
    pub async fn open(pool: SqlitePool) -> Result<Self, RepositoryError> {
        let (tx, _rx) = watch::channel(PlaybackConfiguration::default());
        let store = Self { pool, tx };
        store.ensure_default().await?;
        Ok(store)
    }

    async fn fetch(&self) -> Result<Option<PlaybackConfiguration>, RepositoryError> {
        let query = format!("SELECT {PROGRESS_SELECT_COLUMNS} FROM playback_progress WHERE id = 1");
        let row = sqlx::query(&query)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.as_ref().map(row_to_configuration).transpose()
    }
}

#[async_trait]
impl ProgressStore for SqliteProgressStore {
    async fn ensure_default(&self) -> Result<PlaybackConfiguration, RepositoryError> {
        let created = sqlx::query("INSERT OR IGNORE INTO playback_progress (id) VALUES (1)")
            .execute(&self.pool)
            .await
            .map_err(storage_error)?
            .rows_affected();
        if created > 0 {
            info!("Created default playback progress");
        }

        let config = self.load().await?;
        self.tx.send_if_modified(|cached| {
            if *cached == config {
                false
            } else {
                cached.clone_from(&config);
                true
            }
        });
        Ok(config)
    }

    async fn load(&self) -> Result<PlaybackConfiguration, RepositoryError> {
        self.fetch()
            .await?
            .ok_or_else(|| RepositoryError::NotFound("playback progress".to_string()))
    }

    async fn update(&self, update: ProgressUpdate) -> Result<(), RepositoryError> {
        let query = match &update {
            ProgressUpdate::CurrentIndex(index) => {
                let index = i64::try_from(*index).map_err(|_| {
                    RepositoryError::Constraint(format!("index {index} does not fit a row"))
                })?;
                sqlx::query("UPDATE playback_progress SET current_index = ? WHERE id = 1")
                    .bind(index)
            }
            ProgressUpdate::LastPlayedAt(at) => {
                sqlx::query("UPDATE playback_progress SET last_played_at = ? WHERE id = 1")
                    .bind(format_timestamp(*at))
            }
            ProgressUpdate::Speed(speed) => {
                sqlx::query("UPDATE playback_progress SET speed = ? WHERE id = 1")
                    .bind(f64::from(*speed))
            }
            ProgressUpdate::Interval(interval) => {
                sqlx::query("UPDATE playback_progress SET interval_secs = ? WHERE id = 1")
                    .bind(f64::from(*interval))
            }
            ProgressUpdate::Mode(mode) => {
                sqlx::query("UPDATE playback_progress SET mode = ? WHERE id = 1")
                    .bind(mode.as_str())
            }
            ProgressUpdate::Random(is_random) => {
                sqlx::query("UPDATE playback_progress SET is_random = ? WHERE id = 1")
                    .bind(*is_random)
            }
            ProgressUpdate::Loop(is_loop) => {
                sqlx::query("UPDATE playback_progress SET is_loop = ? WHERE id = 1")
                    .bind(*is_loop)
            }
            ProgressUpdate::RepeatCount(count) => {
                sqlx::query("UPDATE playback_progress SET word_repeat_count = ? WHERE id = 1")
                    .bind(i64::from(*count))
            }
            ProgressUpdate::Selection {
                library_id,
                group_ids,
            } => sqlx::query(
                "UPDATE playback_progress SET active_library_id = ?, selected_group_ids = ? WHERE id = 1",
            )
            .bind(*library_id)
            .bind(encode_group_ids(group_ids)),
        };

        let written = query
            .execute(&self.pool)
            .await
            .map_err(storage_error)?
            .rows_affected();
        if written == 0 {
            return Err(RepositoryError::NotFound("playback progress".to_string()));
        }

        debug!(field = update.field(), "Progress updated");
        self.tx.send_modify(|config| update.apply_to(config));
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<PlaybackConfiguration> {
        self.tx.subscribe()
    }
}
