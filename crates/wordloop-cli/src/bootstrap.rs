//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Database pool, progress store and word repository (via wordloop-db)
//! - Simulated speech engine, speech queue and scheduler (via wordloop-speech)
//! - Listen tracker with its periodic flush (via wordloop-core)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use wordloop_core::{
    DEFAULT_FLUSH_INTERVAL, LibraryId, ListenTracker, WordLibrary, WordSource, database_path,
    database_path_in,
};
use wordloop_db::{SqliteProgressStore, SqliteWordRepository, setup_database};
use wordloop_speech::{
    PlaybackScheduler, SchedulerDeps, SimulatedEngine, SimulatedTiming, SpeechQueue,
};

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Data directory override; the platform default when `None`.
    pub data_dir: Option<PathBuf>,
    /// Pace of the simulated speech engine.
    pub timing: SimulatedTiming,
    /// Period of the listened-flag flush.
    pub flush_interval: Duration,
}

impl CliConfig {
    /// Create config with default paths.
    pub fn with_defaults() -> Self {
        Self {
            data_dir: None,
            timing: SimulatedTiming::default(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }

    /// Resolved database file.
    pub fn database_path(&self) -> Result<PathBuf, CliError> {
        let path = match &self.data_dir {
            Some(dir) => database_path_in(dir)?,
            None => database_path()?,
        };
        Ok(path)
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Durable playback configuration.
    pub store: Arc<SqliteProgressStore>,
    /// Libraries and words.
    pub words: Arc<SqliteWordRepository>,
    /// Speech request queue in front of the engine.
    pub queue: Arc<SpeechQueue>,
    /// The player.
    pub scheduler: PlaybackScheduler,
    /// Listened-flag write-back cache.
    pub tracker: Arc<ListenTracker>,
    /// Database file in use.
    pub db_path: PathBuf,
    flush_cancel: CancellationToken,
    flush_task: JoinHandle<()>,
}

impl CliContext {
    /// The active library, or a not-found error naming what to do.
    pub async fn active_library(&self) -> Result<WordLibrary, CliError> {
        self.words.active_library().await?.ok_or_else(|| {
            CliError::NotFound(
                "no active library (create one with 'wordloop library create')".to_string(),
            )
        })
    }

    /// `id` if given, otherwise the active library's id.
    pub async fn library_or_active(&self, id: Option<LibraryId>) -> Result<LibraryId, CliError> {
        match id {
            Some(id) => Ok(id),
            None => Ok(self.active_library().await?.id),
        }
    }

    /// Stop playback and write pending listened flags.
    pub async fn shutdown(self) {
        self.scheduler.shutdown().await;
        self.flush_cancel.cancel();
        if let Err(e) = self.flush_task.await {
            warn!(error = %e, "Listen flush task failed");
        }
        debug!("CLI context shut down");
    }
}

/// Bootstrap the CLI application.
///
/// This is the composition root. It:
/// 1. Opens the database and the progress store (creating defaults)
/// 2. Creates the speech engine and queue
/// 3. Creates the listen tracker and its periodic flush
/// 4. Assembles the playback scheduler
///
/// Must run inside a Tokio runtime.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    // 1. Storage
    let db_path = config.database_path()?;
    let pool = setup_database(&db_path).await?;
    let store = Arc::new(SqliteProgressStore::open(pool.clone()).await?);
    let words = Arc::new(SqliteWordRepository::new(pool));

    // 2. Speech
    let engine = Arc::new(SimulatedEngine::new(config.timing));
    let queue = Arc::new(SpeechQueue::new(engine));

    // 3. Listened flags
    let tracker = Arc::new(ListenTracker::new(words.clone()));
    let flush_cancel = CancellationToken::new();
    let flush_task = tracker.spawn_periodic_flush(config.flush_interval, flush_cancel.clone());

    // 4. Scheduler
    let scheduler = PlaybackScheduler::new(SchedulerDeps {
        queue: queue.clone(),
        store: store.clone(),
        words: words.clone(),
        listened: tracker.clone(),
    });

    debug!(path = %db_path.display(), "CLI context ready");
    Ok(CliContext {
        store,
        words,
        queue,
        scheduler,
        tracker,
        db_path,
        flush_cancel,
        flush_task,
    })
}
