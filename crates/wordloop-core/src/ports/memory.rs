//! In-memory port adapters for tests.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;

use super::{ListenedWordRepository, ProgressStore, ProgressUpdate, RepositoryError, WordSource};
use crate::domain::{GroupId, LibraryId, PlaybackConfiguration, Word, WordId, WordLibrary};

/// Progress store kept in a `watch` channel.
#[derive(Debug)]
pub struct InMemoryProgressStore {
    tx: watch::Sender<PlaybackConfiguration>,
    updates: Mutex<Vec<ProgressUpdate>>,
    fail_writes: AtomicBool,
}

impl Default for InMemoryProgressStore {
    fn default() -> Self {
        Self::new(PlaybackConfiguration::default())
    }
}

impl InMemoryProgressStore {
    pub fn new(initial: PlaybackConfiguration) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            updates: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Current record.
    pub fn snapshot(&self) -> PlaybackConfiguration {
        self.tx.borrow().clone()
    }

    /// Every successful write, in order.
    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().map(|u| u.clone()).unwrap_or_default()
    }

    /// Make subsequent writes fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn ensure_default(&self) -> Result<PlaybackConfiguration, RepositoryError> {
        Ok(self.snapshot())
    }

    async fn load(&self) -> Result<PlaybackConfiguration, RepositoryError> {
        Ok(self.snapshot())
    }

    async fn update(&self, update: ProgressUpdate) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage(format!(
                "write to {} refused",
                update.field()
            )));
        }
        self.tx.send_modify(|config| update.apply_to(config));
        if let Ok(mut updates) = self.updates.lock() {
            updates.push(update);
        }
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<PlaybackConfiguration> {
        self.tx.subscribe()
    }
}

/// Word source over fixed vectors.
#[derive(Debug, Default)]
pub struct InMemoryWordSource {
    libraries: Vec<WordLibrary>,
    words: Mutex<Vec<Word>>,
}

impl InMemoryWordSource {
    pub fn new(libraries: Vec<WordLibrary>, words: Vec<Word>) -> Self {
        Self {
            libraries,
            words: Mutex::new(words),
        }
    }

    /// Replace the word list.
    pub fn set_words(&self, words: Vec<Word>) {
        if let Ok(mut guard) = self.words.lock() {
            *guard = words;
        }
    }
}

#[async_trait]
impl WordSource for InMemoryWordSource {
    async fn active_library(&self) -> Result<Option<WordLibrary>, RepositoryError> {
        Ok(self.libraries.iter().find(|l| l.is_active).cloned())
    }

    async fn library(&self, id: LibraryId) -> Result<Option<WordLibrary>, RepositoryError> {
        Ok(self.libraries.iter().find(|l| l.id == id).cloned())
    }

    async fn words_for(
        &self,
        library: LibraryId,
        groups: &[GroupId],
    ) -> Result<Vec<Word>, RepositoryError> {
        let words = self
            .words
            .lock()
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        Ok(groups
            .iter()
            .flat_map(|group| {
                words
                    .iter()
                    .filter(move |w| w.library_id == library && w.group_id == *group)
            })
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
struct Marks {
    listened_words: BTreeSet<WordId>,
    reviewed_words: BTreeSet<WordId>,
    listened_groups: BTreeSet<(LibraryId, GroupId)>,
    reviewed_groups: BTreeSet<(LibraryId, GroupId)>,
}

/// Flag repository that records what it was told.
///
/// Group marks stand for the "today" flags, so a daily reset removes them.
#[derive(Debug, Default)]
pub struct InMemoryListenedRepository {
    marks: Mutex<Marks>,
}

impl InMemoryListenedRepository {
    fn marks(&self) -> MutexGuard<'_, Marks> {
        self.marks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn listened_words(&self) -> Vec<WordId> {
        self.marks().listened_words.iter().copied().collect()
    }

    pub fn reviewed_words(&self) -> Vec<WordId> {
        self.marks().reviewed_words.iter().copied().collect()
    }

    pub fn listened_groups(&self) -> Vec<(LibraryId, GroupId)> {
        self.marks().listened_groups.iter().copied().collect()
    }

    pub fn reviewed_groups(&self) -> Vec<(LibraryId, GroupId)> {
        self.marks().reviewed_groups.iter().copied().collect()
    }
}

#[async_trait]
impl ListenedWordRepository for InMemoryListenedRepository {
    async fn mark_words_listened(&self, ids: &[WordId]) -> Result<(), RepositoryError> {
        self.marks().listened_words.extend(ids.iter().copied());
        Ok(())
    }

    async fn mark_groups_listened(
        &self,
        library: LibraryId,
        groups: &[GroupId],
    ) -> Result<(), RepositoryError> {
        self.marks()
            .listened_groups
            .extend(groups.iter().map(|g| (library, *g)));
        Ok(())
    }

    async fn mark_words_reviewed(&self, ids: &[WordId]) -> Result<(), RepositoryError> {
        self.marks().reviewed_words.extend(ids.iter().copied());
        Ok(())
    }

    async fn mark_groups_reviewed(
        &self,
        library: LibraryId,
        groups: &[GroupId],
    ) -> Result<(), RepositoryError> {
        self.marks()
            .reviewed_groups
            .extend(groups.iter().map(|g| (library, *g)));
        Ok(())
    }

    async fn reset_daily_marks(&self, library: LibraryId) -> Result<(), RepositoryError> {
        let mut marks = self.marks();
        marks.listened_groups.retain(|(lib, _)| *lib != library);
        marks.reviewed_groups.retain(|(lib, _)| *lib != library);
        Ok(())
    }
}
