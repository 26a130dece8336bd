//! Write-back cache for listened and reviewed flags.
//!
//! The player marks a word listened every time it finishes one. Writing each
//! of those straight to storage would put a database write on every step, so
//! marks are collected here and written in batches: periodically, on demand,
//! and once more when the periodic task is cancelled.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::domain::{GroupId, LibraryId, Word, WordId};
use crate::ports::{ListenRecorder, ListenedWordRepository, RepositoryError};

/// How often pending marks are written by the periodic task.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5 * 60);

type GroupMarks = BTreeMap<LibraryId, BTreeSet<GroupId>>;

#[derive(Debug, Default)]
struct Pending {
    listened_words: BTreeSet<WordId>,
    reviewed_words: BTreeSet<WordId>,
    listened_groups: GroupMarks,
    reviewed_groups: GroupMarks,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.listened_words.is_empty()
            && self.reviewed_words.is_empty()
            && self.listened_groups.is_empty()
            && self.reviewed_groups.is_empty()
    }

    fn word_marks(&self) -> usize {
        self.listened_words.len() + self.reviewed_words.len()
    }

    fn merge(&mut self, other: Self) {
        self.listened_words.extend(other.listened_words);
        self.reviewed_words.extend(other.reviewed_words);
        merge_groups(&mut self.listened_groups, other.listened_groups);
        merge_groups(&mut self.reviewed_groups, other.reviewed_groups);
    }
}

fn merge_groups(into: &mut GroupMarks, from: GroupMarks) {
    for (library, groups) in from {
        into.entry(library).or_default().extend(groups);
    }
}

fn add_group(marks: &mut GroupMarks, library: LibraryId, group: GroupId) {
    marks.entry(library).or_default().insert(group);
}

/// Batches listened and reviewed marks in front of a
/// [`ListenedWordRepository`].
pub struct ListenTracker {
    repo: Arc<dyn ListenedWordRepository>,
    pending: Mutex<Pending>,
}

impl ListenTracker {
    pub fn new(repo: Arc<dyn ListenedWordRepository>) -> Self {
        Self {
            repo,
            pending: Mutex::new(Pending::default()),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of word marks (listened plus reviewed) waiting to be written.
    pub fn pending_words(&self) -> usize {
        self.pending().word_marks()
    }

    /// Number of group marks waiting to be written for `library`.
    pub fn pending_groups(&self, library: LibraryId) -> usize {
        let pending = self.pending();
        [&pending.listened_groups, &pending.reviewed_groups]
            .iter()
            .filter_map(|marks| marks.get(&library))
            .map(BTreeSet::len)
            .sum()
    }

    /// Record that `word` was reviewed. Its group is marked reviewed too.
    pub fn record_reviewed(&self, word: &Word) {
        let mut pending = self.pending();
        pending.reviewed_words.insert(word.id);
        add_group(&mut pending.reviewed_groups, word.library_id, word.group_id);
    }

    /// Record that whole groups of `library` were reviewed.
    pub fn record_groups_reviewed(&self, library: LibraryId, groups: &[GroupId]) {
        let mut pending = self.pending();
        for group in groups {
            add_group(&mut pending.reviewed_groups, library, *group);
        }
    }

    /// Start a new day for `library`: pending group marks of that library
    /// are dropped and its stored today-flags are cleared.
    ///
    /// Pending word marks are kept.
    pub async fn reset_daily_marks(&self, library: LibraryId) -> Result<(), RepositoryError> {
        let dropped = {
            let mut pending = self.pending();
            [
                pending.listened_groups.remove(&library),
                pending.reviewed_groups.remove(&library),
            ]
            .iter()
            .flatten()
            .map(BTreeSet::len)
            .sum::<usize>()
        };
        self.repo.reset_daily_marks(library).await?;
        info!(library, dropped, "Reset daily group marks");
        Ok(())
    }

    /// Write every pending mark.
    ///
    /// Returns how many word marks were written. On failure the marks are
    /// kept for the next attempt.
    pub async fn flush(&self) -> Result<usize, RepositoryError> {
        let batch = std::mem::take(&mut *self.pending());
        if batch.is_empty() {
            return Ok(0);
        }

        match self.write(&batch).await {
            Ok(()) => {
                debug!(
                    listened = batch.listened_words.len(),
                    reviewed = batch.reviewed_words.len(),
                    libraries = batch.listened_groups.len() + batch.reviewed_groups.len(),
                    "Flushed word marks"
                );
                Ok(batch.word_marks())
            }
            Err(e) => {
                self.pending().merge(batch);
                Err(e)
            }
        }
    }

    async fn write(&self, batch: &Pending) -> Result<(), RepositoryError> {
        if !batch.listened_words.is_empty() {
            let ids: Vec<WordId> = batch.listened_words.iter().copied().collect();
            self.repo.mark_words_listened(&ids).await?;
        }
        if !batch.reviewed_words.is_empty() {
            let ids: Vec<WordId> = batch.reviewed_words.iter().copied().collect();
            self.repo.mark_words_reviewed(&ids).await?;
        }
        for (library, groups) in &batch.listened_groups {
            let ids: Vec<GroupId> = groups.iter().copied().collect();
            self.repo.mark_groups_listened(*library, &ids).await?;
        }
        for (library, groups) in &batch.reviewed_groups {
            let ids: Vec<GroupId> = groups.iter().copied().collect();
            self.repo.mark_groups_reviewed(*library, &ids).await?;
        }
        Ok(())
    }

    /// Flush every `period` until `cancel` fires, then flush one last time.
    pub fn spawn_periodic_flush(
        self: &Arc<Self>,
        period: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = tracker.flush().await {
                            error!(error = %e, "Periodic mark flush failed");
                        }
                    }
                }
            }
            if let Err(e) = tracker.flush().await {
                error!(error = %e, "Final mark flush failed");
            }
        })
    }
}

impl ListenRecorder for ListenTracker {
    fn record_listened(&self, word: &Word) {
        let mut pending = self.pending();
        pending.listened_words.insert(word.id);
        add_group(&mut pending.listened_groups, word.library_id, word.group_id);
    }
}
