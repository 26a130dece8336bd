//! Listened and reviewed flag ports.
//!
//! The scheduler reports each word it finishes through [`ListenRecorder`],
//! a synchronous fire-and-forget call. [`crate::services::ListenTracker`]
//! implements it by batching into a [`ListenedWordRepository`], which also
//! receives the reviewed marks made outside playback.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{GroupId, LibraryId, Word, WordId};

/// Durable listened and reviewed flags on words and groups.
///
/// Groups additionally carry "today" flags that are set by every mark and
/// cleared per library by [`reset_daily_marks`](Self::reset_daily_marks).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListenedWordRepository: Send + Sync {
    /// Flag words as listened.
    async fn mark_words_listened(&self, ids: &[WordId]) -> Result<(), RepositoryError>;

    /// Flag groups of a library as listened.
    async fn mark_groups_listened(
        &self,
        library: LibraryId,
        groups: &[GroupId],
    ) -> Result<(), RepositoryError>;

    /// Flag words as reviewed.
    async fn mark_words_reviewed(&self, ids: &[WordId]) -> Result<(), RepositoryError>;

    /// Flag groups of a library as reviewed.
    async fn mark_groups_reviewed(
        &self,
        library: LibraryId,
        groups: &[GroupId],
    ) -> Result<(), RepositoryError>;

    /// Clear the listened-today and reviewed-today flags of every group in
    /// `library`. Word flags are kept.
    async fn reset_daily_marks(&self, library: LibraryId) -> Result<(), RepositoryError>;
}

/// Fire-and-forget sink for "this word was played".
pub trait ListenRecorder: Send + Sync {
    /// Record that `word` finished playing. Must not block.
    fn record_listened(&self, word: &Word);
}

/// Recorder that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListenRecorder;

impl ListenRecorder for NoopListenRecorder {
    fn record_listened(&self, _word: &Word) {}
}
