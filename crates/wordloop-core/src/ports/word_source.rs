//! Word source port.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{GroupId, LibraryId, Word, WordLibrary};

/// Read-only access to libraries and their words.
///
/// # Design Rules
///
/// - `words_for` returns words in group order, then in-group order
/// - An empty group selection yields an empty list, never the whole library
#[async_trait]
pub trait WordSource: Send + Sync {
    /// The library marked active, if any.
    async fn active_library(&self) -> Result<Option<WordLibrary>, RepositoryError>;

    /// Look up a library by id.
    async fn library(&self, id: LibraryId) -> Result<Option<WordLibrary>, RepositoryError>;

    /// Ordered words of `groups` in `library`.
    async fn words_for(
        &self,
        library: LibraryId,
        groups: &[GroupId],
    ) -> Result<Vec<Word>, RepositoryError>;
}
