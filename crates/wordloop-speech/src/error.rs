//! Speech and playback error types.

use wordloop_core::{RepositoryError, SettingsError};

/// Errors surfaced by the playback scheduler.
///
/// Speech failures are not errors at this level: they resolve as
/// [`SpeakOutcome::Error`](crate::SpeakOutcome::Error) and are logged.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// Reading or writing the progress store or word source failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// A settings value was out of range.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The playback task panicked.
    #[error("Playback task failed: {0}")]
    TaskFailed(String),
}
