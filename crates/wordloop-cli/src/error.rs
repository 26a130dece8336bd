//! CLI-specific error types and mappings.
//!
//! Maps core, storage and playback errors to exit codes and user-facing
//! messages.

use thiserror::Error;
use wordloop_core::{CoreError, PathError, RepositoryError, SettingsError};
use wordloop_speech::SpeechError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core domain error.
    #[error("{0}")]
    Core(String),

    /// Argument error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Something named on the command line does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Playback failed.
    #[error("Playback error: {0}")]
    Playback(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Core(_) | Self::Playback(_) => 1,
            Self::Arguments(_) => 2,
            Self::NotFound(_) => 66,  // EX_NOINPUT
            Self::Io(_) => 74,        // EX_IOERR
            Self::Config(_) => 78,    // EX_CONFIG
            Self::Database(_) => 73,  // EX_CANTCREAT (closest fit)
        }
    }
}

impl From<RepositoryError> for CliError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => Self::NotFound(what),
            RepositoryError::Constraint(msg) => Self::Arguments(msg),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Arguments(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Repository(repo_err) => repo_err.into(),
            CoreError::Settings(settings_err) => settings_err.into(),
            CoreError::Path(path_err) => path_err.into(),
            CoreError::Validation(msg) => Self::Arguments(msg),
            CoreError::Internal(msg) => Self::Core(msg),
        }
    }
}

impl From<SpeechError> for CliError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Repository(repo_err) => repo_err.into(),
            SpeechError::Settings(settings_err) => settings_err.into(),
            SpeechError::TaskFailed(msg) => Self::Playback(msg),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Exit code for an error returned from a handler.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_by_kind() {
        let missing: CliError = RepositoryError::NotFound("Library with ID 4".into()).into();
        let dup: CliError = RepositoryError::Constraint("UNIQUE".into()).into();
        let io: CliError = RepositoryError::Storage("disk I/O error".into()).into();

        assert_eq!(missing.exit_code(), 66);
        assert_eq!(dup.exit_code(), 2);
        assert_eq!(io.exit_code(), 73);
    }

    #[test]
    fn settings_errors_are_argument_errors() {
        let err: CliError = SpeechError::Settings(SettingsError::InvalidSpeed(9.0)).into();
        assert!(matches!(err, CliError::Arguments(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn exit_code_through_anyhow() {
        let err = anyhow::Error::new(CliError::Config("no data dir".into()));
        assert_eq!(exit_code_for(&err), 78);
        assert_eq!(exit_code_for(&anyhow::anyhow!("other")), 1);
    }
}
