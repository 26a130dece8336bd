//! Progress store port.
//!
//! The progress store holds the single playback configuration / position
//! record. Writes are per-field and independently atomic; readers either
//! load the full record or subscribe to changes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::RepositoryError;
use crate::domain::{GroupId, LibraryId, PlaybackConfiguration, PlaybackMode};

/// A single-field write to the playback configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// Player position (written by the player only).
    CurrentIndex(usize),
    /// Last-played timestamp (written by the player only).
    LastPlayedAt(DateTime<Utc>),
    /// Speech rate multiplier.
    Speed(f32),
    /// Silence between parts, in seconds.
    Interval(f32),
    /// Playback mode.
    Mode(PlaybackMode),
    /// Random navigation.
    Random(bool),
    /// Wrap-around navigation.
    Loop(bool),
    /// Repetitions per word.
    RepeatCount(u32),
    /// Library and group selection.
    Selection {
        /// Library to draw from.
        library_id: Option<LibraryId>,
        /// Ordered groups.
        group_ids: Vec<GroupId>,
    },
}

impl ProgressUpdate {
    /// Apply this write to an in-memory configuration.
    pub fn apply_to(&self, config: &mut PlaybackConfiguration) {
        match self {
            Self::CurrentIndex(index) => config.current_index = *index,
            Self::LastPlayedAt(at) => config.last_played_at = Some(*at),
            Self::Speed(speed) => config.speed = *speed,
            Self::Interval(interval) => config.interval_secs = *interval,
            Self::Mode(mode) => config.mode = *mode,
            Self::Random(random) => config.is_random = *random,
            Self::Loop(looping) => config.is_loop = *looping,
            Self::RepeatCount(count) => config.word_repeat_count = *count,
            Self::Selection {
                library_id,
                group_ids,
            } => {
                config.active_library_id = *library_id;
                config.selected_group_ids.clone_from(group_ids);
            }
        }
    }

    /// Short field name for logs.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::CurrentIndex(_) => "current_index",
            Self::LastPlayedAt(_) => "last_played_at",
            Self::Speed(_) => "speed",
            Self::Interval(_) => "interval",
            Self::Mode(_) => "mode",
            Self::Random(_) => "is_random",
            Self::Loop(_) => "is_loop",
            Self::RepeatCount(_) => "word_repeat_count",
            Self::Selection { .. } => "selection",
        }
    }
}

/// Durable single-row playback configuration.
///
/// # Design Rules
///
/// - No storage types in signatures
/// - `update` writes exactly one field; there are no multi-field transactions
/// - `subscribe` reflects every successful write
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Create the default record if none exists, returning the stored record.
    async fn ensure_default(&self) -> Result<PlaybackConfiguration, RepositoryError>;

    /// Read the full record.
    async fn load(&self) -> Result<PlaybackConfiguration, RepositoryError>;

    /// Write one field.
    async fn update(&self, update: ProgressUpdate) -> Result<(), RepositoryError>;

    /// Observe the record; the receiver always holds the latest written value.
    fn subscribe(&self) -> watch::Receiver<PlaybackConfiguration>;

    // ── Point writes ───────────────────────────────────────────────

    async fn set_current_index(&self, index: usize) -> Result<(), RepositoryError> {
        self.update(ProgressUpdate::CurrentIndex(index)).await
    }

    async fn touch_last_played(&self, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        self.update(ProgressUpdate::LastPlayedAt(at)).await
    }

    async fn set_speed(&self, speed: f32) -> Result<(), RepositoryError> {
        self.update(ProgressUpdate::Speed(speed)).await
    }

    async fn set_interval(&self, interval_secs: f32) -> Result<(), RepositoryError> {
        self.update(ProgressUpdate::Interval(interval_secs)).await
    }

    async fn set_mode(&self, mode: PlaybackMode) -> Result<(), RepositoryError> {
        self.update(ProgressUpdate::Mode(mode)).await
    }

    async fn set_random(&self, is_random: bool) -> Result<(), RepositoryError> {
        self.update(ProgressUpdate::Random(is_random)).await
    }

    async fn set_loop(&self, is_loop: bool) -> Result<(), RepositoryError> {
        self.update(ProgressUpdate::Loop(is_loop)).await
    }

    async fn set_repeat_count(&self, count: u32) -> Result<(), RepositoryError> {
        self.update(ProgressUpdate::RepeatCount(count)).await
    }

    async fn set_selection(
        &self,
        library_id: Option<LibraryId>,
        group_ids: &[GroupId],
    ) -> Result<(), RepositoryError> {
        self.update(ProgressUpdate::Selection {
            library_id,
            group_ids: group_ids.to_vec(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_updates_single_field() {
        let mut config = PlaybackConfiguration::default();

        ProgressUpdate::CurrentIndex(4).apply_to(&mut config);
        ProgressUpdate::Mode(PlaybackMode::WordOnly).apply_to(&mut config);
        ProgressUpdate::Selection {
            library_id: Some(2),
            group_ids: vec![1, 3],
        }
        .apply_to(&mut config);

        assert_eq!(config.current_index, 4);
        assert_eq!(config.mode, PlaybackMode::WordOnly);
        assert_eq!(config.active_library_id, Some(2));
        assert_eq!(config.selected_group_ids, vec![1, 3]);
        assert!(!config.is_loop);
    }

    #[test]
    fn field_names() {
        assert_eq!(ProgressUpdate::Loop(true).field(), "is_loop");
        assert_eq!(ProgressUpdate::RepeatCount(2).field(), "word_repeat_count");
    }
}
