//! Player state published to the UI layer.

use serde::{Deserialize, Serialize};

use super::playback::{PlaybackConfiguration, PlaybackMode};
use super::word::Word;

/// Snapshot of the player, as seen by a UI.
///
/// Published on a `watch` channel; every field reflects the last
/// configuration the player read plus its in-memory session flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Whether a playback session is running.
    pub is_playing: bool,
    /// Word at `current_index`, if the index is valid.
    pub current_word: Option<Word>,
    /// Position in the selected word list.
    pub current_index: usize,
    /// Number of words in the selected list.
    pub word_count: usize,
    /// Whether the meaning is shown on the card.
    pub show_meaning: bool,
    /// Current mode.
    pub mode: PlaybackMode,
    /// Speech rate multiplier.
    pub speed: f32,
    /// Silence between parts, in seconds.
    pub interval_secs: f32,
    /// Times each word is spoken per step.
    pub repeat_count: u32,
    /// Random navigation.
    pub is_random: bool,
    /// Wrap-around navigation.
    pub is_loop: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::from_configuration(&PlaybackConfiguration::default())
    }
}

impl PlayerState {
    /// Build an idle state mirroring a configuration.
    pub fn from_configuration(config: &PlaybackConfiguration) -> Self {
        Self {
            is_playing: false,
            current_word: None,
            current_index: config.current_index,
            word_count: 0,
            show_meaning: crate::policy::ModePolicy::for_mode(config.mode).display_meaning,
            mode: config.mode,
            speed: config.speed,
            interval_secs: config.interval_secs,
            repeat_count: config.word_repeat_count,
            is_random: config.is_random,
            is_loop: config.is_loop,
        }
    }

    /// Copy the user-editable settings from a configuration.
    pub const fn apply_settings(&mut self, config: &PlaybackConfiguration) {
        self.mode = config.mode;
        self.speed = config.speed;
        self.interval_secs = config.interval_secs;
        self.repeat_count = config.word_repeat_count;
        self.is_random = config.is_random;
        self.is_loop = config.is_loop;
    }

    /// Whether there is anything to play.
    pub const fn has_words(&self) -> bool {
        self.word_count > 0
    }
}
