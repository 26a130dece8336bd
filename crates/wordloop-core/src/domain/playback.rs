//! Persisted playback configuration and playback modes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::word::{GroupId, LibraryId};

/// Default speech rate multiplier.
pub const DEFAULT_SPEED: f32 = 1.0;

/// Default silence between repetitions, in seconds.
pub const DEFAULT_INTERVAL_SECS: f32 = 1.0;

/// Default number of times each word is spoken per step.
pub const DEFAULT_REPEAT_COUNT: u32 = 1;

/// Which parts of a word are spoken and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaybackMode {
    /// Neither word nor meaning.
    HideAll,
    /// Meaning only.
    MeaningOnly,
    /// Word only.
    WordOnly,
    /// Word, one interval of silence, then meaning.
    #[default]
    WordThenMeaning,
}

impl PlaybackMode {
    /// All modes in menu order.
    pub const ALL: [Self; 4] = [
        Self::HideAll,
        Self::MeaningOnly,
        Self::WordOnly,
        Self::WordThenMeaning,
    ];

    /// Stable storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HideAll => "HIDE_ALL",
            Self::MeaningOnly => "MEANING_ONLY",
            Self::WordOnly => "WORD_ONLY",
            Self::WordThenMeaning => "WORD_THEN_MEANING",
        }
    }

    /// Parse a stored name, falling back to the default mode for unknown text.
    pub fn from_stored(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown playback mode: {0}")]
pub struct UnknownModeError(pub String);

impl FromStr for PlaybackMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| UnknownModeError(s.to_string()))
    }
}

/// The single persisted configuration / position record.
///
/// The player is the only writer of `current_index` and `last_played_at`;
/// settings actions write the remaining fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackConfiguration {
    /// Library the player draws words from.
    pub active_library_id: Option<LibraryId>,
    /// Ordered group selection.
    pub selected_group_ids: Vec<GroupId>,
    /// Position in the selected word list.
    pub current_index: usize,
    /// Which parts are spoken and displayed.
    pub mode: PlaybackMode,
    /// Speech rate multiplier (0.5–3.0).
    pub speed: f32,
    /// Silence between parts, in seconds (0.08–5.0).
    pub interval_secs: f32,
    /// Pick the next word at random.
    pub is_random: bool,
    /// Wrap around at the ends of the list.
    pub is_loop: bool,
    /// Times each word is spoken per step.
    pub word_repeat_count: u32,
    /// When the player last advanced.
    pub last_played_at: Option<DateTime<Utc>>,
}

impl Default for PlaybackConfiguration {
    fn default() -> Self {
        Self {
            active_library_id: None,
            selected_group_ids: Vec::new(),
            current_index: 0,
            mode: PlaybackMode::default(),
            speed: DEFAULT_SPEED,
            interval_secs: DEFAULT_INTERVAL_SECS,
            is_random: false,
            is_loop: false,
            word_repeat_count: DEFAULT_REPEAT_COUNT,
            last_played_at: None,
        }
    }
}

impl PlaybackConfiguration {
    /// Silence between parts, in whole milliseconds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn interval_ms(&self) -> u64 {
        (f64::from(self.interval_secs) * 1000.0).round().max(0.0) as u64
    }

    /// Comma-separated form of `selected_group_ids`, as stored.
    pub fn selected_groups_text(&self) -> String {
        encode_group_ids(&self.selected_group_ids)
    }

    /// Whether a library and at least one group are selected.
    pub const fn has_selection(&self) -> bool {
        self.active_library_id.is_some() && !self.selected_group_ids.is_empty()
    }
}

/// Encode group ids as comma text (`[1, 2, 5]` → `"1,2,5"`).
pub fn encode_group_ids(ids: &[GroupId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode comma text into group ids, skipping fragments that are not integers.
pub fn decode_group_ids(text: &str) -> Vec<GroupId> {
    text.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}
