//! Playback policy: the mode table and the navigation rules.
//!
//! Both are pure functions of the configuration so that what the player
//! speaks, what the UI displays and where the player goes next can be
//! reproduced from the persisted record alone.

use rand::Rng;

use crate::domain::{PlaybackConfiguration, PlaybackMode};

/// Rate multiplier applied to meanings relative to the configured speed.
pub const MEANING_RATE_FACTOR: f32 = 1.5;

// ── Mode policy ────────────────────────────────────────────────────

/// What a mode speaks and displays.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePolicy {
    /// The word text is spoken (`repeat_count` times).
    pub speak_word: bool,
    /// The meaning is spoken once, at [`MEANING_RATE_FACTOR`] × speed.
    pub speak_meaning: bool,
    /// One interval of silence separates word and meaning.
    pub separator_silence: bool,
    /// The word is shown on the card.
    pub display_word: bool,
    /// The meaning is shown on the card.
    pub display_meaning: bool,
}

impl ModePolicy {
    /// Look up the policy for a mode.
    pub const fn for_mode(mode: PlaybackMode) -> Self {
        let (word, meaning) = match mode {
            PlaybackMode::HideAll => (false, false),
            PlaybackMode::MeaningOnly => (false, true),
            PlaybackMode::WordOnly => (true, false),
            PlaybackMode::WordThenMeaning => (true, true),
        };
        Self {
            speak_word: word,
            speak_meaning: meaning,
            separator_silence: word && meaning,
            display_word: word,
            display_meaning: meaning,
        }
    }

    /// Whether a step in this mode produces any speech at all.
    pub const fn speaks_anything(&self) -> bool {
        self.speak_word || self.speak_meaning
    }
}

/// Rate at which a meaning is spoken for a configured word speed.
pub fn meaning_rate(speed: f32) -> f32 {
    speed * MEANING_RATE_FACTOR
}

// ── Navigation ─────────────────────────────────────────────────────

/// Result of advancing past the current word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextIndex {
    /// Continue at this index.
    At(usize),
    /// End of list without loop: the player halts.
    End,
}

impl NextIndex {
    /// The index, if playback continues.
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::At(i) => Some(i),
            Self::End => None,
        }
    }
}

/// Navigation rules shared by automatic advance, "next" and "previous".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationPolicy {
    /// Pick uniformly among the other words.
    pub is_random: bool,
    /// Wrap around at either end.
    pub is_loop: bool,
}

impl NavigationPolicy {
    /// Policy flags from a configuration.
    pub const fn from_config(config: &PlaybackConfiguration) -> Self {
        Self {
            is_random: config.is_random,
            is_loop: config.is_loop,
        }
    }

    /// Index after `current` in a list of `len` words.
    ///
    /// Forward past the last word yields [`NextIndex::End`] unless looping.
    pub fn advance<R: Rng>(self, current: usize, len: usize, rng: &mut R) -> NextIndex {
        if len == 0 {
            return NextIndex::End;
        }
        if self.is_random {
            return NextIndex::At(random_other(current, len, rng));
        }
        if current + 1 < len {
            NextIndex::At(current + 1)
        } else if self.is_loop {
            NextIndex::At(0)
        } else {
            NextIndex::End
        }
    }

    /// Index before `current` in a list of `len` words.
    ///
    /// Never halts: without loop the first word stays put.
    pub fn retreat<R: Rng>(self, current: usize, len: usize, rng: &mut R) -> usize {
        if len == 0 {
            return current;
        }
        if self.is_random {
            return random_other(current, len, rng);
        }
        if current > 0 {
            (current - 1).min(len - 1)
        } else if self.is_loop {
            len - 1
        } else {
            current
        }
    }
}

/// Uniform pick among `0..len` excluding `current`; `0` for lists of one.
fn random_other<R: Rng>(current: usize, len: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return 0;
    }
    if current >= len {
        return rng.random_range(0..len);
    }
    let pick = rng.random_range(0..len - 1);
    if pick >= current { pick + 1 } else { pick }
}
