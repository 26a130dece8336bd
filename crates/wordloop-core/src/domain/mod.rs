//! Domain types.
//!
//! Pure data with no infrastructure dependencies. Shared by every adapter.

pub mod playback;
pub mod player;
pub mod word;

pub use playback::{
    DEFAULT_INTERVAL_SECS, DEFAULT_REPEAT_COUNT, DEFAULT_SPEED, PlaybackConfiguration,
    PlaybackMode, UnknownModeError, decode_group_ids, encode_group_ids,
};
pub use player::PlayerState;
pub use word::{GroupId, LibraryId, WORDS_PER_GROUP, Word, WordId, WordLibrary, group_for_position};
