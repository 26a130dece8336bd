#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod locale;
pub mod paths;
pub mod policy;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    DEFAULT_INTERVAL_SECS, DEFAULT_REPEAT_COUNT, DEFAULT_SPEED, GroupId, LibraryId,
    PlaybackConfiguration, PlaybackMode, PlayerState, UnknownModeError, WORDS_PER_GROUP, Word,
    WordId, WordLibrary, decode_group_ids, encode_group_ids, group_for_position,
};
pub use locale::{Locale, VoiceInfo, VoiceMatch, select_voice};
pub use policy::{MEANING_RATE_FACTOR, ModePolicy, NavigationPolicy, NextIndex, meaning_rate};
pub use ports::{
    CoreError, EngineError, EngineEvent, EngineListener, ListenRecorder, ListenedWordRepository,
    NoopListenRecorder, ProgressStore, ProgressUpdate, RepositoryError, SpeakAttempt,
    SpeechEngine, UtteranceId, WordSource,
};
pub use services::{DEFAULT_FLUSH_INTERVAL, ListenTracker};
pub use settings::{
    MAX_INTERVAL_SECS, MAX_REPEAT_COUNT, MAX_SPEED, MIN_INTERVAL_SECS, MIN_SPEED,
    PlaybackSettingsUpdate, SettingsError, validate_interval, validate_playback_settings,
    validate_repeat_count, validate_speed,
};

// Re-export path utilities
pub use paths::{
    DATA_DIR_ENV, PathError, data_root, database_path, database_path_in, ensure_dir,
    resolve_data_root,
};
