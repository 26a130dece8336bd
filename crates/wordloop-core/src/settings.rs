//! Playback settings validation.
//!
//! Settings screens write speed, interval, mode, repeat count and the
//! random/loop flags. Every write goes through [`validate_playback_settings`]
//! (or one of the single-field checks) before it reaches the store.

use serde::{Deserialize, Serialize};

use crate::domain::{PlaybackConfiguration, PlaybackMode};

/// Slowest allowed speech rate.
pub const MIN_SPEED: f32 = 0.5;
/// Fastest allowed speech rate.
pub const MAX_SPEED: f32 = 3.0;
/// Shortest allowed interval, in seconds.
pub const MIN_INTERVAL_SECS: f32 = 0.08;
/// Longest allowed interval, in seconds.
pub const MAX_INTERVAL_SECS: f32 = 5.0;
/// Most repetitions per word.
pub const MAX_REPEAT_COUNT: u32 = 10;

/// Partial settings update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSettingsUpdate {
    pub mode: Option<PlaybackMode>,
    pub speed: Option<f32>,
    pub interval_secs: Option<f32>,
    pub word_repeat_count: Option<u32>,
    pub is_random: Option<bool>,
    pub is_loop: Option<bool>,
}

impl PlaybackSettingsUpdate {
    /// Whether the update changes nothing.
    pub const fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.speed.is_none()
            && self.interval_secs.is_none()
            && self.word_repeat_count.is_none()
            && self.is_random.is_none()
            && self.is_loop.is_none()
    }

    /// Apply the update onto a configuration.
    pub fn merge_into(&self, config: &mut PlaybackConfiguration) {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(interval) = self.interval_secs {
            config.interval_secs = interval;
        }
        if let Some(count) = self.word_repeat_count {
            config.word_repeat_count = count;
        }
        if let Some(random) = self.is_random {
            config.is_random = random;
        }
        if let Some(looping) = self.is_loop {
            config.is_loop = looping;
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Speed must be between 0.5 and 3.0, got {0}")]
    InvalidSpeed(f32),

    #[error("Interval must be between 0.08 and 5.0 seconds, got {0}")]
    InvalidInterval(f32),

    #[error("Repeat count must be between 1 and 10, got {0}")]
    InvalidRepeatCount(u32),
}

/// Check a speech rate.
pub fn validate_speed(speed: f32) -> Result<(), SettingsError> {
    if speed.is_finite() && (MIN_SPEED..=MAX_SPEED).contains(&speed) {
        Ok(())
    } else {
        Err(SettingsError::InvalidSpeed(speed))
    }
}

/// Check an interval in seconds.
pub fn validate_interval(interval_secs: f32) -> Result<(), SettingsError> {
    if interval_secs.is_finite() && (MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&interval_secs)
    {
        Ok(())
    } else {
        Err(SettingsError::InvalidInterval(interval_secs))
    }
}

/// Check a repeat count.
pub fn validate_repeat_count(count: u32) -> Result<(), SettingsError> {
    if (1..=MAX_REPEAT_COUNT).contains(&count) {
        Ok(())
    } else {
        Err(SettingsError::InvalidRepeatCount(count))
    }
}

/// Validate every user-editable field of a configuration.
pub fn validate_playback_settings(config: &PlaybackConfiguration) -> Result<(), SettingsError> {
    validate_speed(config.speed)?;
    validate_interval(config.interval_secs)?;
    validate_repeat_count(config.word_repeat_count)?;
    Ok(())
}
