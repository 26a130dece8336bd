//! Requests, outcomes and notices of the speech queue.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wordloop_core::Locale;

/// One unit of work for the speech engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechRequest {
    /// Vocalise `text` in `locale` at `rate`.
    Speak {
        text: String,
        locale: Locale,
        rate: f32,
    },
    /// Occupy the engine with silence.
    Silence { duration: Duration },
}

impl SpeechRequest {
    pub fn speak(text: impl Into<String>, locale: Locale, rate: f32) -> Self {
        Self::Speak {
            text: text.into(),
            locale,
            rate,
        }
    }

    pub const fn silence_ms(ms: u64) -> Self {
        Self::Silence {
            duration: Duration::from_millis(ms),
        }
    }

    /// Whether the request has nothing to say.
    pub fn is_empty_speech(&self) -> bool {
        matches!(self, Self::Speak { text, .. } if text.trim().is_empty())
    }
}

impl fmt::Display for SpeechRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Speak { text, locale, rate } => write!(f, "speak {text:?} [{locale} x{rate}]"),
            Self::Silence { duration } => write!(f, "silence {}ms", duration.as_millis()),
        }
    }
}

/// How a request ended. Delivered exactly once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeakOutcome {
    Success,
    Cancelled,
    Error(String),
}

impl SpeakOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Out-of-band notices for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SpeechNotice {
    /// No installed voice speaks this language; the engine default is used.
    UnsupportedLanguage { locale: String },
}
