//! Speech engine port.
//!
//! A speech engine is a stateful, strictly sequential resource: it accepts
//! one attempt at a time (speak text, or hold silence) and later reports
//! exactly one of done / error / stopped for that attempt, by identifier,
//! through the [`EngineListener`] it was given.
//!
//! # Design Rules
//!
//! - Methods are submit-only and must not block; completion is reported
//!   asynchronously through the listener, never by return value.
//! - The engine never sees more than one outstanding attempt. Serialisation
//!   is the queue's job, not the engine's.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::locale::{Locale, VoiceInfo};

/// Identifier of one attempt against the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(u64);

impl UtteranceId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utt-{}", self.0)
    }
}

/// Asynchronous signal from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine readiness changed.
    Ready(bool),
    /// An attempt began producing audio.
    Started(UtteranceId),
    /// An attempt finished normally.
    Done(UtteranceId),
    /// An attempt failed.
    Error {
        /// Failed attempt.
        id: UtteranceId,
        /// Engine-provided reason.
        reason: String,
    },
    /// An attempt was interrupted by [`SpeechEngine::stop`].
    Stopped(UtteranceId),
}

impl EngineEvent {
    /// Attempt the event refers to, if any.
    pub const fn utterance(&self) -> Option<UtteranceId> {
        match self {
            Self::Ready(_) => None,
            Self::Started(id) | Self::Done(id) | Self::Stopped(id) | Self::Error { id, .. } => {
                Some(*id)
            }
        }
    }
}

/// Callback surface handed to an engine.
///
/// Cloneable and callable from any thread; events are queued on an
/// unbounded channel and never block the engine.
#[derive(Debug, Clone)]
pub struct EngineListener {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineListener {
    /// Create a listener and the receiving end of its event stream.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Deliver a raw event.
    pub fn send(&self, event: EngineEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Speech engine event dropped: queue is gone");
        }
    }

    /// Report readiness.
    pub fn ready(&self, ready: bool) {
        self.send(EngineEvent::Ready(ready));
    }

    /// Report that an attempt started.
    pub fn started(&self, id: UtteranceId) {
        self.send(EngineEvent::Started(id));
    }

    /// Report that an attempt completed.
    pub fn done(&self, id: UtteranceId) {
        self.send(EngineEvent::Done(id));
    }

    /// Report that an attempt failed.
    pub fn error(&self, id: UtteranceId, reason: impl Into<String>) {
        self.send(EngineEvent::Error {
            id,
            reason: reason.into(),
        });
    }

    /// Report that an attempt was stopped.
    pub fn stopped(&self, id: UtteranceId) {
        self.send(EngineEvent::Stopped(id));
    }
}

/// One spoken attempt.
#[derive(Debug, Clone, Copy)]
pub struct SpeakAttempt<'a> {
    /// Attempt identifier, echoed back in the completion event.
    pub id: UtteranceId,
    /// Text to vocalise (never empty).
    pub text: &'a str,
    /// Requested locale.
    pub locale: &'a Locale,
    /// Voice chosen for the locale; `None` means the engine default.
    pub voice: Option<&'a VoiceInfo>,
    /// Rate multiplier (1.0 = normal).
    pub rate: f32,
}

/// Synchronous rejection of an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine has not finished initialising.
    #[error("Speech engine not ready")]
    NotReady,

    /// The engine refused the attempt.
    #[error("Speech engine rejected attempt: {0}")]
    Rejected(String),

    /// The engine has shut down.
    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),
}

/// Port for a text-to-speech engine.
pub trait SpeechEngine: Send + Sync {
    /// Install the callback surface. Called once by the queue that owns
    /// the engine; engines may report [`EngineEvent::Ready`] immediately.
    fn set_listener(&self, listener: EngineListener);

    /// Voices the engine can speak with.
    fn voices(&self) -> Vec<VoiceInfo>;

    /// Start speaking.
    fn try_speak(&self, attempt: SpeakAttempt<'_>) -> Result<(), EngineError>;

    /// Start holding silence.
    fn try_silence(&self, id: UtteranceId, duration: Duration) -> Result<(), EngineError>;

    /// Abort the current attempt, which then reports [`EngineEvent::Stopped`].
    fn stop(&self);
}
