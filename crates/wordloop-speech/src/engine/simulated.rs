//! Timer-driven speech engine.
//!
//! Stands in for a platform text-to-speech service: every utterance is
//! logged and "lasts" a time derived from its length and rate, silences
//! last exactly their duration. Used by the CLI and by integration tests
//! that need real timing.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use wordloop_core::{
    EngineError, EngineListener, Locale, SpeakAttempt, SpeechEngine, UtteranceId, VoiceInfo,
};

/// How long simulated speech takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedTiming {
    /// Delay before the engine reports ready.
    pub startup: Duration,
    /// Fixed cost of every utterance at rate 1.0.
    pub per_utterance: Duration,
    /// Additional cost per character at rate 1.0.
    pub per_char: Duration,
}

impl Default for SimulatedTiming {
    fn default() -> Self {
        Self {
            startup: Duration::from_millis(50),
            per_utterance: Duration::from_millis(300),
            per_char: Duration::from_millis(60),
        }
    }
}

impl SimulatedTiming {
    /// No startup delay and instantaneous speech.
    pub const fn instant() -> Self {
        Self {
            startup: Duration::ZERO,
            per_utterance: Duration::ZERO,
            per_char: Duration::ZERO,
        }
    }

    fn speech_duration(&self, text: &str, rate: f32) -> Duration {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        let base = self.per_utterance + self.per_char.saturating_mul(chars);
        if rate.is_finite() && rate > 0.0 {
            base.div_f32(rate)
        } else {
            base
        }
    }
}

struct Playing {
    id: UtteranceId,
    cancel: CancellationToken,
}

/// Speech engine that only pretends to speak.
pub struct SimulatedEngine {
    voices: Vec<VoiceInfo>,
    timing: SimulatedTiming,
    listener: Mutex<Option<EngineListener>>,
    playing: Arc<Mutex<Option<Playing>>>,
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new(SimulatedTiming::default())
    }
}

impl SimulatedEngine {
    /// Engine with English, Chinese and Japanese voices installed.
    pub fn new(timing: SimulatedTiming) -> Self {
        Self::with_voices(
            timing,
            vec![
                VoiceInfo::new("sim-en-us", Locale::english_us()),
                VoiceInfo::new("sim-en-gb", Locale::new("en", Some("GB"))),
                VoiceInfo::new("sim-zh-cn", Locale::meaning()),
                VoiceInfo::new("sim-ja-jp", Locale::new("ja", Some("JP"))),
            ],
        )
    }

    pub fn with_voices(timing: SimulatedTiming, voices: Vec<VoiceInfo>) -> Self {
        Self {
            voices,
            timing,
            listener: Mutex::new(None),
            playing: Arc::new(Mutex::new(None)),
        }
    }

    fn listener(&self) -> Result<EngineListener, EngineError> {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(EngineError::NotReady)
    }

    /// Occupy the engine for `duration`, then report done unless stopped.
    fn occupy(&self, id: UtteranceId, duration: Duration) -> Result<(), EngineError> {
        let listener = self.listener()?;
        let cancel = CancellationToken::new();
        {
            let mut playing = self.playing.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(current) = playing.as_ref() {
                return Err(EngineError::Rejected(format!("busy with {}", current.id)));
            }
            *playing = Some(Playing {
                id,
                cancel: cancel.clone(),
            });
        }

        let playing = Arc::clone(&self.playing);
        listener.started(id);
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => listener.stopped(id),
                () = tokio::time::sleep(duration) => {
                    let mut slot = playing.lock().unwrap_or_else(PoisonError::into_inner);
                    if slot.as_ref().is_some_and(|p| p.id == id) {
                        *slot = None;
                    }
                    drop(slot);
                    listener.done(id);
                }
            }
        });
        Ok(())
    }
}

impl SpeechEngine for SimulatedEngine {
    fn set_listener(&self, listener: EngineListener) {
        let startup = self.timing.startup;
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(listener.clone());
        if startup.is_zero() {
            listener.ready(true);
        } else {
            tokio::spawn(async move {
                tokio::time::sleep(startup).await;
                listener.ready(true);
            });
        }
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    fn try_speak(&self, attempt: SpeakAttempt<'_>) -> Result<(), EngineError> {
        let duration = self.timing.speech_duration(attempt.text, attempt.rate);
        self.occupy(attempt.id, duration)?;
        info!(
            id = %attempt.id,
            text = attempt.text,
            locale = %attempt.locale,
            voice = attempt.voice.map_or("default", |v| v.name.as_str()),
            rate = attempt.rate,
            "Speaking"
        );
        Ok(())
    }

    fn try_silence(&self, id: UtteranceId, duration: Duration) -> Result<(), EngineError> {
        self.occupy(id, duration)?;
        debug!(%id, ms = duration.as_millis(), "Holding silence");
        Ok(())
    }

    fn stop(&self) {
        let current = self
            .playing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(current) = current {
            debug!(id = %current.id, "Stopping utterance");
            current.cancel.cancel();
        }
    }
}
