//! Shared fixtures for speech integration tests.
//!
//! `RecordingEngine` records every attempt and either completes it at once
//! (auto mode) or waits for the test to complete it (manual mode).

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wordloop_core::ports::memory::{InMemoryProgressStore, InMemoryWordSource};
use wordloop_core::{
    EngineError, EngineEvent, EngineListener, ListenRecorder, Locale, PlaybackConfiguration,
    SpeakAttempt, SpeechEngine, UtteranceId, VoiceInfo, Word, WordId, WordLibrary,
};
use wordloop_speech::{PlaybackScheduler, SchedulerDeps, SpeechQueue};

// ── Recording engine ───────────────────────────────────────────────

/// An attempt as seen by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Speak {
        text: String,
        locale: String,
        rate: f32,
        voice: Option<String>,
    },
    Silence(u64),
    Stop,
}

impl Call {
    pub fn speak(text: &str, locale: &str, rate: f32) -> Self {
        Self::Speak {
            text: text.to_string(),
            locale: locale.to_string(),
            rate,
            voice: None,
        }
    }

    /// Same call without the voice, for comparisons.
    fn without_voice(&self) -> Self {
        match self {
            Self::Speak {
                text, locale, rate, ..
            } => Self::speak(text, locale, *rate),
            other => other.clone(),
        }
    }
}

pub struct RecordingEngine {
    voices: Vec<VoiceInfo>,
    ready_on_listen: bool,
    auto_complete: AtomicBool,
    listener: Mutex<Option<EngineListener>>,
    calls: Mutex<Vec<Call>>,
    outstanding: Mutex<Option<UtteranceId>>,
    overlaps: AtomicUsize,
    failing_text: Mutex<Option<String>>,
}

impl RecordingEngine {
    fn build(auto_complete: bool, ready_on_listen: bool) -> Arc<Self> {
        Arc::new(Self {
            voices: vec![
                VoiceInfo::new("en-us", Locale::english_us()),
                VoiceInfo::new("zh-cn", Locale::meaning()),
            ],
            ready_on_listen,
            auto_complete: AtomicBool::new(auto_complete),
            listener: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            outstanding: Mutex::new(None),
            overlaps: AtomicUsize::new(0),
            failing_text: Mutex::new(None),
        })
    }

    /// Completes every attempt immediately.
    pub fn auto() -> Arc<Self> {
        Self::build(true, true)
    }

    /// Attempts stay outstanding until the test completes them.
    pub fn manual() -> Arc<Self> {
        Self::build(false, true)
    }

    /// Manual engine that does not report ready on its own.
    pub fn cold() -> Arc<Self> {
        Self::build(false, false)
    }

    fn listener(&self) -> EngineListener {
        self.listener
            .lock()
            .unwrap()
            .clone()
            .expect("listener installed")
    }

    pub fn set_ready(&self, ready: bool) {
        self.listener().ready(ready);
    }

    /// Report an arbitrary event, as a misbehaving engine might.
    pub fn report(&self, event: EngineEvent) {
        self.listener().send(event);
    }

    /// Make attempts to speak `text` report an error.
    pub fn fail_on(&self, text: &str) {
        *self.failing_text.lock().unwrap() = Some(text.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls with voices stripped and stops removed.
    pub fn attempts(&self) -> Vec<Call> {
        self.calls()
            .iter()
            .filter(|c| **c != Call::Stop)
            .map(Call::without_voice)
            .collect()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Speak { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn stops(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::Stop).count()
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    pub fn outstanding(&self) -> Option<UtteranceId> {
        *self.outstanding.lock().unwrap()
    }

    /// Wait until an attempt is outstanding.
    pub async fn wait_outstanding(&self) -> UtteranceId {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(id) = self.outstanding() {
                return id;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "no attempt reached the engine"
            );
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    /// Wait until at least `n` calls were recorded.
    pub async fn wait_calls(&self, n: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while self.calls().len() < n {
            assert!(tokio::time::Instant::now() < deadline, "engine saw too few calls");
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    /// Finish the outstanding attempt successfully.
    pub fn complete(&self) -> UtteranceId {
        let id = self.outstanding.lock().unwrap().take().expect("outstanding attempt");
        self.listener().done(id);
        id
    }

    /// Fail the outstanding attempt.
    pub fn fail(&self, reason: &str) -> UtteranceId {
        let id = self.outstanding.lock().unwrap().take().expect("outstanding attempt");
        self.listener().error(id, reason);
        id
    }

    fn begin(&self, id: UtteranceId, call: Call) -> Result<(), EngineError> {
        let failing = match &call {
            Call::Speak { text, .. } => self.failing_text.lock().unwrap().as_deref() == Some(text),
            _ => false,
        };
        self.calls.lock().unwrap().push(call);
        {
            let mut outstanding = self.outstanding.lock().unwrap();
            if outstanding.is_some() {
                self.overlaps.fetch_add(1, Ordering::SeqCst);
            }
            *outstanding = Some(id);
        }

        let listener = self.listener();
        listener.started(id);
        if failing {
            self.outstanding.lock().unwrap().take();
            listener.error(id, "synthesis failed");
        } else if self.auto_complete.load(Ordering::SeqCst) {
            self.outstanding.lock().unwrap().take();
            listener.done(id);
        }
        Ok(())
    }
}

impl SpeechEngine for RecordingEngine {
    fn set_listener(&self, listener: EngineListener) {
        if self.ready_on_listen {
            listener.ready(true);
        }
        *self.listener.lock().unwrap() = Some(listener);
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    fn try_speak(&self, attempt: SpeakAttempt<'_>) -> Result<(), EngineError> {
        self.begin(
            attempt.id,
            Call::Speak {
                text: attempt.text.to_string(),
                locale: attempt.locale.to_string(),
                rate: attempt.rate,
                voice: attempt.voice.map(|v| v.name.clone()),
            },
        )
    }

    fn try_silence(&self, id: UtteranceId, duration: Duration) -> Result<(), EngineError> {
        let ms = u64::try_from(duration.as_millis()).unwrap();
        self.begin(id, Call::Silence(ms))
    }

    fn stop(&self) {
        self.calls.lock().unwrap().push(Call::Stop);
        let current = self.outstanding.lock().unwrap().take();
        if let Some(id) = current {
            self.listener().stopped(id);
        }
    }
}

// ── Listen recorder ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordedListens(Mutex<Vec<WordId>>);

impl RecordedListens {
    pub fn ids(&self) -> Vec<WordId> {
        self.0.lock().unwrap().clone()
    }
}

impl ListenRecorder for RecordedListens {
    fn record_listened(&self, word: &Word) {
        self.0.lock().unwrap().push(word.id);
    }
}

// ── Scheduler harness ──────────────────────────────────────────────

pub const LIBRARY: i64 = 1;

pub fn library() -> WordLibrary {
    WordLibrary {
        id: LIBRARY,
        name: "basics".to_string(),
        language_tag: "en".to_string(),
        is_active: true,
    }
}

/// Words `texts` in group 1, meanings `"<text>-m"`.
pub fn words(texts: &[&str]) -> Vec<Word> {
    texts
        .iter()
        .zip(1..)
        .map(|(text, id)| Word::new(id, LIBRARY, 1, *text, format!("{text}-m"), "en"))
        .collect()
}

/// Configuration with group 1 of the test library selected.
pub fn selected(config: PlaybackConfiguration) -> PlaybackConfiguration {
    PlaybackConfiguration {
        active_library_id: Some(LIBRARY),
        selected_group_ids: vec![1],
        ..config
    }
}

pub struct Harness {
    pub engine: Arc<RecordingEngine>,
    pub queue: Arc<SpeechQueue>,
    pub store: Arc<InMemoryProgressStore>,
    pub words: Arc<InMemoryWordSource>,
    pub listens: Arc<RecordedListens>,
    pub scheduler: PlaybackScheduler,
}

impl Harness {
    pub fn new(engine: Arc<RecordingEngine>, config: PlaybackConfiguration, words: Vec<Word>) -> Self {
        let queue = Arc::new(SpeechQueue::new(engine.clone()));
        let store = Arc::new(InMemoryProgressStore::new(config));
        let source = Arc::new(InMemoryWordSource::new(vec![library()], words));
        let listens = Arc::new(RecordedListens::default());
        let scheduler = PlaybackScheduler::with_rng(
            SchedulerDeps {
                queue: queue.clone(),
                store: store.clone(),
                words: source.clone(),
                listened: listens.clone(),
            },
            StdRng::seed_from_u64(11),
        );
        Self {
            engine,
            queue,
            store,
            words: source,
            listens,
            scheduler,
        }
    }

    /// Wait for the running session to end on its own.
    pub async fn wait_idle(&self) {
        let mut state = self.scheduler.subscribe();
        tokio::time::timeout(Duration::from_secs(5), state.wait_for(|s| !s.is_playing))
            .await
            .expect("session did not finish")
            .expect("scheduler dropped");
    }
}
