//! Playback scheduler.
//!
//! Turns the persisted playback configuration into an ordered stream of
//! speech requests, one word at a time:
//!
//! ```text
//!   Idle ──start──► Running ──(end of list, no loop)──► Idle
//!     ▲                │
//!     └──────stop──────┘
//! ```
//!
//! Every step re-reads the configuration and the word list, so settings
//! changed while a word is playing take effect on the next word. A step
//! speaks the word `repeat_count` times with one interval of silence between
//! repetitions, then (mode permitting) one interval of silence and the
//! meaning, records the word as listened and persists the next index.
//!
//! # Concurrency Model
//!
//! - One session task at a time, owned through an async mutex that every
//!   start/stop/navigation call serialises on
//! - Sessions are cancelled through a `CancellationToken`; `stop` waits for
//!   the task to exit before returning
//! - The UI observes a `watch` channel of [`PlayerState`]

use std::sync::{Arc, Mutex, PoisonError, Weak};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use wordloop_core::settings::{validate_interval, validate_repeat_count, validate_speed};
use wordloop_core::{
    GroupId, LibraryId, ListenRecorder, Locale, ModePolicy, NavigationPolicy, NextIndex,
    PlaybackConfiguration, PlaybackMode, PlayerState, ProgressStore, Word, WordSource,
    meaning_rate,
};

use crate::error::SpeechError;
use crate::queue::SpeechQueue;
use crate::request::{SpeakOutcome, SpeechRequest};

/// Collaborators of a [`PlaybackScheduler`].
#[derive(Clone)]
pub struct SchedulerDeps {
    pub queue: Arc<SpeechQueue>,
    pub store: Arc<dyn ProgressStore>,
    pub words: Arc<dyn WordSource>,
    pub listened: Arc<dyn ListenRecorder>,
}

struct Session {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Session {
    fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.task.is_finished()
    }
}

/// Configuration and word list as read at one point in time.
struct Snapshot {
    config: PlaybackConfiguration,
    words: Vec<Word>,
    library_tag: Option<String>,
}

enum StepEnd {
    Continue,
    Finished,
    Cancelled,
}

struct Inner {
    queue: Arc<SpeechQueue>,
    store: Arc<dyn ProgressStore>,
    words: Arc<dyn WordSource>,
    listened: Arc<dyn ListenRecorder>,
    state: watch::Sender<PlayerState>,
    session: AsyncMutex<Option<Session>>,
    rng: Mutex<StdRng>,
    shutdown: CancellationToken,
}

impl Inner {
    // ── Reading ────────────────────────────────────────────────────

    async fn snapshot(&self) -> Result<Snapshot, SpeechError> {
        let config = self.store.load().await?;
        let library = match config.active_library_id {
            Some(id) => self.words.library(id).await?,
            None => self.words.active_library().await?,
        };

        let words = match &library {
            Some(library) if !config.selected_group_ids.is_empty() => {
                self.words
                    .words_for(library.id, &config.selected_group_ids)
                    .await?
            }
            _ => Vec::new(),
        };

        Ok(Snapshot {
            config,
            words,
            library_tag: library.map(|l| l.language_tag),
        })
    }

    // ── Publishing ─────────────────────────────────────────────────

    fn publish_snapshot(&self, snapshot: &Snapshot) {
        let config = &snapshot.config;
        let word = snapshot.words.get(config.current_index).cloned();
        self.state.send_modify(|state| {
            if state.current_word != word || state.mode != config.mode {
                state.show_meaning = ModePolicy::for_mode(config.mode).display_meaning;
            }
            state.apply_settings(config);
            state.current_index = config.current_index;
            state.word_count = snapshot.words.len();
            state.current_word = word;
        });
    }

    fn mirror_settings(&self, config: &PlaybackConfiguration) {
        self.state.send_if_modified(|state| {
            let before = state.clone();
            if state.mode != config.mode {
                state.show_meaning = ModePolicy::for_mode(config.mode).display_meaning;
            }
            state.apply_settings(config);
            *state != before
        });
    }

    fn set_playing(&self, playing: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.is_playing != playing;
            state.is_playing = playing;
            changed
        });
    }

    // ── Navigation ─────────────────────────────────────────────────

    fn advance(&self, config: &PlaybackConfiguration, len: usize) -> NextIndex {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        NavigationPolicy::from_config(config).advance(config.current_index, len, &mut *rng)
    }

    fn retreat(&self, config: &PlaybackConfiguration, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        NavigationPolicy::from_config(config).retreat(config.current_index, len, &mut *rng)
    }

    // ── Session lifecycle ──────────────────────────────────────────

    async fn stop_locked(&self, session: &mut Option<Session>) {
        if let Some(current) = session.take() {
            current.cancel.cancel();
            self.queue.cancel_all();
            if let Err(e) = current.task.await {
                if e.is_panic() {
                    error!(error = %e, "Playback task panicked");
                }
            }
            debug!("Playback session stopped");
        } else {
            self.queue.cancel_all();
        }
        self.set_playing(false);
    }

    async fn start_locked(
        self: &Arc<Self>,
        session: &mut Option<Session>,
    ) -> Result<bool, SpeechError> {
        self.stop_locked(session).await;

        let mut snapshot = self.snapshot().await?;
        if snapshot.words.is_empty() {
            info!("Nothing to play: no words in the current selection");
            self.publish_snapshot(&snapshot);
            return Ok(false);
        }
        if snapshot.config.current_index >= snapshot.words.len() {
            warn!(
                index = snapshot.config.current_index,
                words = snapshot.words.len(),
                "Stored index out of range, starting from the first word"
            );
            self.store.set_current_index(0).await?;
            snapshot.config.current_index = 0;
        }
        self.publish_snapshot(&snapshot);
        self.set_playing(true);

        let cancel = self.shutdown.child_token();
        let task = tokio::spawn(Arc::clone(self).run(cancel.clone()));
        *session = Some(Session { cancel, task });

        info!(
            index = snapshot.config.current_index,
            words = snapshot.words.len(),
            mode = %snapshot.config.mode,
            "Playback started"
        );
        Ok(true)
    }

    async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let reason = loop {
            match self.play_step(&cancel).await {
                Ok(StepEnd::Continue) => {}
                Ok(StepEnd::Finished) => break "finished",
                Ok(StepEnd::Cancelled) => break "stopped",
                Err(e) => {
                    error!(error = %e, "Playback aborted: progress could not be read or saved");
                    break "failed";
                }
            }
        };
        if !cancel.is_cancelled() {
            self.set_playing(false);
        }
        info!(reason, "Playback session ended");
    }

    // ── One word ───────────────────────────────────────────────────

    async fn play_step(&self, cancel: &CancellationToken) -> Result<StepEnd, SpeechError> {
        let snapshot = self.snapshot().await?;
        let config = &snapshot.config;
        let Some(word) = snapshot.words.get(config.current_index) else {
            if snapshot.words.is_empty() {
                info!("Word list is empty, halting");
            } else {
                warn!(
                    index = config.current_index,
                    words = snapshot.words.len(),
                    "Index out of range, halting"
                );
            }
            return Ok(StepEnd::Finished);
        };

        self.publish_snapshot(&snapshot);
        debug!(
            index = config.current_index,
            word = %word.text,
            mode = %config.mode,
            repeat = config.word_repeat_count,
            "Playing word"
        );

        if !self.speak_word(word, &snapshot, cancel).await {
            return Ok(StepEnd::Cancelled);
        }
        self.listened.record_listened(word);

        match self.advance(config, snapshot.words.len()) {
            NextIndex::At(next) => {
                self.store.set_current_index(next).await?;
                self.store.touch_last_played(Utc::now()).await?;
                Ok(StepEnd::Continue)
            }
            NextIndex::End => {
                self.store.touch_last_played(Utc::now()).await?;
                info!("Reached the end of the word list");
                Ok(StepEnd::Finished)
            }
        }
    }

    /// Speak one word per the mode table. Returns `false` once cancelled.
    async fn speak_word(&self, word: &Word, snapshot: &Snapshot, cancel: &CancellationToken) -> bool {
        let config = &snapshot.config;
        let policy = ModePolicy::for_mode(config.mode);
        let gap = SpeechRequest::silence_ms(config.interval_ms());

        if policy.speak_word {
            let locale = Locale::for_word(word, snapshot.library_tag.as_deref());
            for repetition in 0..config.word_repeat_count.max(1) {
                if repetition > 0 && !self.say(gap.clone(), cancel).await {
                    return false;
                }
                let request = SpeechRequest::speak(&word.text, locale.clone(), config.speed);
                if !self.say(request, cancel).await {
                    return false;
                }
            }
        }

        if policy.speak_meaning {
            if policy.separator_silence && !self.say(gap.clone(), cancel).await {
                return false;
            }
            let request =
                SpeechRequest::speak(&word.meaning, Locale::meaning(), meaning_rate(config.speed));
            if !self.say(request, cancel).await {
                return false;
            }
        }

        // Hidden words still take one interval so the drill keeps its pace.
        if !policy.speaks_anything() {
            return self.say(gap, cancel).await;
        }
        true
    }

    async fn say(&self, request: SpeechRequest, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => return false,
            outcome = self.queue.enqueue_and_await(request) => outcome,
        };
        if let SpeakOutcome::Error(reason) = outcome {
            debug!(%reason, "Speech request failed, continuing");
        }
        !cancel.is_cancelled()
    }
}

/// Drives a [`SpeechQueue`] from the persisted playback configuration.
///
/// Must be created inside a Tokio runtime.
pub struct PlaybackScheduler {
    inner: Arc<Inner>,
}

impl PlaybackScheduler {
    /// Scheduler with an entropy-seeded RNG for random navigation.
    pub fn new(deps: SchedulerDeps) -> Self {
        Self::with_rng(deps, StdRng::seed_from_u64(rand::random()))
    }

    /// Scheduler with a caller-provided RNG.
    pub fn with_rng(deps: SchedulerDeps, rng: StdRng) -> Self {
        let initial = PlayerState::from_configuration(&deps.store.subscribe().borrow());
        let (state, _) = watch::channel(initial);
        let inner = Arc::new(Inner {
            queue: deps.queue,
            store: deps.store,
            words: deps.words,
            listened: deps.listened,
            state,
            session: AsyncMutex::new(None),
            rng: Mutex::new(rng),
            shutdown: CancellationToken::new(),
        });
        spawn_settings_mirror(&inner);
        Self { inner }
    }

    /// Observe the player state.
    pub fn subscribe(&self) -> watch::Receiver<PlayerState> {
        self.inner.state.subscribe()
    }

    /// Current player state.
    pub fn state(&self) -> PlayerState {
        self.inner.state.borrow().clone()
    }

    /// Reload configuration and word list into the player state without playing.
    pub async fn refresh(&self) -> Result<PlayerState, SpeechError> {
        let snapshot = self.inner.snapshot().await?;
        self.inner.publish_snapshot(&snapshot);
        Ok(self.state())
    }

    /// Whether a session is running.
    pub async fn is_playing(&self) -> bool {
        self.inner
            .session
            .lock()
            .await
            .as_ref()
            .is_some_and(Session::is_running)
    }

    /// Start playing from the stored index, stopping any running session first.
    pub async fn start(&self) -> Result<(), SpeechError> {
        let mut session = self.inner.session.lock().await;
        self.inner.start_locked(&mut session).await?;
        Ok(())
    }

    /// Stop playback. Idempotent.
    pub async fn stop(&self) {
        let mut session = self.inner.session.lock().await;
        self.inner.stop_locked(&mut session).await;
    }

    /// Stop if playing, otherwise start.
    pub async fn toggle(&self) -> Result<(), SpeechError> {
        let mut session = self.inner.session.lock().await;
        if session.as_ref().is_some_and(Session::is_running) {
            self.inner.stop_locked(&mut session).await;
        } else {
            self.inner.start_locked(&mut session).await?;
        }
        Ok(())
    }

    /// Move to the next word; playback resumes if it was running.
    ///
    /// At the end of the list without loop the index stays put and playback
    /// stays stopped.
    pub async fn next(&self) -> Result<(), SpeechError> {
        self.navigate(true).await
    }

    /// Move to the previous word; playback resumes if it was running.
    pub async fn previous(&self) -> Result<(), SpeechError> {
        self.navigate(false).await
    }

    async fn navigate(&self, forward: bool) -> Result<(), SpeechError> {
        let mut session = self.inner.session.lock().await;
        let was_playing = session.as_ref().is_some_and(Session::is_running);
        self.inner.stop_locked(&mut session).await;

        let mut snapshot = self.inner.snapshot().await?;
        let len = snapshot.words.len();
        let target = if forward {
            self.inner.advance(&snapshot.config, len).index()
        } else {
            Some(self.inner.retreat(&snapshot.config, len))
        };

        let Some(target) = target else {
            debug!("Already at the last word");
            self.inner.publish_snapshot(&snapshot);
            return Ok(());
        };

        if target != snapshot.config.current_index {
            self.inner.store.set_current_index(target).await?;
            snapshot.config.current_index = target;
        }
        let now = Utc::now();
        self.inner.store.touch_last_played(now).await?;
        snapshot.config.last_played_at = Some(now);
        self.inner.publish_snapshot(&snapshot);
        debug!(index = target, forward, "Navigated");

        if was_playing {
            self.inner.start_locked(&mut session).await?;
        }
        Ok(())
    }

    // ── Settings ───────────────────────────────────────────────────

    async fn after_settings_write(&self) -> Result<(), SpeechError> {
        let config = self.inner.store.load().await?;
        self.inner.mirror_settings(&config);
        Ok(())
    }

    pub async fn set_speed(&self, speed: f32) -> Result<(), SpeechError> {
        validate_speed(speed)?;
        self.inner.store.set_speed(speed).await?;
        self.after_settings_write().await
    }

    pub async fn set_interval(&self, interval_secs: f32) -> Result<(), SpeechError> {
        validate_interval(interval_secs)?;
        self.inner.store.set_interval(interval_secs).await?;
        self.after_settings_write().await
    }

    pub async fn set_mode(&self, mode: PlaybackMode) -> Result<(), SpeechError> {
        self.inner.store.set_mode(mode).await?;
        self.after_settings_write().await
    }

    pub async fn set_random(&self, is_random: bool) -> Result<(), SpeechError> {
        self.inner.store.set_random(is_random).await?;
        self.after_settings_write().await
    }

    pub async fn set_loop(&self, is_loop: bool) -> Result<(), SpeechError> {
        self.inner.store.set_loop(is_loop).await?;
        self.after_settings_write().await
    }

    pub async fn toggle_random(&self) -> Result<(), SpeechError> {
        let current = self.inner.store.load().await?.is_random;
        self.set_random(!current).await
    }

    pub async fn toggle_loop(&self) -> Result<(), SpeechError> {
        let current = self.inner.store.load().await?.is_loop;
        self.set_loop(!current).await
    }

    /// Change repetitions per word. A running session restarts the current
    /// word so the new count applies immediately.
    pub async fn set_repeat_count(&self, count: u32) -> Result<(), SpeechError> {
        validate_repeat_count(count)?;
        self.inner.store.set_repeat_count(count).await?;
        self.after_settings_write().await?;

        let mut session = self.inner.session.lock().await;
        if session.as_ref().is_some_and(Session::is_running) {
            debug!(count, "Repeat count changed, restarting current word");
            self.inner.start_locked(&mut session).await?;
        }
        Ok(())
    }

    /// Play `groups` of `library` from their first word, restarting a
    /// running session.
    pub async fn select_groups(
        &self,
        library: LibraryId,
        groups: &[GroupId],
    ) -> Result<(), SpeechError> {
        let mut session = self.inner.session.lock().await;
        let was_playing = session.as_ref().is_some_and(Session::is_running);
        self.inner.stop_locked(&mut session).await;

        self.inner.store.set_selection(Some(library), groups).await?;
        self.inner.store.set_current_index(0).await?;
        let snapshot = self.inner.snapshot().await?;
        self.inner.publish_snapshot(&snapshot);
        info!(library, groups = ?groups, words = snapshot.words.len(), "Selection changed");

        if was_playing {
            self.inner.start_locked(&mut session).await?;
        }
        Ok(())
    }

    /// Flip whether the meaning is shown. Display only; speech is unaffected.
    pub fn toggle_meaning(&self) {
        self.inner
            .state
            .send_modify(|state| state.show_meaning = !state.show_meaning);
    }

    /// Stop playback and end background tasks.
    pub async fn shutdown(&self) {
        self.stop().await;
        self.inner.shutdown.cancel();
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        self.inner.shutdown.cancel();
    }
}

/// Copy settings written to the store by anyone into the player state.
fn spawn_settings_mirror(inner: &Arc<Inner>) {
    let weak: Weak<Inner> = Arc::downgrade(inner);
    let mut configs = inner.store.subscribe();
    let shutdown = inner.shutdown.clone();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                changed = configs.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            let config = configs.borrow_and_update().clone();
            let Some(inner) = weak.upgrade() else {
                break;
            };
            inner.mirror_settings(&config);
        }
    });
}
