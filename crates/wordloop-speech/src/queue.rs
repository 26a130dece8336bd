//! Speech request queue.
//!
//! Serialises requests against a [`SpeechEngine`]: at most one attempt is
//! outstanding, requests resolve in FIFO order, and every caller awaits the
//! outcome of its own request.
//!
//! ```text
//!   enqueue_and_await ─► pending ─► (ready, idle) ─► in flight ─► engine
//!                                                        ▲           │
//!                                                        └── pump ◄──┘
//!                                                          EngineEvent
//! ```
//!
//! # Concurrency Model
//!
//! - All queue state sits behind one `std::sync::Mutex`; it is never held
//!   across an `.await`
//! - Engine callbacks arrive on an unbounded channel drained by a pump task
//! - Completions are matched to the in-flight request by id, so late or
//!   duplicate events for an old attempt are dropped

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use wordloop_core::{
    EngineError, EngineEvent, EngineListener, Locale, SpeakAttempt, SpeechEngine, UtteranceId,
    VoiceMatch, select_voice,
};

use crate::request::{SpeakOutcome, SpeechNotice, SpeechRequest};

/// Reason given for speak requests with nothing to say.
pub const EMPTY_TEXT: &str = "empty text";

const NOTICE_CAPACITY: usize = 16;

struct Pending {
    id: UtteranceId,
    request: SpeechRequest,
    reply: oneshot::Sender<SpeakOutcome>,
}

struct InFlight {
    id: UtteranceId,
    reply: oneshot::Sender<SpeakOutcome>,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Pending>,
    in_flight: Option<InFlight>,
    ready: bool,
    next_id: u64,
}

impl QueueState {
    const fn allocate_id(&mut self) -> UtteranceId {
        self.next_id += 1;
        UtteranceId::new(self.next_id)
    }
}

struct Shared {
    engine: Arc<dyn SpeechEngine>,
    state: Mutex<QueueState>,
    notices: broadcast::Sender<SpeechNotice>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand pending requests to the engine until one is accepted.
    fn dispatch(&self, state: &mut QueueState) {
        while state.ready && state.in_flight.is_none() {
            let Some(next) = state.pending.pop_front() else {
                return;
            };
            match self.submit(next.id, &next.request) {
                Ok(()) => {
                    trace!(id = %next.id, request = %next.request, "Dispatched speech request");
                    state.in_flight = Some(InFlight {
                        id: next.id,
                        reply: next.reply,
                    });
                }
                Err(e) => {
                    warn!(id = %next.id, error = %e, "Speech engine rejected request");
                    let _ = next.reply.send(SpeakOutcome::Error(e.to_string()));
                }
            }
        }
    }

    fn submit(&self, id: UtteranceId, request: &SpeechRequest) -> Result<(), EngineError> {
        match request {
            SpeechRequest::Speak { text, locale, rate } => {
                let voices = self.engine.voices();
                let chosen = select_voice(&voices, locale);
                if chosen == VoiceMatch::Default {
                    self.notify_unsupported(locale);
                }
                self.engine.try_speak(SpeakAttempt {
                    id,
                    text,
                    locale,
                    voice: chosen.voice(),
                    rate: *rate,
                })
            }
            SpeechRequest::Silence { duration } => self.engine.try_silence(id, *duration),
        }
    }

    fn notify_unsupported(&self, locale: &Locale) {
        debug!(%locale, "No installed voice for language, using engine default");
        // No subscribers is fine.
        let _ = self.notices.send(SpeechNotice::UnsupportedLanguage {
            locale: locale.to_string(),
        });
    }

    fn on_event(&self, event: EngineEvent) {
        let mut state = self.lock();
        match event {
            EngineEvent::Ready(ready) => {
                info!(ready, "Speech engine readiness changed");
                state.ready = ready;
            }
            EngineEvent::Started(id) => {
                trace!(%id, "Utterance started");
                return;
            }
            EngineEvent::Done(id) => Self::resolve(&mut state, id, SpeakOutcome::Success),
            EngineEvent::Error { id, reason } => {
                Self::resolve(&mut state, id, SpeakOutcome::Error(reason));
            }
            EngineEvent::Stopped(id) => Self::resolve(&mut state, id, SpeakOutcome::Cancelled),
        }
        self.dispatch(&mut state);
    }

    fn resolve(state: &mut QueueState, id: UtteranceId, outcome: SpeakOutcome) {
        let Some(in_flight) = state.in_flight.take_if(|f| f.id == id) else {
            trace!(%id, ?outcome, "Ignoring completion for request no longer in flight");
            return;
        };
        if let SpeakOutcome::Error(reason) = &outcome {
            warn!(%id, %reason, "Speech engine reported an error");
        }
        let _ = in_flight.reply.send(outcome);
    }

    fn cancel_all(&self) {
        let mut state = self.lock();
        let pending = state.pending.len();
        for request in state.pending.drain(..) {
            let _ = request.reply.send(SpeakOutcome::Cancelled);
        }
        let in_flight = state.in_flight.take();
        let had_in_flight = in_flight.is_some();
        if let Some(in_flight) = in_flight {
            let _ = in_flight.reply.send(SpeakOutcome::Cancelled);
        }
        self.engine.stop();
        if pending > 0 || had_in_flight {
            debug!(pending, had_in_flight, "Cancelled speech requests");
        }
    }

    fn withdraw(&self, id: UtteranceId) {
        let mut state = self.lock();
        let before = state.pending.len();
        state.pending.retain(|p| p.id != id);
        if state.pending.len() != before {
            trace!(%id, "Withdrew abandoned speech request");
        }
    }
}

/// Removes a still-pending request when its caller stops waiting.
struct WithdrawOnDrop<'a> {
    shared: &'a Shared,
    id: UtteranceId,
}

impl Drop for WithdrawOnDrop<'_> {
    fn drop(&mut self) {
        self.shared.withdraw(self.id);
    }
}

/// FIFO queue in front of a single speech engine.
///
/// Must be created inside a Tokio runtime: construction spawns the task
/// that consumes engine events.
pub struct SpeechQueue {
    shared: Arc<Shared>,
    shutdown: CancellationToken,
}

impl SpeechQueue {
    /// Take ownership of the engine's callbacks and start the event pump.
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        let (listener, events) = EngineListener::channel();
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        let shared = Arc::new(Shared {
            engine: Arc::clone(&engine),
            state: Mutex::new(QueueState::default()),
            notices,
        });
        let shutdown = CancellationToken::new();

        tokio::spawn(pump(Arc::clone(&shared), events, shutdown.clone()));
        engine.set_listener(listener);

        Self { shared, shutdown }
    }

    /// Queue `request` and wait for its outcome.
    ///
    /// Blank speech resolves `Error("empty text")` and silence of zero length
    /// resolves `Success`, both without reaching the engine. Dropping the
    /// returned future withdraws the request if it has not been dispatched.
    pub async fn enqueue_and_await(&self, request: SpeechRequest) -> SpeakOutcome {
        if request.is_empty_speech() {
            debug!("Skipping speech request with empty text");
            return SpeakOutcome::Error(EMPTY_TEXT.to_string());
        }
        if matches!(request, SpeechRequest::Silence { duration } if duration.is_zero()) {
            return SpeakOutcome::Success;
        }

        let (reply, outcome) = oneshot::channel();
        let id = {
            let mut state = self.shared.lock();
            let id = state.allocate_id();
            debug!(%id, %request, "Queued speech request");
            state.pending.push_back(Pending { id, request, reply });
            self.shared.dispatch(&mut state);
            id
        };

        let _withdraw = WithdrawOnDrop {
            shared: &self.shared,
            id,
        };
        // A dropped sender means the queue shut down.
        outcome.await.unwrap_or(SpeakOutcome::Cancelled)
    }

    /// Resolve every pending and in-flight request as cancelled and stop
    /// the engine. Safe to call repeatedly and from any thread.
    pub fn cancel_all(&self) {
        self.shared.cancel_all();
    }

    /// Receive [`SpeechNotice`]s published from now on.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<SpeechNotice> {
        self.shared.notices.subscribe()
    }

    /// Whether the engine has reported ready.
    pub fn is_ready(&self) -> bool {
        self.shared.lock().ready
    }

    /// Requests waiting behind the in-flight one.
    pub fn pending_len(&self) -> usize {
        self.shared.lock().pending.len()
    }

    /// Whether a request is with the engine.
    pub fn has_in_flight(&self) -> bool {
        self.shared.lock().in_flight.is_some()
    }
}

impl Drop for SpeechQueue {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn pump(
    shared: Arc<Shared>,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => shared.on_event(event),
                None => break,
            },
        }
    }
    shared.cancel_all();
    debug!("Speech queue pump stopped");
}
