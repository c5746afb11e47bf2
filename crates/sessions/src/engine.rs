//! The conversation session engine.
//!
//! Owns the history, the draft, the selected model, and the in-flight flag,
//! and runs one turn at a time against a [`CompletionService`]:
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ AppendingSuccess ──▶ Idle
//!                      │
//!                      └──err──▶ AppendingError ──────────▶ Idle
//! ```
//!
//! State lives behind a mutex that is never held across the service call,
//! so the engine can be shared through an `Arc`. The in-flight flag is the
//! only mutual exclusion between turns: a second submission while it is set
//! returns [`SubmitOutcome::Busy`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use parley_domain::catalog::ModelCatalog;
use parley_domain::config::SessionConfig;
use parley_domain::error::{Error, Result};
use parley_domain::message::{Message, Role};
use parley_domain::trace::TraceEvent;
use parley_providers::{CompletionRequest, CompletionResponse, CompletionService};

use crate::history::HistoryStore;
use crate::payload::build_request;
use crate::reply::classify;

/// Text of the model message appended when a turn fails without a
/// service-supplied diagnostic.
pub const FALLBACK_ERROR_TEXT: &str = "Sorry, an error occurred.";

const EVENT_CAPACITY: usize = 64;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Events & outcomes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Change notifications for renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    #[serde(rename = "message_appended")]
    MessageAppended { id: Uuid, role: Role, index: usize },

    #[serde(rename = "in_flight_changed")]
    InFlightChanged { in_flight: bool },

    #[serde(rename = "model_selected")]
    ModelSelected { model: String },

    #[serde(rename = "reset")]
    Reset,
}

/// What a call to [`SessionEngine::submit_turn`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Input was empty or whitespace; nothing changed.
    Empty,
    /// A turn was already in flight; nothing changed.
    Busy,
    /// The service answered; the reply was appended.
    Replied(Message),
    /// The service failed; an error message was appended.
    Failed(Message),
    /// The session was reset while the turn was in flight; the result was
    /// dropped.
    Abandoned,
}

impl SubmitOutcome {
    /// The model message appended by this turn, if any.
    pub fn message(&self) -> Option<&Message> {
        match self {
            SubmitOutcome::Replied(m) | SubmitOutcome::Failed(m) => Some(m),
            _ => None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Engine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct SessionState {
    history: HistoryStore,
    pending_input: String,
    in_flight: bool,
    selected_model: String,
    /// Bumped by every reset so an orphaned turn can tell it is stale.
    generation: u64,
}

pub struct SessionEngine {
    service: Arc<dyn CompletionService>,
    catalog: ModelCatalog,
    turn_timeout: Option<Duration>,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionEngine {
    pub fn new(
        service: Arc<dyn CompletionService>,
        config: &SessionConfig,
        catalog: ModelCatalog,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            service,
            catalog,
            turn_timeout: config.turn_timeout(),
            state: Mutex::new(SessionState {
                history: HistoryStore::new(),
                pending_input: String::new(),
                in_flight: false,
                selected_model: config.default_model.clone(),
                generation: 0,
            }),
            events,
        }
    }

    // ── Turn submission ────────────────────────────────────────────

    /// Run one turn: append `raw_text` as a user message, call the service
    /// with the full history, append the reply or an error message.
    ///
    /// Never returns an error: service failures become model messages.
    pub async fn submit_turn(&self, raw_text: &str) -> SubmitOutcome {
        if raw_text.trim().is_empty() {
            return SubmitOutcome::Empty;
        }

        let (request, guard, started) = {
            let mut state = self.state.lock();
            if state.in_flight {
                drop(state);
                tracing::warn!("turn submitted while another is in flight; ignoring");
                TraceEvent::TurnRejected {
                    reason: "turn already in flight".into(),
                }
                .emit();
                return SubmitOutcome::Busy;
            }

            self.append_locked(&mut state, Message::user(raw_text));
            state.pending_input.clear();
            state.in_flight = true;
            let started = Instant::now();
            let _ = self
                .events
                .send(SessionEvent::InFlightChanged { in_flight: true });

            let request = build_request(state.history.snapshot(), &state.selected_model);
            let guard = InFlightGuard {
                engine: self,
                generation: state.generation,
            };
            (request, guard, started)
        };

        TraceEvent::TurnSubmitted {
            model: request.model.clone(),
            history_len: request.contents.len(),
        }
        .emit();

        let result = self
            .call_service(&request)
            .instrument(tracing::debug_span!(
                "completion",
                provider = %self.service.provider_id(),
                model = %request.model,
            ))
            .await;
        let elapsed = started.elapsed();

        let reasoning_model = self.catalog.is_reasoning(&request.model);
        let (message, succeeded) =
            match result.and_then(|resp| classify(reasoning_model, resp.segments)) {
                Ok(reply) => {
                    TraceEvent::TurnCompleted {
                        model: request.model.clone(),
                        reasoning: reply.is_reasoning(),
                        thinking_time_ms: elapsed.as_millis() as u64,
                    }
                    .emit();
                    (reply.into_message(elapsed.as_secs_f64()), true)
                }
                Err(e) => {
                    tracing::warn!(model = %request.model, error = %e, "turn failed");
                    TraceEvent::TurnFailed {
                        model: request.model.clone(),
                        error: e.to_string(),
                    }
                    .emit();
                    let text = e.service_message().unwrap_or(FALLBACK_ERROR_TEXT);
                    (Message::model_text(text), false)
                }
            };

        let appended = {
            let mut state = self.state.lock();
            if state.generation == guard.generation {
                self.append_locked(&mut state, message.clone());
                true
            } else {
                false
            }
        };
        drop(guard);

        match (appended, succeeded) {
            (false, _) => {
                tracing::debug!("session was reset during the turn; reply discarded");
                SubmitOutcome::Abandoned
            }
            (true, true) => SubmitOutcome::Replied(message),
            (true, false) => SubmitOutcome::Failed(message),
        }
    }

    /// Submit the current draft.
    pub async fn submit_pending(&self) -> SubmitOutcome {
        let draft = self.state.lock().pending_input.clone();
        self.submit_turn(&draft).await
    }

    async fn call_service(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        match self.turn_timeout {
            Some(limit) => tokio::time::timeout(limit, self.service.complete(request))
                .await
                .unwrap_or_else(|_| {
                    Err(Error::Timeout(format!(
                        "no response within {} ms",
                        limit.as_millis()
                    )))
                }),
            None => self.service.complete(request).await,
        }
    }

    fn append_locked(&self, state: &mut SessionState, message: Message) {
        let event = SessionEvent::MessageAppended {
            id: message.id,
            role: message.role,
            index: state.history.len(),
        };
        state.history.append(message);
        let _ = self.events.send(event);
    }

    // ── Session controls ───────────────────────────────────────────

    /// Drop the whole history and draft and clear the in-flight flag.
    pub fn reset_session(&self) {
        let mut state = self.state.lock();
        let dropped_messages = state.history.len();
        let abandoned_turn = state.in_flight;

        state.history.clear();
        state.pending_input.clear();
        state.in_flight = false;
        state.generation += 1;

        let _ = self.events.send(SessionEvent::Reset);
        if abandoned_turn {
            let _ = self
                .events
                .send(SessionEvent::InFlightChanged { in_flight: false });
        }
        drop(state);

        TraceEvent::SessionReset {
            dropped_messages,
            abandoned_turn,
        }
        .emit();
    }

    /// Target `model` from the next turn on. A turn already in flight keeps
    /// the model it was submitted with.
    pub fn select_model(&self, model: impl Into<String>) {
        let model = model.into();
        self.state.lock().selected_model = model.clone();
        let _ = self.events.send(SessionEvent::ModelSelected {
            model: model.clone(),
        });
        TraceEvent::ModelSelected { model }.emit();
    }

    pub fn set_pending_input(&self, text: impl Into<String>) {
        self.state.lock().pending_input = text.into();
    }

    // ── Read-only snapshots ────────────────────────────────────────

    pub fn history(&self) -> Vec<Message> {
        self.state.lock().history.snapshot().to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.state.lock().history.len()
    }

    pub fn in_flight(&self) -> bool {
        self.state.lock().in_flight
    }

    pub fn selected_model(&self) -> String {
        self.state.lock().selected_model.clone()
    }

    pub fn pending_input(&self) -> String {
        self.state.lock().pending_input.clone()
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Receive a [`SessionEvent`] for every history, in-flight, model, or
    /// reset change made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// In-flight guard
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Clears the in-flight flag when dropped, including when the turn future
/// itself is dropped mid-call. Does nothing if the session was reset since
/// the turn started.
struct InFlightGuard<'a> {
    engine: &'a SessionEngine,
    generation: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.engine.state.lock();
        if state.generation == self.generation && state.in_flight {
            state.in_flight = false;
            let _ = self
                .engine
                .events
                .send(SessionEvent::InFlightChanged { in_flight: false });
        }
    }
}
