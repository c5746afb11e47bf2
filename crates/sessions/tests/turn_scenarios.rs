//! End-to-end turn tests for [`SessionEngine`] against a scripted in-memory
//! completion service.
//!
//! The scripted service pops one canned result per call, records every
//! request it receives, and can optionally hold a call open until the test
//! releases it, which makes the in-flight window observable.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use parley_domain::catalog::ModelCatalog;
use parley_domain::config::SessionConfig;
use parley_domain::error::{Error, Result};
use parley_domain::message::Role;
use parley_providers::{CompletionRequest, CompletionResponse, CompletionService};
use parley_sessions::{SessionEngine, SessionEvent, SubmitOutcome, FALLBACK_ERROR_TEXT};
use tokio::sync::Notify;

const REASONING_MODEL: &str = "gemini-2.0-flash-thinking-exp";
const PLAIN_MODEL: &str = "gemini-1.5-flash";

// ── Scripted service ───────────────────────────────────────────────────

#[derive(Default)]
struct Gate {
    entered: Notify,
    release: Notify,
}

#[derive(Default)]
struct ScriptedService {
    replies: Mutex<VecDeque<Result<CompletionResponse>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
    gate: Option<Gate>,
}

impl ScriptedService {
    fn replying(replies: Vec<Result<CompletionResponse>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    fn gated() -> Self {
        Self {
            gate: Some(Gate::default()),
            ..Default::default()
        }
    }

    fn gate(&self) -> &Gate {
        self.gate.as_ref().expect("service is not gated")
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl CompletionService for ScriptedService {
    async fn complete(&self, req: &CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().push(req.clone());
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(CompletionResponse::from_segments(["ok"])))
    }

    fn provider_id(&self) -> &str {
        "scripted"
    }
}

fn engine_with(service: Arc<ScriptedService>, config: SessionConfig) -> SessionEngine {
    SessionEngine::new(service, &config, ModelCatalog::builtin())
}

fn engine_for(service: Arc<ScriptedService>) -> SessionEngine {
    engine_with(service, SessionConfig::default())
}

fn segments(parts: &[&str]) -> Result<CompletionResponse> {
    Ok(CompletionResponse::from_segments(parts.iter().copied()))
}

// ── Scenarios ──────────────────────────────────────────────────────────

#[tokio::test]
async fn greeting_appends_user_then_model() {
    let service = Arc::new(ScriptedService::replying(vec![segments(&["Hello! How can I help?"])]));
    let engine = engine_for(service.clone());
    assert!(!engine.in_flight());

    let outcome = engine.submit_turn("Hi").await;

    assert!(matches!(outcome, SubmitOutcome::Replied(_)));
    assert!(!engine.in_flight());
    let history = engine.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].text.as_deref(), Some("Hi"));
    assert_eq!(history[1].role, Role::Model);
    assert_eq!(history[1].text.as_deref(), Some("Hello! How can I help?"));
    assert!(history[1].thinking_time.unwrap() >= 0.0);

    let requests = service.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].contents.len(), 1);
    assert_eq!(requests[0].contents[0].parts[0].text, "Hi");
}

#[tokio::test]
async fn reasoning_model_with_two_segments_splits_reply() {
    let service = Arc::new(ScriptedService {
        delay: Some(Duration::from_millis(10)),
        ..ScriptedService::replying(vec![segments(&["reasoning text", "final text"])])
    });
    let engine = engine_for(service);
    engine.select_model(REASONING_MODEL);

    let outcome = engine.submit_turn("What is 6 x 7?").await;

    let SubmitOutcome::Replied(msg) = outcome else {
        panic!("expected a reply, got {outcome:?}");
    };
    assert_eq!(msg.role, Role::Model);
    assert_eq!(msg.thinking.as_deref(), Some("reasoning text"));
    assert_eq!(msg.output.as_deref(), Some("final text"));
    assert!(msg.text.is_none());
    assert!(msg.thinking_time.unwrap() > 0.0);
}

#[tokio::test]
async fn plain_model_with_two_segments_stays_simple() {
    let service = Arc::new(ScriptedService::replying(vec![segments(&["first", "second"])]));
    let engine = engine_for(service);
    engine.select_model(PLAIN_MODEL);

    let outcome = engine.submit_turn("hello").await;
    let msg = outcome.message().unwrap();
    assert_eq!(msg.text.as_deref(), Some("first"));
    assert!(msg.thinking.is_none());
    assert!(msg.output.is_none());
}

#[tokio::test]
async fn service_error_message_becomes_model_message() {
    let service = Arc::new(ScriptedService::replying(vec![Err(Error::Api {
        status: 429,
        message: Some("quota exceeded".into()),
    })]));
    let engine = engine_for(service);

    let outcome = engine.submit_turn("Hi").await;

    let SubmitOutcome::Failed(msg) = outcome else {
        panic!("expected a failure, got {outcome:?}");
    };
    assert_eq!(msg.role, Role::Model);
    assert_eq!(msg.text.as_deref(), Some("quota exceeded"));
    assert!(msg.thinking_time.is_none());
    assert_eq!(engine.history_len(), 2);
    assert!(!engine.in_flight());
}

#[tokio::test]
async fn failure_without_body_uses_fallback_text() {
    let service = Arc::new(ScriptedService::replying(vec![
        Err(Error::Http("connection reset by peer".into())),
        Err(Error::Api {
            status: 500,
            message: None,
        }),
    ]));
    let engine = engine_for(service);

    for _ in 0..2 {
        let outcome = engine.submit_turn("Hi").await;
        let msg = outcome.message().unwrap();
        assert_eq!(msg.text.as_deref(), Some(FALLBACK_ERROR_TEXT));
        assert!(msg.thinking_time.is_none());
    }
    assert_eq!(FALLBACK_ERROR_TEXT, "Sorry, an error occurred.");
    assert_eq!(engine.history_len(), 4);
}

#[tokio::test]
async fn zero_segments_is_a_failure() {
    let service = Arc::new(ScriptedService::replying(vec![segments(&[])]));
    let engine = engine_for(service);
    engine.select_model(REASONING_MODEL);

    let outcome = engine.submit_turn("Hi").await;
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(
        engine.history()[1].text.as_deref(),
        Some(FALLBACK_ERROR_TEXT)
    );
}

#[tokio::test]
async fn reset_clears_history_and_flag() {
    let service = Arc::new(ScriptedService::default());
    let engine = engine_for(service);
    engine.submit_turn("one").await;
    engine.submit_turn("two").await;
    engine.set_pending_input("unsent");
    assert_eq!(engine.history_len(), 4);

    engine.reset_session();

    assert!(engine.history().is_empty());
    assert!(!engine.in_flight());
    assert_eq!(engine.pending_input(), "");

    // The session stays usable.
    engine.submit_turn("three").await;
    assert_eq!(engine.history_len(), 2);
}

// ── Properties ─────────────────────────────────────────────────────────

#[tokio::test]
async fn each_turn_adds_two_and_resends_full_history_once() {
    let service = Arc::new(ScriptedService::default());
    let engine = engine_for(service.clone());

    for (turn, text) in ["a", "b", "c"].iter().enumerate() {
        engine.submit_turn(text).await;
        assert_eq!(engine.history_len(), 2 * (turn + 1));
    }

    let requests = service.requests();
    assert_eq!(requests.len(), 3);
    for (turn, req) in requests.iter().enumerate() {
        // Prior turns plus the new user message, sent exactly once.
        assert_eq!(req.contents.len(), 2 * turn + 1);
        let users = req.contents.iter().filter(|c| c.role == Role::User).count();
        assert_eq!(users, turn + 1);
    }
    let last: Vec<_> = requests[2]
        .contents
        .iter()
        .map(|c| c.parts[0].text.as_str())
        .collect();
    assert_eq!(last, vec!["a", "ok", "b", "ok", "c"]);
}

#[tokio::test]
async fn whitespace_input_changes_nothing() {
    let service = Arc::new(ScriptedService::default());
    let engine = engine_for(service.clone());
    engine.submit_turn("Hi").await;

    assert_eq!(engine.submit_turn("   ").await, SubmitOutcome::Empty);
    assert_eq!(engine.history_len(), 2);
    assert!(!engine.in_flight());
    assert_eq!(service.requests().len(), 1);
}

#[tokio::test]
async fn in_flight_during_call_and_second_submit_is_busy() {
    let service = Arc::new(ScriptedService::gated());
    let engine = Arc::new(engine_for(service.clone()));

    let turn = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit_turn("first").await })
    };
    service.gate().entered.notified().await;

    assert!(engine.in_flight());
    assert_eq!(engine.history_len(), 1);

    assert_eq!(engine.submit_turn("second").await, SubmitOutcome::Busy);
    assert_eq!(engine.history_len(), 1);
    assert_eq!(service.requests().len(), 1);

    service.gate().release.notify_one();
    let outcome = turn.await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Replied(_)));
    assert!(!engine.in_flight());
    assert_eq!(engine.history_len(), 2);
}

#[tokio::test]
async fn model_is_captured_at_submission() {
    let service = Arc::new(ScriptedService::gated());
    let engine = Arc::new(engine_for(service.clone()));
    engine.select_model(PLAIN_MODEL);

    let turn = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit_turn("hi").await })
    };
    service.gate().entered.notified().await;
    engine.select_model(REASONING_MODEL);
    service.gate().release.notify_one();
    turn.await.unwrap();

    assert_eq!(service.requests()[0].model, PLAIN_MODEL);
    assert_eq!(engine.selected_model(), REASONING_MODEL);
}

#[tokio::test]
async fn reset_during_turn_discards_late_reply() {
    let service = Arc::new(ScriptedService::gated());
    let engine = Arc::new(engine_for(service.clone()));

    let turn = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit_turn("hi").await })
    };
    service.gate().entered.notified().await;

    engine.reset_session();
    assert!(!engine.in_flight());
    assert!(engine.history().is_empty());

    service.gate().release.notify_one();
    assert_eq!(turn.await.unwrap(), SubmitOutcome::Abandoned);
    assert!(engine.history().is_empty());
    assert!(!engine.in_flight());
}

#[tokio::test(start_paused = true)]
async fn turn_timeout_synthesizes_error() {
    let service = Arc::new(ScriptedService {
        delay: Some(Duration::from_secs(60)),
        ..Default::default()
    });
    let engine = engine_with(
        service,
        SessionConfig {
            turn_timeout_ms: Some(1_000),
            ..Default::default()
        },
    );

    let outcome = engine.submit_turn("hello?").await;

    let SubmitOutcome::Failed(msg) = outcome else {
        panic!("expected a failure, got {outcome:?}");
    };
    assert_eq!(msg.text.as_deref(), Some(FALLBACK_ERROR_TEXT));
    assert!(!engine.in_flight());
    assert_eq!(engine.history_len(), 2);
}

#[tokio::test(start_paused = true)]
async fn thinking_time_spans_the_whole_service_call() {
    let service = Arc::new(ScriptedService {
        delay: Some(Duration::from_millis(1_500)),
        ..Default::default()
    });
    let engine = engine_for(service);

    let outcome = engine.submit_turn("take your time").await;

    let SubmitOutcome::Replied(msg) = outcome else {
        panic!("expected a reply, got {outcome:?}");
    };
    let seconds = msg.thinking_time.unwrap();
    assert!((seconds - 1.5).abs() < 1e-3, "thinking_time was {seconds}");
}

#[tokio::test]
async fn dropping_turn_future_clears_flag() {
    let service = Arc::new(ScriptedService::gated());
    let engine = Arc::new(engine_for(service.clone()));

    let turn = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit_turn("hi").await })
    };
    service.gate().entered.notified().await;
    assert!(engine.in_flight());

    turn.abort();
    assert!(turn.await.unwrap_err().is_cancelled());

    assert!(!engine.in_flight());
    assert_eq!(engine.history_len(), 1);
}

#[tokio::test]
async fn events_follow_turn_lifecycle() {
    let service = Arc::new(ScriptedService::default());
    let engine = engine_for(service);
    let mut events = engine.subscribe();

    engine.submit_turn("Hi").await;
    engine.select_model(PLAIN_MODEL);
    engine.reset_session();

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }

    assert_eq!(seen.len(), 6, "events: {seen:?}");
    assert!(matches!(
        seen[0],
        SessionEvent::MessageAppended { role: Role::User, index: 0, .. }
    ));
    assert_eq!(seen[1], SessionEvent::InFlightChanged { in_flight: true });
    assert!(matches!(
        seen[2],
        SessionEvent::MessageAppended { role: Role::Model, index: 1, .. }
    ));
    assert_eq!(seen[3], SessionEvent::InFlightChanged { in_flight: false });
    assert_eq!(
        seen[4],
        SessionEvent::ModelSelected {
            model: PLAIN_MODEL.into()
        }
    );
    assert_eq!(seen[5], SessionEvent::Reset);
}
