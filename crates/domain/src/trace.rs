use serde::Serialize;

/// Structured trace events emitted across all Parley crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    TurnSubmitted {
        model: String,
        history_len: usize,
    },
    TurnCompleted {
        model: String,
        reasoning: bool,
        thinking_time_ms: u64,
    },
    TurnFailed {
        model: String,
        error: String,
    },
    TurnRejected {
        reason: String,
    },
    SessionReset {
        dropped_messages: usize,
        abandoned_turn: bool,
    },
    ModelSelected {
        model: String,
    },
    CompletionRequest {
        provider: String,
        model: String,
        status: u16,
        duration_ms: u64,
        segments: usize,
        prompt_tokens: Option<u32>,
        completion_tokens: Option<u32>,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "parley_event");
    }
}
