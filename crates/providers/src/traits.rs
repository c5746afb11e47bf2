use parley_domain::error::Result;
use parley_domain::message::Role;
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One text part of a wire message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One conversation entry as the completion service sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// A full-context completion request: the whole conversation is resent on
/// every turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Model identifier selecting the backend variant.
    pub model: String,
    /// The conversation, oldest first.
    pub contents: Vec<Content>,
}

/// A completion response reduced to its ordered text segments.
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Text of each content part of the first candidate, in order. For
    /// reasoning variants segment 0 is the reasoning and segment 1 the
    /// final answer.
    pub segments: Vec<String>,
    /// The reason the model stopped generating (e.g. "stop", "length").
    pub finish_reason: Option<String>,
    /// Token usage information.
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Token usage for a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core service trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The remote completion endpoint a session talks to.
///
/// Implementations translate [`CompletionRequest`] into the provider's wire
/// format, perform exactly one round-trip, and return either the response
/// segments or an [`Error`](parley_domain::Error) describing the failure.
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    /// Send the request and wait for the full response.
    async fn complete(&self, req: &CompletionRequest) -> Result<CompletionResponse>;

    /// A unique identifier for this service instance.
    fn provider_id(&self) -> &str;
}
