use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message. Serializes to the wire role names
/// (`"user"` / `"model"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the conversation history.
///
/// Messages are built once and never changed after they are appended to a
/// history. A model message carries either `text` (simple reply or error) or
/// the `thinking` + `output` pair (reasoning reply), never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Identity key for presentation state (e.g. "show reasoning").
    pub id: Uuid,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Seconds between turn submission and response receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_time: Option<f64>,
    pub created_at: DateTime<Utc>,
}

// ── Convenience constructors ───────────────────────────────────────

impl Message {
    fn new(role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: None,
            thinking: None,
            output: None,
            thinking_time: None,
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(Role::User)
        }
    }

    /// A plain model reply.
    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(Role::Model)
        }
    }

    /// A two-part model reply: reasoning followed by the final answer.
    pub fn model_reasoning(thinking: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            thinking: Some(thinking.into()),
            output: Some(output.into()),
            ..Self::new(Role::Model)
        }
    }

    /// Attach the measured round-trip time. Negative or non-finite inputs
    /// are clamped to zero.
    pub fn with_thinking_time(mut self, seconds: f64) -> Self {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self.thinking_time = Some(seconds);
        self
    }

    /// The canonical content: `output` if present, else `text`, else `""`.
    pub fn content(&self) -> &str {
        self.output
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or("")
    }

    /// True for two-part replies that carry a reasoning segment.
    pub fn has_reasoning(&self) -> bool {
        self.thinking.is_some() && self.output.is_some()
    }
}
