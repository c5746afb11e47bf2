//! Conversation sessions for Parley.
//!
//! An append-only message history, the mapping from history to completion
//! requests, reply-shape classification, and the single-flight session
//! engine that ties them to a completion service.

pub mod engine;
pub mod history;
pub mod payload;
pub mod reply;
pub mod view;

pub use engine::{SessionEngine, SessionEvent, SubmitOutcome, FALLBACK_ERROR_TEXT};
pub use history::HistoryStore;
pub use payload::build_request;
pub use reply::{classify, Reply};
pub use view::ReasoningView;
