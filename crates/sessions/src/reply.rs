//! Response-shape classification.

use parley_domain::error::{Error, Result};
use parley_domain::message::Message;

/// The two shapes a successful model reply can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Simple { text: String },
    Reasoning { thinking: String, output: String },
}

/// Classify response segments.
///
/// A reasoning model with at least two segments yields
/// [`Reply::Reasoning`] from the first two; anything else with at least one
/// segment yields [`Reply::Simple`] from the first. No segments is a
/// malformed response.
pub fn classify(reasoning_model: bool, segments: Vec<String>) -> Result<Reply> {
    let mut segments = segments.into_iter();
    let first = segments
        .next()
        .ok_or_else(|| Error::MalformedResponse("response carried no content segments".into()))?;

    match (reasoning_model, segments.next()) {
        (true, Some(output)) => Ok(Reply::Reasoning {
            thinking: first,
            output,
        }),
        _ => Ok(Reply::Simple { text: first }),
    }
}

impl Reply {
    pub fn is_reasoning(&self) -> bool {
        matches!(self, Reply::Reasoning { .. })
    }

    /// Turn the reply into a model message stamped with the round-trip time.
    pub fn into_message(self, thinking_time: f64) -> Message {
        let message = match self {
            Reply::Simple { text } => Message::model_text(text),
            Reply::Reasoning { thinking, output } => Message::model_reasoning(thinking, output),
        };
        message.with_thinking_time(thinking_time)
    }
}
