//! History → completion request mapping.

use parley_domain::message::Message;
use parley_providers::{CompletionRequest, Content};

/// Build the request for the next turn from the full history.
///
/// Every stored message becomes exactly one wire entry: content is the
/// message's `output`, else its `text`, else an empty string. The result
/// depends only on `history` and `model`.
pub fn build_request(history: &[Message], model: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        contents: history
            .iter()
            .map(|msg| Content::text(msg.role, msg.content()))
            .collect(),
    }
}
