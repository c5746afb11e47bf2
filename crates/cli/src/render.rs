//! Plain-text rendering of conversation messages for the terminal.

use parley_domain::message::{Message, Role};
use parley_sessions::ReasoningView;

/// Shown while a turn is in flight.
pub const TYPING_PLACEHOLDER: &str = "Typing...";

/// Render one message. `index` is the 0-based history position; the header
/// shows it 1-based, matching the `/think <n>` command.
pub fn render_message(index: usize, msg: &Message, view: &ReasoningView) -> String {
    let number = index + 1;
    let mut out = String::new();

    match msg.role {
        Role::User => {
            out.push_str(&format!("[{number}] you\n"));
            out.push_str(msg.content());
        }
        Role::Model => {
            out.push_str(&format!("[{number}] model"));
            match (msg.thinking.as_deref(), msg.thinking_time) {
                (Some(thinking), time) => {
                    let time = time.map(format_seconds).unwrap_or_else(|| "?".into());
                    if view.is_expanded(msg.id) {
                        out.push_str(&format!(" · thought for {time}\n"));
                        for line in thinking.lines() {
                            out.push_str("  │ ");
                            out.push_str(line);
                            out.push('\n');
                        }
                        out.push('\n');
                    } else {
                        out.push_str(&format!(
                            " · thought for {time} · /think {number} to show reasoning\n"
                        ));
                    }
                }
                (None, Some(time)) => out.push_str(&format!(" · {}\n", format_seconds(time))),
                (None, None) => out.push('\n'),
            }
            out.push_str(msg.content());
        }
    }

    out
}

/// Render the whole history, one blank line between messages.
pub fn render_history(history: &[Message], view: &ReasoningView) -> String {
    history
        .iter()
        .enumerate()
        .map(|(i, m)| render_message(i, m, view))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Seconds with one decimal, e.g. `1.3s`.
pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.1}s")
}
