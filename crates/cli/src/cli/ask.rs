//! `parley ask` — one-shot command.
//!
//! Sends a single message in a fresh session, prints the reply, and exits.
//! Useful for scripting and piping.

use parley_domain::config::Config;
use parley_sessions::SubmitOutcome;

use crate::bootstrap;

/// Run one turn and print the reply. Returns the process exit code.
pub async fn ask(
    config: &Config,
    message: String,
    model: Option<String>,
    json_output: bool,
) -> anyhow::Result<i32> {
    if message.trim().is_empty() {
        anyhow::bail!("message must not be empty");
    }

    let engine = bootstrap::build_engine(config)?;
    if let Some(name) = model {
        engine.select_model(bootstrap::resolve_model(engine.catalog(), &name));
    }

    let outcome = engine.submit_turn(&message).await;
    let (msg, exit_code) = match outcome {
        SubmitOutcome::Replied(msg) => (msg, 0),
        SubmitOutcome::Failed(msg) => (msg, 1),
        other => anyhow::bail!("turn did not complete: {other:?}"),
    };

    if json_output {
        let json = serde_json::to_string_pretty(&msg)
            .map_err(|e| anyhow::anyhow!("serializing reply: {e}"))?;
        println!("{json}");
    } else if exit_code == 0 {
        if let Some(thinking) = &msg.thinking {
            // Dim reasoning on stderr so it doesn't pollute stdout.
            eprintln!("\x1b[2m{thinking}\x1b[0m");
        }
        println!("{}", msg.content());
    } else {
        eprintln!("error: {}", msg.content());
    }

    Ok(exit_code)
}
