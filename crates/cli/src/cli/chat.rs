//! `parley chat` — interactive REPL command.
//!
//! Opens a readline-based loop that submits each line as a turn and prints
//! the reply. Supports slash-commands for model switching, session reset,
//! history display, and expanding reasoning.

use std::io::Write;

use parley_domain::config::Config;
use parley_sessions::{ReasoningView, SessionEngine, SubmitOutcome};

use crate::bootstrap;
use crate::render::{render_history, render_message, TYPING_PLACEHOLDER};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive chat REPL.
pub async fn chat(config: &Config, model: Option<String>) -> anyhow::Result<()> {
    let engine = bootstrap::build_engine(config)?;
    if let Some(name) = model {
        engine.select_model(bootstrap::resolve_model(engine.catalog(), &name));
    }
    let mut view = ReasoningView::new();

    // Readline history is kept separately from the conversation and
    // survives restarts; the conversation itself does not.
    let history_path = dirs::home_dir()
        .unwrap_or_default()
        .join(".parley")
        .join("input_history.txt");
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    let _ = rl.load_history(&history_path);

    // Welcome goes to stderr (keep stdout clean for output).
    eprintln!("Parley interactive chat");
    eprintln!(
        "Model: {}  |  Type /help for commands, Ctrl+D to exit",
        engine.selected_model()
    );
    eprintln!();

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(&line).ok();

                if trimmed.starts_with('/') {
                    if handle_slash_command(trimmed, &engine, &mut view) {
                        break;
                    }
                    continue;
                }

                send_message(&engine, &view, &line).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    rl.save_history(&history_path).ok();
    eprintln!("Goodbye!");
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process a slash command. Returns `true` if the REPL should exit.
fn handle_slash_command(input: &str, engine: &SessionEngine, view: &mut ReasoningView) -> bool {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

    match cmd {
        "/exit" | "/quit" => return true,

        "/model" => match arg {
            Some(name) => {
                let model = bootstrap::resolve_model(engine.catalog(), name);
                if engine.catalog().resolve(name).is_none() {
                    eprintln!("(\"{name}\" is not in the catalog; using it as a raw model id)");
                }
                engine.select_model(model.clone());
                eprintln!("Model set to: {model}");
            }
            None => {
                eprintln!("Current model: {}", engine.selected_model());
                eprintln!("Usage: /model <key|id|label>");
            }
        },

        "/models" => {
            let current = engine.selected_model();
            for option in engine.catalog().options() {
                let marker = if option.model == current { "*" } else { " " };
                let reasoning = if option.reasoning { "  [reasoning]" } else { "" };
                eprintln!(
                    "{marker} {:<20} {:<32} {}{reasoning}",
                    option.key, option.model, option.label
                );
            }
        }

        "/reset" => {
            engine.reset_session();
            view.clear();
            eprintln!("Session reset.");
        }

        "/history" => {
            let history = engine.history();
            if history.is_empty() {
                eprintln!("(no messages yet)");
            } else {
                println!("{}\n", render_history(&history, view));
            }
        }

        "/think" => match arg.and_then(|a| a.parse::<usize>().ok()) {
            Some(n) if n >= 1 => {
                let history = engine.history();
                match history.get(n - 1) {
                    Some(msg) if msg.has_reasoning() => {
                        view.toggle(msg.id);
                        println!("{}\n", render_message(n - 1, msg, view));
                    }
                    Some(_) => eprintln!("Message {n} has no reasoning."),
                    None => eprintln!("No message {n} (history has {}).", history.len()),
                }
            }
            _ => eprintln!("Usage: /think <message number>"),
        },

        "/clear" => {
            // ANSI escape: clear screen and move cursor to top-left.
            eprint!("\x1B[2J\x1B[1;1H");
        }

        "/help" => {
            eprintln!("Commands:");
            eprintln!("  /model <name>    Select a model (catalog key, id, or label)");
            eprintln!("  /models          List selectable models");
            eprintln!("  /reset           Clear the conversation");
            eprintln!("  /history         Show the conversation so far");
            eprintln!("  /think <n>       Show or hide the reasoning of message n");
            eprintln!("  /clear           Clear the screen");
            eprintln!("  /exit, /quit     Exit the chat");
            eprintln!("  /help            Show this help");
        }

        other => {
            eprintln!("Unknown command: {other}  (type /help for a list)");
        }
    }

    false
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Turn submission
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

async fn send_message(engine: &SessionEngine, view: &ReasoningView, text: &str) {
    eprint!("\x1B[2m{TYPING_PLACEHOLDER}\x1B[0m");
    std::io::stderr().flush().ok();

    let outcome = engine.submit_turn(text).await;

    // Erase the placeholder line.
    eprint!("\r\x1B[2K");
    std::io::stderr().flush().ok();

    match outcome {
        SubmitOutcome::Replied(msg) => {
            let index = engine.history_len().saturating_sub(1);
            println!("{}\n", render_message(index, &msg, view));
        }
        SubmitOutcome::Failed(msg) => {
            let index = engine.history_len().saturating_sub(1);
            println!("\x1B[31m{}\x1B[0m\n", render_message(index, &msg, view));
        }
        SubmitOutcome::Busy => eprintln!("(a reply is still pending)"),
        SubmitOutcome::Empty | SubmitOutcome::Abandoned => {}
    }
}
