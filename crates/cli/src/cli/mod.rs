pub mod ask;
pub mod chat;
pub mod config;
pub mod models;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use parley_domain::config::Config;

/// Parley — a terminal chat client for Gemini models.
#[derive(Debug, Parser)]
#[command(name = "parley", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive chat session (default when no subcommand is given).
    Chat {
        /// Model to start with (catalog key, model id, or label).
        #[arg(long)]
        model: Option<String>,
    },
    /// Send a single message and print the reply.
    Ask {
        /// The message to send.
        message: String,
        /// Model override (catalog key, model id, or label).
        #[arg(long)]
        model: Option<String>,
        /// Output the reply message as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// List the selectable models.
    Models,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
    /// Store the API key in the OS keychain.
    SetSecret,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `PARLEY_CONFIG` (or
/// `parley.toml` by default). Returns the parsed [`Config`] and the path
/// that was used.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path = std::env::var("PARLEY_CONFIG").unwrap_or_else(|_| "parley.toml".into());
    let config = load_config_from(Path::new(&config_path))?;
    Ok((config, config_path))
}

/// Parse the config at `path`; a missing file yields the defaults.
pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
