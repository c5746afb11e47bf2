use clap::Parser;
use tracing_subscriber::EnvFilter;

use parley_cli::cli::{Cli, Command, ConfigCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing();

    match cli.command {
        // Default to chat when no subcommand is given.
        None => {
            let (config, _) = parley_cli::cli::load_config()?;
            parley_cli::cli::chat::chat(&config, None).await
        }
        Some(Command::Chat { model }) => {
            let (config, _) = parley_cli::cli::load_config()?;
            parley_cli::cli::chat::chat(&config, model).await
        }
        Some(Command::Ask {
            message,
            model,
            json,
        }) => {
            let (config, _) = parley_cli::cli::load_config()?;
            let code = parley_cli::cli::ask::ask(&config, message, model, json).await?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Some(Command::Models) => {
            let (config, _) = parley_cli::cli::load_config()?;
            parley_cli::cli::models::list(&config);
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, config_path) = parley_cli::cli::load_config()?;
            if !parley_cli::cli::config::validate(&config, &config_path) {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _) = parley_cli::cli::load_config()?;
            parley_cli::cli::config::show(&config)
        }
        Some(Command::Config(ConfigCommand::SetSecret)) => {
            let (config, _) = parley_cli::cli::load_config()?;
            parley_cli::cli::config::set_secret(&config)
        }
        Some(Command::Version) => {
            println!("parley {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize compact stderr-only tracing.
///
/// Defaults to `warn` level so diagnostic output does not pollute stdout.
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
