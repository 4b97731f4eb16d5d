//! discord-relay CLI entry point.
//!
//! Provides `run` (default) and `check` subcommands: relay messages until
//! stopped, or validate configuration and exit without connecting.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use discord_relay::app::{self, StartupError};
use discord_relay::config::Settings;
use discord_relay::discord::DiscordConnector;
use discord_relay::logging::{self, LOG_LEVEL_VAR};

/// discord-relay — mirror one Discord channel into another.
#[derive(Parser)]
#[command(name = "discord-relay", version, about)]
struct Cli {
    /// Path to a TOML config file (default: `$RELAY_CONFIG_PATH` or `./relay.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (default: `$LOG_LEVEL` or `info`). `RUST_LOG` overrides.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also write JSON logs to this directory (default: `$RELAY_LOG_DIR`).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Connect to Discord and relay messages (default).
    Run,
    /// Validate configuration and exit without connecting.
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var(LOG_LEVEL_VAR).ok())
        .unwrap_or_else(|| "info".to_owned());
    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| std::env::var_os("RELAY_LOG_DIR").map(PathBuf::from));

    let _logging_guard = match logging::init(&level, log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match cli.command.unwrap_or(Command::Run) {
        Command::Run => app::launch(settings, &DiscordConnector).await,
        Command::Check => handle_check(settings),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Validate settings and report the resolved route.
fn handle_check(settings: Settings) -> Result<(), StartupError> {
    match settings.validate() {
        Ok(config) => {
            info!(
                source_channel = %config.source,
                target_channel = %config.target,
                queue_capacity = config.queue_capacity,
                "configuration ok"
            );
            Ok(())
        }
        Err(e) => {
            error!("{e}");
            Err(StartupError::Config(e))
        }
    }
}
