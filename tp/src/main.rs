//! Trip Planner - CLI entry point

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use tripplanner::cli::{Cli, Command};
use tripplanner::config::Config;
use tripplanner::repl::{self, PlannerRepl};
use tripplanner::session::Settled;
use tripplanner::{TripForm, create_client};

fn parse_level(level: &str) -> Option<tracing::Level> {
    match level.to_uppercase().as_str() {
        "TRACE" => Some(tracing::Level::TRACE),
        "DEBUG" => Some(tracing::Level::DEBUG),
        "INFO" => Some(tracing::Level::INFO),
        "WARN" | "WARNING" => Some(tracing::Level::WARN),
        "ERROR" => Some(tracing::Level::ERROR),
        _ => None,
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Log to a file so the interactive terminal stays clean
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripplanner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => parse_level(s).unwrap_or_else(|| {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            tracing::Level::INFO
        }),
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("tripplanner.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        debug!(%base_url, "main: overriding base url");
        config.service.base_url = base_url;
    }

    info!("tripplanner using service at {}", config.service.base_url);

    // Dispatch command
    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None | Some(Command::Interactive) => repl::run_interactive(&config, None).await,
        Some(Command::Plan { form, chat }) => cmd_plan(&config, form.into(), chat).await,
        Some(Command::Config) => {
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

async fn cmd_plan(config: &Config, form: TripForm, chat: bool) -> Result<()> {
    debug!(destination = %form.destination, chat, "cmd_plan: called");
    let client = create_client(&config.service).context("Failed to create planner client")?;
    let mut session = PlannerRepl::new(client, config);

    let settled = session.submit(&form).await.context("Invalid trip form")?;
    match settled {
        Settled::Displayed if chat => session.run_chat().await,
        Settled::Displayed | Settled::Stale => Ok(()),
        Settled::Errored => Err(eyre::eyre!("The planning service could not generate a plan")),
        Settled::Alerted => Err(eyre::eyre!("The planning service could not be reached")),
    }
}
