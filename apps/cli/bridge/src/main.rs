use bridge::cli::{Cli, Command};
use bridge::commands::{self, Context};
use bridge::logger::{DEFAULT_LOG_LEVEL, initialize as LoggerInitialize};

use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // A .env file is optional.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => DEFAULT_LOG_LEVEL,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = LoggerInitialize(cli.log_dir.as_deref(), level) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), bridge::error::BridgeError> {
    let context = Context::load(cli.config_dir, cli.base_url)?;
    info!("Using server {}", context.config.server.base_url);

    match cli.command {
        Command::Login { credentials } => commands::login::run(&context, &credentials).await,
        Command::Listen { role, credentials } => {
            commands::listen::run(&context, role, &credentials).await
        }
        Command::File {
            operation,
            wait_secs,
            credentials,
        } => commands::file::run(&context, &operation, wait_secs, &credentials).await,
        Command::Watch {
            file,
            component_id,
            screenshot,
            interval_ms,
            credentials,
        } => {
            commands::watch::run(
                &context,
                &file,
                &component_id,
                screenshot,
                interval_ms,
                &credentials,
            )
            .await
        }
        Command::Config { command } => commands::config::run(&context, command),
    }
}
