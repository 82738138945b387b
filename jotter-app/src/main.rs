mod app_dir;
mod cli;
mod commands;
mod data_uri;
mod error;
mod preferences;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use cli::Cli;
use preferences::Preferences;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Starting Jotter");

    let prefs_path = cli.config.clone().unwrap_or_else(app_dir::preferences_path);
    let prefs = Preferences::load(&prefs_path);

    match commands::run(cli.command, &prefs, &prefs_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    }
}
