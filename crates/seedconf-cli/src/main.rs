//! seedconf CLI
//!
//! Resolves layered team configuration from the command line.

mod cli;
mod commands;
mod error;
mod logging;
mod retry;

use std::path::Path;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::OutputFormat;
use error::Result;
use retry::RetryPolicy;
use seedconf_core::ConfigRequest;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let start = match cli.directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let policy = RetryPolicy::default().with_max_attempts(cli.max_attempts);

    execute_command(cli.command, &start, &policy)
}

fn execute_command(cmd: Commands, start: &Path, policy: &RetryPolicy) -> Result<()> {
    match cmd {
        Commands::Resolve {
            team_key,
            environment,
            detect_env_vars,
            remote,
            allow_remote_update,
            json,
            keys_only,
        } => {
            let mut request = ConfigRequest::new(team_key, environment)
                .detect_env_vars(detect_env_vars)
                .allow_remote_update(allow_remote_update);
            request.remote_config_src_type = remote;

            let format = if json {
                OutputFormat::Json
            } else if keys_only {
                OutputFormat::KeysOnly
            } else {
                OutputFormat::Text
            };
            commands::run_resolve(start, &request, format, policy)
        }
        Commands::Matrix { file } => commands::run_matrix(start, file.as_deref(), policy),
    }
}
