//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use seedconf_core::SourceKind;

/// seedconf - Resolve layered team configuration for data-pipeline QA
#[derive(Parser, Debug)]
#[command(name = "seedconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Start the project root search from this directory
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Attempts per resolution when a remote or I/O failure occurs
    #[arg(
        long,
        global = true,
        default_value_t = 3,
        env = "SEEDCONF_MAX_ATTEMPTS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve the settings of one team and environment
    ///
    /// Examples:
    ///   seedconf resolve org_team dev
    ///   seedconf resolve org_team dev --remote vault --json
    ///   seedconf resolve org.team stg --detect-env-vars --keys-only
    Resolve {
        /// Team key, segments separated by '_' or '.'
        team_key: String,

        /// Environment section to resolve
        environment: String,

        /// Import CONF_-prefixed environment variables
        #[arg(long)]
        detect_env_vars: bool,

        /// Remote secret source (vault, secrets_manager, parameter_store)
        #[arg(long, value_name = "KIND")]
        remote: Option<SourceKind>,

        /// Push the local secrets cache to the remote instead of pulling
        #[arg(long, requires = "remote")]
        allow_remote_update: bool,

        /// Output the resolved settings as JSON
        #[arg(long, conflicts_with = "keys_only")]
        json: bool,

        /// Print only the resolved keys
        #[arg(long)]
        keys_only: bool,
    },

    /// Resolve every team and environment listed in the resolution matrix
    Matrix {
        /// Matrix file (defaults to the project's input_params/main_conf.json)
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
}
