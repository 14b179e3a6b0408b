use std::path::PathBuf;

use clap::Parser;

/// Job board HTTP API server.
#[derive(Debug, Parser)]
#[command(name = "jobboard-backend", version, about)]
pub struct CliArgs {
    /// Path to a JSON, YAML or TOML configuration file.
    #[arg(short = 'c', long = "config", env = "JOBBOARD_CONFIG_PATH")]
    pub config_path: Option<PathBuf>,
}
