//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod chat;
mod config_cmd;
mod extract;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lexishield::{AnalysisMode, Config};

#[derive(Parser)]
#[command(name = "lexishield")]
#[command(about = "Legal document analysis: summaries, jargon, loopholes, asymmetry and chat")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "LEXISHIELD_BACKEND_URL")]
    backend_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a PDF and run one or more single-shot analyses on it
    Analyze {
        /// PDF file to analyze
        file: PathBuf,
        /// Analysis to run: summary, jargon, loopholes or asymmetry (repeatable, default: summary)
        #[arg(short, long = "mode")]
        modes: Vec<AnalysisMode>,
    },

    /// Extract a PDF and ask questions about it interactively
    Chat {
        /// PDF file to discuss
        file: PathBuf,
    },

    /// Extract a PDF and print its text
    Extract {
        /// PDF file to extract
        file: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    }
    .with_cli_overrides(cli.backend_url.as_deref());

    match cli.command {
        Commands::Analyze { file, modes } => analyze::cmd_analyze(&config, &file, &modes).await,
        Commands::Chat { file } => chat::cmd_chat(&config, &file).await,
        Commands::Extract { file } => extract::cmd_extract(&config, &file).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config),
        },
    }
}
