//! DevSpark Assist - context-aware AI assistance for the DevSpark IDE
//!
//! Aggregates editor, file-tree, metadata and user-action context into a
//! bounded priority window and dispatches assistance requests against a
//! pluggable generation backend.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

mod ai;
mod cli;
mod config;
mod ui;
mod workspace;

/// DevSpark Assist - Your AI Development Partner
#[derive(Parser)]
#[command(name = "devspark")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Context-aware AI assistance for the DevSpark IDE", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Workspace root for the file-tree context
    #[arg(short, long, global = true, default_value = ".")]
    workspace: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Chat {
        /// Initial prompt (one-shot mode)
        prompt: Option<String>,

        /// File treated as the open editor buffer
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Get inline completion suggestions
    Suggest {
        /// File treated as the open editor buffer
        file: PathBuf,

        /// Text before the cursor (defaults to the file's last line)
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Explain a code file
    Explain {
        /// File to explain
        file: PathBuf,
    },

    /// Get refactoring suggestions for a code file
    Refactor {
        /// File to refactor
        file: PathBuf,
    },

    /// Show or initialize configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize configuration file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let mut config = config::load_config(cli.config.as_deref())?;
    config.verbose = cli.verbose;

    debug!("DevSpark Assist v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::Chat { prompt, file }) => {
            cli::chat::run(config, &cli.workspace, file.as_deref(), prompt).await?;
        }
        Some(Commands::Suggest { file, prefix }) => {
            cli::suggest::run(config, &cli.workspace, &file, prefix).await?;
        }
        Some(Commands::Explain { file }) => {
            cli::explain::run(config, &cli.workspace, &file).await?;
        }
        Some(Commands::Refactor { file }) => {
            cli::refactor::run(config, &cli.workspace, &file).await?;
        }
        Some(Commands::Config { show, init }) => {
            if init {
                config::init_config()?;
            } else if show {
                config::show_config(&config)?;
            }
        }
        None => {
            // Default: Start interactive chat
            cli::chat::run(config, &cli.workspace, None, None).await?;
        }
    }

    Ok(())
}
