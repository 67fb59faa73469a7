//! Waymark CLI - drive single-page navigation state from the terminal.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "waymark")]
#[command(about = "Scroll-synchronized navigation state for single-page sites")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to waymark.toml config file
    #[arg(short, long, default_value = "waymark.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter waymark.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },

    /// Replay scroll offsets and report the active section after each
    Track {
        /// Scroll offsets (read from stdin, one per line, when omitted)
        offsets: Vec<f64>,

        /// Print one JSON object per offset
        #[arg(long)]
        json: bool,
    },

    /// Scroll to a section
    Goto {
        /// Section key
        section: String,

        /// Offset to start from
        #[arg(long, default_value = "0")]
        from: f64,
    },

    /// Copy a configured code snippet to the clipboard
    Copy {
        /// Snippet id
        snippet: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Track { offsets, json } => {
            commands::track::run(&cli.config, offsets, json).await?;
        }
        Commands::Goto { section, from } => {
            commands::goto::run(&cli.config, &section, from).await?;
        }
        Commands::Copy { snippet } => {
            commands::copy::run(&cli.config, &snippet).await?;
        }
    }

    Ok(())
}
