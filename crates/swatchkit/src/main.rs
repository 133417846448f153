//! SwatchKit CLI - pattern library and design token generator.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "swatchkit")]
#[command(about = "Pattern library and design token generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to swatchkit.toml config file
    #[arg(short, long, global = true, default_value = config::CONFIG_FILE)]
    config: PathBuf,

    /// Pattern source directory
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, global = true)]
    out_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the pattern library (default)
    Build {
        /// Rebuild when sources change
        #[arg(short, long)]
        watch: bool,
    },

    /// Scaffold tokens, stylesheets and a layout in the current project
    Init {
        /// Replace existing files, keeping a .bak copy
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let file_config = config::load_config(&cwd.join(&cli.config))?;
    let settings = config::resolve(&cwd, &file_config, cli.input.as_deref(), cli.out_dir.as_deref());

    match cli.command.unwrap_or(Commands::Build { watch: false }) {
        Commands::Build { watch } => {
            commands::build::run(settings, watch).await?;
        }
        Commands::Init { force } => {
            commands::init::run(&settings, force)?;
        }
    }

    Ok(())
}
