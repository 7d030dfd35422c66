//! Sandbox CLI - terminal front end for the Git sandbox simulator.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "sandbox")]
#[command(about = "Practice Git commands against a simulated repository", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (missing file = defaults)
    #[arg(long, global = true, default_value = "sandbox.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Repl {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Run commands non-interactively and print their output
    Run {
        #[command(flatten)]
        source: SourceArgs,
        /// Read commands from a file, one per line
        #[arg(long)]
        script: Option<PathBuf>,
        /// Print the final repository state as JSON
        #[arg(long)]
        json: bool,
        /// Commands to run, each a full line (e.g. "git init")
        commands: Vec<String>,
    },
    /// List bundled sample repositories
    Samples {
        /// Print one sample as JSON
        #[arg(long)]
        show: Option<String>,
    },
    /// Draw the commit graph
    Graph {
        #[command(flatten)]
        source: SourceArgs,
        /// Commands to run before drawing
        #[arg(long)]
        script: Option<PathBuf>,
        /// Output format (text, dot)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config path
        #[arg(long)]
        write: bool,
    },
}

/// Where the starting repository comes from.
#[derive(clap::Args, Default)]
pub struct SourceArgs {
    /// Start from a bundled sample
    #[arg(long, conflicts_with = "sample_file")]
    pub sample: Option<String>,
    /// Start from a sample JSON file
    #[arg(long)]
    pub sample_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(&cli.config)?;

    match cli
        .command
        .unwrap_or_else(|| Commands::Repl {
            source: SourceArgs::default(),
        }) {
        Commands::Repl { source } => commands::repl::run(&config, &source),
        Commands::Run {
            source,
            script,
            json,
            commands,
        } => commands::run::run(&config, &source, script.as_deref(), &commands, json),
        Commands::Samples { show } => commands::samples::run(show.as_deref()),
        Commands::Graph {
            source,
            script,
            format,
        } => commands::graph::run(&config, &source, script.as_deref(), &format),
        Commands::Config { write } => commands::config::run(&config, &cli.config, write),
    }
}
