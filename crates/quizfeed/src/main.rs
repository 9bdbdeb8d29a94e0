// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quizfeed - a local quiz and riddle feed.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Quizfeed - a local quiz and riddle feed.
#[derive(Parser, Debug)]
#[command(name = "quizfeed", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the feed (newest first).
    List {
        /// Show archived items instead of the active feed.
        #[arg(long)]
        archived: bool,
        /// Only show this category ("All" for every category).
        #[arg(long)]
        category: Option<String>,
    },
    /// Fetch new items into the feed.
    Fetch {
        /// Fetch for one category instead of the daily mix.
        #[arg(long)]
        category: Option<String>,
        /// Ask for less familiar variations of the category.
        #[arg(long, requires = "category")]
        more: bool,
        /// Fetch a fresh mixed batch.
        #[arg(long, conflicts_with = "category")]
        refresh: bool,
    },
    /// Generate one item from your own request.
    Custom {
        #[arg(required = true, num_args = 1..)]
        request: Vec<String>,
    },
    /// Move an item between the feed and the archive.
    Archive { id: String },
    /// Delete an item permanently.
    Delete { id: String },
    /// Generate a background image for an item.
    Enrich { id: String },
    /// Write a backup of every item.
    Export {
        /// Output file (stdout when omitted).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace all items with the contents of a backup file.
    Import { path: PathBuf },
    /// List the known categories.
    Categories,
    /// Print the effective configuration.
    Config,
    /// Report the store and remote collaborator with their health.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => quizfeed_config::load_and_validate_path(path),
        None => quizfeed_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            quizfeed_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    if cli.plain || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let Some(command) = cli.command else {
        println!("quizfeed: use --help for available commands");
        return;
    };

    if let Err(e) = commands::run(command, &config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so feed output on stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quizfeed={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
