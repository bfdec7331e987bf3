//! caosdb CLI - bootstrap the review bot database

use anyhow::Context;
use caosdb::config::{self, PathOverrides};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "caosdb")]
#[command(version)]
#[command(about = "Bootstrap the review bot database from users.json and msgcat.txt")]
#[command(long_about = r#"
caosdb fills caos.db with reviewers from users.json and with the submissions
they reviewed, taken from the report lines of msgcat.txt:

  [<problem>] <submission id> - <verdict> [<reviewer initials>]

Run without arguments inside the directory holding both files.

Example usage:
  caosdb
  caosdb stats
  caosdb reviews 123456789
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the database and input files [default: current directory]
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Config file [default: caosdb.toml in the working directory]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file [default: caos.db]
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import users and submissions (the default)
    Import {
        /// Path to the user map [default: users.json]
        #[arg(long)]
        users: Option<PathBuf>,

        /// Path to the message log [default: msgcat.txt]
        #[arg(long)]
        messages: Option<PathBuf>,
    },

    /// Show row counts and reviews per reviewer
    Stats {
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// List the submissions reviewed by a user
    Reviews {
        /// Reviewer user id
        reviewer: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let base = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let base = base
        .canonicalize()
        .with_context(|| format!("working directory {} is not accessible", base.display()))?;

    let config_path = cli
        .config
        .as_ref()
        .map(|path| base.join(path))
        .unwrap_or_else(|| config::default_config_path_in(&base));
    let file_config = config::load_config(&config_path)?;

    let mut overrides = PathOverrides {
        database: cli.database.clone(),
        ..Default::default()
    };

    match cli.command.unwrap_or(Commands::Import { users: None, messages: None }) {
        Commands::Import { users, messages } => {
            overrides.users = users;
            overrides.messages = messages;
            let paths = config::resolve_paths(&base, file_config.as_ref(), &overrides);
            commands::run_import(&paths)?;
        }

        Commands::Stats { json } => {
            let paths = config::resolve_paths(&base, file_config.as_ref(), &overrides);
            commands::run_stats(&paths.database, json)?;
        }

        Commands::Reviews { reviewer, json } => {
            let paths = config::resolve_paths(&base, file_config.as_ref(), &overrides);
            commands::run_reviews(&paths.database, reviewer, json)?;
        }
    }

    Ok(())
}
