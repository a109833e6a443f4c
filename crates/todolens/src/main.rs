//! CLI entry point for todolens.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use data_dir::JsonDataDir;
use todolens_app::{TodoAggregator, TodoConfig};

mod commands;
mod data_dir;

/// Personal todo list over tasks exported from a production tracker.
#[derive(Parser, Debug)]
#[command(
    name = "todolens",
    version,
    about = "todolens: search, sort and save queries over your assigned tasks"
)]
struct Cli {
    /// Directory holding tasks.json, done.json, statuses.json and filters.json.
    #[arg(long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List open todos, optionally narrowed by a search query.
    Ls {
        #[arg(short = 'q', long)]
        query: Option<String>,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// List recently completed tasks.
    Done {
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// List saved queries.
    Queries,

    /// Save a named query.
    SaveQuery { name: String },

    /// Remove a saved query by name.
    RemoveQuery { name: String },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LsFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli { data, cmd } = Cli::parse();
    install_tracing();

    let data_dir = data.map_or_else(default_data_dir, Ok)?;
    let config = TodoConfig::from_dir(&data_dir)?;

    tokio::runtime::Runtime::new()?.block_on(async move {
        let store = JsonDataDir::new(&data_dir);
        let statuses = store.load_statuses().await?;
        let mut aggregator = TodoAggregator::new(store, statuses, config);
        commands::run(cmd, &mut aggregator).await
    })
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("todolens"))
        .context("Could not determine a data directory; pass --data")
}

fn install_tracing() {
    // RUST_LOG overrides the default INFO level.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
