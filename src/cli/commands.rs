use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::engine::{CommandEngine, QueryEngine, UnconfiguredEngine};
use crate::export::{
    ExportFormat, FixedLocation, SaveLocationChooser, SuggestedNameIn, export_history,
};
use crate::store::{FileSnapshot, HistoryStore, MAX_ITEMS};
use crate::utils::logging::{init_file_logging, init_stderr_logging};
use crate::utils::{format_path_with_tilde, get_data_dir, preview_line};
use crate::view::format_timestamp;

/// Width of the query/result previews printed by `list`
const LIST_PREVIEW_CHARS: usize = 40;

#[derive(Parser)]
#[command(name = "query-history")]
#[command(version)]
#[command(about = "Browse, re-run and export translation query history", long_about = None)]
pub struct Cli {
    /// Directory holding the history snapshot and log file
    #[arg(long, global = true, env = "QUERY_HISTORY_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Shell command answering live queries (text on stdin, QUERY_FROM/QUERY_TO in env)
    #[arg(long, global = true, env = "QUERY_HISTORY_ENGINE", value_name = "CMD")]
    pub engine: Option<String>,

    /// Log at info level
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive history browser (default)
    Browse,
    /// Record a query and its result
    Save {
        text: String,
        result: String,
        /// Source language code
        #[arg(long)]
        from: String,
        /// Target language code
        #[arg(long)]
        to: String,
        /// Service that produced the result
        #[arg(long)]
        service: Option<String>,
    },
    /// Print entries, most recent first
    List {
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Delete one entry by id
    Delete { id: String },
    /// Delete every entry
    Clear,
    /// Export the whole history
    Export {
        #[arg(long, short, value_enum)]
        format: ExportFormat,
        /// Destination file (default: suggested name in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show statistics about the history
    Stats,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = get_data_dir(cli.data_dir)?;
    let command = cli.command.unwrap_or(Commands::Browse);

    // The browser owns the terminal, so it logs to a file instead of stderr
    if matches!(command, Commands::Browse) {
        init_file_logging(&data_dir, cli.debug)?;
    } else {
        init_stderr_logging(cli.debug);
    }

    match command {
        Commands::Browse => browse(&data_dir, build_engine(cli.engine))?,
        Commands::Save { text, result, from, to, service } => {
            let mut store = open_store(&data_dir);
            match store.save(&text, &result, &from, &to, service.as_deref()) {
                Some(id) => println!("{}", id),
                None => eprintln!("Nothing saved: query and result must not be blank"),
            }
            warn_if_not_persisted(&store);
        }
        Commands::List { limit } => list(&open_store(&data_dir), limit),
        Commands::Delete { id } => {
            let mut store = open_store(&data_dir);
            if !store.delete(&id) {
                bail!("No history entry with id {}", id);
            }
            println!("Deleted {}", id);
            warn_if_not_persisted(&store);
        }
        Commands::Clear => {
            let mut store = open_store(&data_dir);
            let count = store.len();
            store.clear();
            println!("Cleared {} entries", count);
            warn_if_not_persisted(&store);
        }
        Commands::Export { format, output } => export(&open_store(&data_dir), format, output)?,
        Commands::Stats => show_stats(&data_dir),
    }

    Ok(())
}

fn build_engine(command: Option<String>) -> Box<dyn QueryEngine> {
    match command.filter(|c| !c.trim().is_empty()) {
        Some(command) => Box::new(CommandEngine::new(command)),
        None => Box::new(UnconfiguredEngine),
    }
}

fn open_store(data_dir: &Path) -> HistoryStore {
    HistoryStore::open(FileSnapshot::new(data_dir))
}

fn browse(data_dir: &Path, engine: Box<dyn QueryEngine>) -> Result<()> {
    info!(data_dir = %data_dir.display(), engine = engine.name(), "starting history browser");
    let store = open_store(data_dir);
    let export_dir = env::current_dir().unwrap_or_else(|_| data_dir.to_path_buf());
    crate::tui::run_interactive(store, engine, export_dir)
}

fn warn_if_not_persisted(store: &HistoryStore) {
    if let Some(error) = store.last_persist_error() {
        eprintln!("warning: history was not saved to disk: {}", error);
    }
}

fn list(store: &HistoryStore, limit: Option<usize>) {
    if store.is_empty() {
        println!("No history entries");
        return;
    }

    for entry in store.all_items().iter().take(limit.unwrap_or(MAX_ITEMS)) {
        println!(
            "{}  {}  {} → {}  {}  =>  {}",
            entry.id,
            format_timestamp(&entry.timestamp),
            entry.source_language,
            entry.target_language,
            preview_line(&entry.query_text, LIST_PREVIEW_CHARS),
            preview_line(&entry.result_text, LIST_PREVIEW_CHARS),
        );
    }
}

fn export(store: &HistoryStore, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let mut chooser: Box<dyn SaveLocationChooser> = match output {
        Some(path) => Box::new(FixedLocation::new(path)),
        None => Box::new(SuggestedNameIn(
            env::current_dir().context("Failed to read current directory")?,
        )),
    };

    if let Some(path) = export_history(store, format, chooser.as_mut())? {
        println!(
            "Exported {} entries as {} to {}",
            store.len(),
            format.label(),
            format_path_with_tilde(&path)
        );
    }
    Ok(())
}

fn show_stats(data_dir: &Path) {
    let snapshot = FileSnapshot::new(data_dir);
    let data_file = snapshot.path().to_path_buf();
    let store = HistoryStore::open(snapshot);
    let items = store.all_items();

    let mut services: BTreeMap<&str, usize> = BTreeMap::new();
    let mut pairs: BTreeMap<String, usize> = BTreeMap::new();
    for entry in &items {
        *services.entry(entry.service.as_deref().unwrap_or("(none)")).or_default() += 1;
        *pairs
            .entry(format!("{} → {}", entry.source_language, entry.target_language))
            .or_default() += 1;
    }

    println!("Query History Statistics");
    println!("========================");
    println!("Total entries: {} (max {})", items.len(), MAX_ITEMS);
    println!("Services:");
    for (service, count) in &services {
        println!("  {}: {}", service, count);
    }
    println!("Language pairs:");
    for (pair, count) in &pairs {
        println!("  {}: {}", pair, count);
    }
    println!();
    println!("Data file: {}", format_path_with_tilde(&data_file));

    if let Some(oldest) = items.last() {
        println!("Oldest entry: {}", oldest.timestamp.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(newest) = items.first() {
        println!("Newest entry: {}", newest.timestamp.format("%Y-%m-%d %H:%M:%S"));
    }
}
