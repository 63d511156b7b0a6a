use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use undolog_core::Document;
use undolog_history::{discard_oversized_unit, HistoryConfig, TruncateOutcome, UndoManager};

/// Types a file into a document one command at a time and reports what the
/// undo log holds before and after a collection pass.
#[derive(Parser, Debug)]
#[command(name = "undolog", version, about)]
struct Cli {
    /// Text file to type in.
    file: PathBuf,

    /// Characters typed per command.
    #[arg(long, default_value_t = 16)]
    chunk: usize,

    /// History config file. Defaults to the user config location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Discard a unit over the outer limit instead of evicting by tiers.
    #[arg(long)]
    discard_oversized: bool,

    /// Number of newest units to size separately.
    #[arg(long, default_value_t = 1)]
    units: i64,
}

/// Size summary of a document's undo log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Report {
    entries: usize,
    units: usize,
    bytes: usize,
    newest_bytes: usize,
}

impl Report {
    fn of(doc: &Document, unit_limit: i64) -> Result<Self> {
        let log = doc.log();
        Ok(Self {
            entries: log.len(),
            units: log.unit_count(),
            bytes: log.compute_size(None)?.unwrap_or(0),
            newest_bytes: log.compute_size(Some(unit_limit))?.unwrap_or(0),
        })
    }
}

fn load_config(path: Option<&Path>) -> HistoryConfig {
    let path = path.map_or_else(HistoryConfig::config_path, Path::to_path_buf);
    let config = HistoryConfig::load_or_create(&path);
    tracing::info!(path = %path.display(), ?config, "Loaded history config");
    config
}

/// Inserts `text` at the end of `doc`, `chunk` chars per command.
fn type_in(mgr: &mut UndoManager, doc: &mut Document, text: &str, chunk: usize) -> Result<()> {
    let chars: Vec<char> = text.chars().collect();
    for piece in chars.chunks(chunk.max(1)) {
        let piece: String = piece.iter().collect();
        doc.insert(mgr, &piece)?;
        mgr.insert_boundary(doc)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut mgr = UndoManager::new(load_config(cli.config.as_deref()));
    if cli.discard_oversized {
        mgr.set_outer_limit_hook(Box::new(discard_oversized_unit));
    }

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    let mut doc = Document::new();
    type_in(&mut mgr, &mut doc, &text, cli.chunk)?;

    let before = Report::of(&doc, cli.units)?;
    println!("before: {before:?}");

    let outcome = mgr.truncate(&mut doc)?;
    if outcome == TruncateOutcome::HandledByHook {
        tracing::info!("Outer-limit hook discarded the log");
    }
    println!("truncate: {outcome:?}");
    println!("after: {:?}", Report::of(&doc, cli.units)?);

    Ok(())
}
