use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use scribe_pad_config::{EditorConfig, OperationHistoryStore};
use scribe_pad_core::{AiOperation, BufferInput, EditingSession, SelectionRange};

/// Merges text into a document the way the writing pad does.
#[derive(Parser, Debug)]
#[command(name = "scribe-pad", version, about)]
struct Cli {
    /// File holding the initial text.
    file: Option<PathBuf>,

    /// Initial text, used instead of FILE.
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Text to insert.
    #[arg(long)]
    insert: Option<String>,

    /// Caret or selection to insert at, as `POS` or `START..END` (UTF-16).
    /// Defaults to the end of the text.
    #[arg(long, value_parser = parse_range)]
    at: Option<SelectionRange>,

    /// Replace the selection instead of inserting after it.
    #[arg(long)]
    replace: bool,

    /// Select the inserted text in the reported selection.
    #[arg(long)]
    select: bool,

    /// Record the insertion as the result of an operation
    /// (generate, rewrite, summarize, transcribe).
    #[arg(long, value_parser = parse_operation)]
    record: Option<AiOperation>,

    /// Config file to use instead of the one next to the executable.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the text and selection as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_range(s: &str) -> Result<SelectionRange, String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid offset '{v}': {e}"))
    };
    match s.split_once("..") {
        Some((start, end)) => Ok(SelectionRange::new(parse(start)?, parse(end)?)),
        None => Ok(SelectionRange::caret(parse(s)?)),
    }
}

fn parse_operation(s: &str) -> Result<AiOperation, String> {
    AiOperation::from_name(s).ok_or_else(|| format!("unknown operation '{s}'"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting scribe-pad");

    let config_path = cli.config.clone().unwrap_or_else(EditorConfig::config_path);
    let config = EditorConfig::load_or_create(&config_path);

    let initial = match (&cli.text, &cli.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => String::new(),
    };

    let mut session =
        EditingSession::with_input(BufferInput::new(&initial), config.session_options());
    if let Some(range) = cli.at {
        session.update_captured_selection(range.start, range.end);
    }

    let mut opts = config.insert_options(cli.replace);
    opts.select_after_insert |= cli.select;

    let selection = match (&cli.insert, cli.record) {
        (Some(text), Some(operation)) => {
            let outcome = session.apply_operation_result(operation, text, opts);
            record_result(&config, operation, &initial, &session.text());
            outcome.selection
        }
        (Some(text), None) => session.insert_with(text, opts).selection,
        (None, _) => session.captured_selection(),
    };

    let text = session.end();
    if cli.json {
        let output = serde_json::json!({ "text": text, "selection": selection });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to encode output")?
        );
    } else {
        println!("{text}");
    }

    Ok(())
}

/// Persists an operation result. Failures are logged, not fatal.
fn record_result(config: &EditorConfig, operation: AiOperation, input: &str, output: &str) {
    let path = config.history_db_path();
    let result = OperationHistoryStore::open(&path)
        .and_then(|store| store.record(operation, input, output));
    match result {
        Ok(id) => tracing::info!("Recorded {operation} result {id} in {}", path.display()),
        Err(e) => tracing::warn!("Failed to record {operation} result: {e:#}"),
    }
}
