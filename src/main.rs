//! grant-swipe CLI
//!
//! Swipe through grant and scholarship cards in the terminal.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;

use grant_swipe::config::{load_config, StackConfig};
use grant_swipe::deck::{inspect, read_cards, Deck};
use grant_swipe::journal::{default_journal_path, read_entries, saved_grants, Journal};
use grant_swipe::logging::{init_logging, LogTarget};
use grant_swipe::report::{format_deck_summary, format_saved, DeckSummary};
use grant_swipe::stack::CardStack;
use grant_swipe::tui;
use grant_swipe::types::OutputFormat;

#[derive(Parser)]
#[command(name = "grant-swipe")]
#[command(about = "Swipe through grants: right to save, left to pass")]
#[command(version)]
struct Cli {
    /// Log debug detail (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse a deck interactively
    Browse {
        /// Deck file (JSON)
        deck: PathBuf,

        /// Stack tuning (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Where decisions are recorded (default: user data dir)
        #[arg(long)]
        journal: Option<PathBuf>,

        /// Write logs here while the TUI runs
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// List saved grants from the journal
    Saved {
        /// Journal file (default: user data dir)
        #[arg(long)]
        journal: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Validate a deck file and summarise it
    Check {
        /// Deck file (JSON)
        deck: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Browse { deck, config, journal, log_file } => {
            cmd_browse(&deck, config.as_deref(), journal, log_file, cli.verbose)
        }
        Commands::Saved { journal, format } => cmd_saved(journal, format.into(), cli.verbose),
        Commands::Check { deck, format } => cmd_check(&deck, format.into(), cli.verbose),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

fn cmd_browse(
    deck_path: &Path,
    config_path: Option<&Path>,
    journal: Option<PathBuf>,
    log_file: Option<PathBuf>,
    verbose: bool,
) -> Result<(), String> {
    // The TUI owns the terminal: log to a file or not at all.
    let target = log_file.map_or(LogTarget::Off, LogTarget::File);
    init_logging(&target, verbose).map_err(|e| format!("cannot open log file: {}", e))?;

    let config = match config_path {
        Some(path) => load_config(path).map_err(|e| e.to_string())?,
        None => StackConfig::default(),
    };

    let cards = read_cards(deck_path).map_err(|e| e.to_string())?;
    let issues = inspect(&cards);
    if !issues.is_empty() {
        eprintln!(
            "Note: {} has {} issue(s) and will open empty. Run `grant-swipe check` for details.",
            deck_path.display(),
            issues.len()
        );
    }

    let journal_path = resolve_journal(journal);
    info!(deck = %deck_path.display(), journal = %journal_path.display(), "starting browse");

    let stack = CardStack::new(Deck::new(cards), config, Journal::new(journal_path));
    let journal = tui::run(stack).map_err(|e| format!("terminal error: {}", e))?;

    let (accepted, discarded) = journal.counts();
    println!("Saved {}, passed {}.", accepted, discarded);
    if journal.failures() > 0 {
        eprintln!(
            "Warning: {} decision(s) could not be written to {}",
            journal.failures(),
            journal.path().display()
        );
    }
    Ok(())
}

fn cmd_saved(journal: Option<PathBuf>, format: OutputFormat, verbose: bool) -> Result<(), String> {
    init_logging(&LogTarget::Stderr, verbose).map_err(|e| e.to_string())?;

    let path = resolve_journal(journal);
    let entries = read_entries(&path).map_err(|e| e.to_string())?;
    let saved = saved_grants(&entries);

    print!("{}", format_saved(&saved, format));
    Ok(())
}

fn cmd_check(deck_path: &Path, format: OutputFormat, verbose: bool) -> Result<(), String> {
    init_logging(&LogTarget::Stderr, verbose).map_err(|e| e.to_string())?;

    let cards = read_cards(deck_path).map_err(|e| e.to_string())?;
    let summary = DeckSummary::new(deck_path.display().to_string(), &cards);

    print!("{}", format_deck_summary(&summary, format));
    if summary.is_browsable() {
        Ok(())
    } else {
        Err(format!("{} cannot be browsed", deck_path.display()))
    }
}

// ============================================================================
// PATH RESOLUTION
// ============================================================================

fn resolve_journal(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(default_journal_path)
}
