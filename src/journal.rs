//! Decision journal: an append-only JSON-lines record of every swipe.
//!
//! Accepted cards are the user's saved grants (one "application" each);
//! the `saved` command reads them back. The journal is also a
//! [`DecisionSink`], so a card stack can write to it directly.
//!
//! Structure:
//! - Pure functions: path computation, saved-grant selection
//! - Effect functions: append, read

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::stack::DecisionSink;
use crate::types::{Card, Direction};

/// Journal filename within the data directory.
const JOURNAL_FILENAME: &str = "decisions.jsonl";

/// Errors reading or writing the journal.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("journal {path} line {line}: {source}")]
    Parse {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode journal entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One recorded decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub card_id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub direction: Direction,
    pub decided_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(card: &Card, direction: Direction, decided_at: DateTime<Utc>) -> Self {
        JournalEntry {
            card_id: card.id.clone(),
            title: card.title.clone(),
            subtitle: card.subtitle.clone(),
            value: card.value.clone(),
            expiry: card.expiry.clone(),
            url: card.url.clone(),
            direction,
            decided_at,
        }
    }
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Returns the default journal path.
///
/// On macOS: ~/Library/Application Support/grant-swipe/decisions.jsonl
pub fn default_journal_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("grant-swipe")
        .join(JOURNAL_FILENAME)
}

/// Cards whose latest decision is an accept, in order of first decision.
///
/// A card accepted in one session and discarded in a later one is no
/// longer saved.
pub fn saved_grants(entries: &[JournalEntry]) -> Vec<&JournalEntry> {
    let mut latest: HashMap<&str, &JournalEntry> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for entry in entries {
        if latest.insert(&entry.card_id, entry).is_none() {
            order.push(&entry.card_id);
        }
    }

    order
        .into_iter()
        .filter_map(|id| latest.get(id).copied())
        .filter(|entry| entry.direction == Direction::Accept)
        .collect()
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Append one entry, creating the file and its directory if needed.
pub fn append_entry(path: &Path, entry: &JournalEntry) -> Result<(), JournalError> {
    let io_err = |source| JournalError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(line.as_bytes()).map_err(io_err)?;
    Ok(())
}

/// Read every entry. A missing journal is an empty one; blank lines are
/// skipped.
pub fn read_entries(path: &Path) -> Result<Vec<JournalEntry>, JournalError> {
    let io_err = |source| JournalError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err(e)),
    };

    let mut entries = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|source| JournalError::Parse {
            path: path.display().to_string(),
            line: i + 1,
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

// ============================================================================
// SINK
// ============================================================================

/// Decision sink that appends to a journal file.
///
/// Write failures are logged and counted, never raised: the card stack
/// has already moved on by the time a decision is recorded.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    accepted: usize,
    discarded: usize,
    failures: usize,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Journal {
            path: path.into(),
            accepted: 0,
            discarded: 0,
            failures: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decisions recorded this session, (accepted, discarded).
    pub fn counts(&self) -> (usize, usize) {
        (self.accepted, self.discarded)
    }

    /// Writes that failed this session.
    pub fn failures(&self) -> usize {
        self.failures
    }

    fn record(&mut self, card: &Card, direction: Direction) {
        match direction {
            Direction::Accept => self.accepted += 1,
            Direction::Discard => self.discarded += 1,
        }

        let entry = JournalEntry::new(card, direction, Utc::now());
        match append_entry(&self.path, &entry) {
            Ok(()) => debug!(card = %card.id, %direction, "decision journaled"),
            Err(e) => {
                self.failures += 1;
                warn!(card = %card.id, error = %e, "could not journal decision");
            }
        }
    }
}

impl DecisionSink for Journal {
    fn on_accept(&mut self, card: &Card) {
        self.record(card, Direction::Accept);
    }

    fn on_discard(&mut self, card: &Card) {
        self.record(card, Direction::Discard);
    }
}

// ============================================================================
// TESTS
// ============================================================================
