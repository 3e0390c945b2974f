//! Deck loading and validation.
//!
//! A deck file is either a bare JSON array of cards or an object with a
//! `cards` array. A deck whose identifiers are blank or repeated cannot
//! be browsed safely; it loads as an empty deck so the stack starts
//! exhausted, and `inspect` reports why.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::Card;

/// Errors reading a deck file.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("cannot read deck {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid deck {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a deck was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeckIssue {
    /// Card at `index` has an empty or whitespace-only id.
    BlankId { index: usize },
    /// `id` appears at `first` and again at `index`.
    DuplicateId { id: String, first: usize, index: usize },
}

impl std::fmt::Display for DeckIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckIssue::BlankId { index } => write!(f, "card {} has a blank id", index),
            DeckIssue::DuplicateId { id, first, index } => {
                write!(f, "card {} repeats id {:?} from card {}", index, id, first)
            }
        }
    }
}

/// On-disk deck shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum DeckFile {
    Bare(Vec<Card>),
    Wrapped { cards: Vec<Card> },
}

/// An ordered, immutable set of cards for one browsing session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build a deck, refusing (as empty) any deck with identifier issues.
    pub fn new(cards: Vec<Card>) -> Self {
        let issues = inspect(&cards);
        if let Some(first) = issues.first() {
            warn!(
                cards = cards.len(),
                issues = issues.len(),
                first = %first,
                "malformed deck, starting exhausted"
            );
            return Deck::default();
        }
        debug!(cards = cards.len(), "deck loaded");
        Deck { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Deck::new(cards)
    }
}

/// All identifier problems in `cards`, in deck order.
pub fn inspect(cards: &[Card]) -> Vec<DeckIssue> {
    let mut issues = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (index, card) in cards.iter().enumerate() {
        if card.id.trim().is_empty() {
            issues.push(DeckIssue::BlankId { index });
            continue;
        }
        match seen.get(card.id.as_str()) {
            Some(&first) => issues.push(DeckIssue::DuplicateId {
                id: card.id.clone(),
                first,
                index,
            }),
            None => {
                seen.insert(&card.id, index);
            }
        }
    }
    issues
}

/// Parse cards from JSON text without validating them.
pub fn parse_cards(text: &str, origin: &str) -> Result<Vec<Card>, DeckError> {
    let file: DeckFile = serde_json::from_str(text).map_err(|source| DeckError::Parse {
        path: origin.to_string(),
        source,
    })?;
    Ok(match file {
        DeckFile::Bare(cards) => cards,
        DeckFile::Wrapped { cards } => cards,
    })
}

/// Read cards from a deck file without validating them.
pub fn read_cards(path: &Path) -> Result<Vec<Card>, DeckError> {
    let text = fs::read_to_string(path).map_err(|source| DeckError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_cards(&text, &path.display().to_string())
}

/// Load a deck file. Identifier problems yield an empty deck, not an error.
pub fn load_deck(path: &Path) -> Result<Deck, DeckError> {
    read_cards(path).map(Deck::new)
}

/// Distinct institutions in deck order, for summaries.
pub fn institutions(cards: &[Card]) -> Vec<&str> {
    let mut seen = HashSet::new();
    cards
        .iter()
        .map(|c| c.subtitle.as_str())
        .filter(|s| !s.is_empty() && seen.insert(*s))
        .collect()
}
