//! Domain types for grant-swipe.
//!
//! Cards, decisions, and the transform descriptors the card stack hands
//! to a presentation layer. Plain data; behaviour lives in `stack`.

use serde::{Deserialize, Serialize};

// ============================================================================
// CARDS
// ============================================================================

/// One grant in the deck.
///
/// Field names follow the card's visual layout. The camelCase aliases
/// accept grant listings exported by the importer scripts as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Stable unique identifier.
    pub id: String,
    /// Headline, e.g. the eligibility question.
    #[serde(alias = "question")]
    pub title: String,
    /// Issuing institution.
    #[serde(default, alias = "university")]
    pub subtitle: String,
    /// Award amount or range, already formatted.
    #[serde(default, alias = "priceRange")]
    pub value: String,
    /// Human-readable deadline.
    #[serde(default, alias = "validUntil")]
    pub expiry: String,
    #[serde(default, alias = "backgroundImage", skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Listing page, shown on the back of the card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Card {
    /// Minimal card, mostly useful for tests and demos.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Card {
            id: id.into(),
            title: title.into(),
            subtitle: String::new(),
            value: String::new(),
            expiry: String::new(),
            background_image: None,
            url: None,
        }
    }
}

// ============================================================================
// DECISIONS
// ============================================================================

/// Which way a committed card left the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Swiped right: the grant is saved as an application.
    Accept,
    /// Swiped left: the grant is dismissed.
    Discard,
}

impl Direction {
    /// Direction implied by a horizontal offset. Zero counts as discard,
    /// but a zero offset never crosses the (positive) commit threshold.
    pub fn from_offset(dx: f32) -> Self {
        if dx > 0.0 {
            Direction::Accept
        } else {
            Direction::Discard
        }
    }

    /// +1.0 for right, -1.0 for left.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Accept => 1.0,
            Direction::Discard => -1.0,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Accept => write!(f, "accept"),
            Direction::Discard => write!(f, "discard"),
        }
    }
}

/// A committed decision, as handed to the effects boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Deck position of the card at the moment it was released.
    pub index: usize,
    /// The card as captured at release.
    pub card: Card,
    pub direction: Direction,
}

// ============================================================================
// TRANSFORMS
// ============================================================================

/// Visual transform for one stacked card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotate_deg: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Transform {
    /// Card at rest on top of the stack.
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        rotate_deg: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

/// Extra state rendered only on the active card.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceState {
    /// 0 = front, 180 = back.
    pub flip_progress: f32,
    /// Discard tint, 0..=1.
    pub left_overlay: f32,
    /// Accept tint, 0..=1.
    pub right_overlay: f32,
}

/// Stack position of a visible card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPosition {
    Current,
    Next,
    Third,
}

impl SlotPosition {
    /// Depth in the stack, 0 = top.
    pub fn depth(self) -> usize {
        match self {
            SlotPosition::Current => 0,
            SlotPosition::Next => 1,
            SlotPosition::Third => 2,
        }
    }
}

/// One visible card in a rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    pub position: SlotPosition,
    /// Index into the deck.
    pub card_index: usize,
    pub transform: Transform,
}

/// Everything a presentation layer needs to draw the stack for one frame.
///
/// `slots` is ordered top card first. Empty when the deck is exhausted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StackFrame {
    pub slots: Vec<SlotView>,
    /// Present iff there is an active card.
    pub face: Option<FaceState>,
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Output format for command-line reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_accepts_importer_field_names() {
        let json = r#"{
            "id": "1",
            "university": "University of Ottawa",
            "question": "Are you blind?",
            "priceRange": "$40k - $60k",
            "validUntil": "25-15"
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.title, "Are you blind?");
        assert_eq!(card.subtitle, "University of Ottawa");
        assert_eq!(card.value, "$40k - $60k");
        assert_eq!(card.expiry, "25-15");
        assert!(card.background_image.is_none());
    }

    #[test]
    fn card_serializes_with_rust_names() {
        let card = Card::new("a", "Title");
        let json = serde_json::to_string(&card).unwrap();
        assert!(json.contains("\"title\":\"Title\""));
        assert!(!json.contains("background_image"));
    }

    #[test]
    fn direction_follows_offset_sign() {
        assert_eq!(Direction::from_offset(150.0), Direction::Accept);
        assert_eq!(Direction::from_offset(-150.0), Direction::Discard);
        assert_eq!(Direction::Accept.sign(), 1.0);
        assert_eq!(Direction::Discard.sign(), -1.0);
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Accept).unwrap(), "\"accept\"");
        assert_eq!(Direction::Discard.to_string(), "discard");
    }

    #[test]
    fn slot_depths_are_ordered() {
        assert_eq!(SlotPosition::Current.depth(), 0);
        assert_eq!(SlotPosition::Next.depth(), 1);
        assert_eq!(SlotPosition::Third.depth(), 2);
    }
}
