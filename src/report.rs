//! Report formatting for the `check` and `saved` commands.
//!
//! Pure functions: (data, OutputFormat) → String.
//! No I/O, no side effects.

use serde_json::json;

use crate::deck::{institutions, inspect, DeckIssue};
use crate::journal::JournalEntry;
use crate::types::{Card, OutputFormat};

/// What `check` found in a deck file.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckSummary {
    pub source: String,
    pub cards: usize,
    pub institutions: Vec<String>,
    pub with_image: usize,
    pub with_url: usize,
    pub issues: Vec<DeckIssue>,
}

impl DeckSummary {
    pub fn new(source: impl Into<String>, cards: &[Card]) -> Self {
        DeckSummary {
            source: source.into(),
            cards: cards.len(),
            institutions: institutions(cards).into_iter().map(String::from).collect(),
            with_image: cards.iter().filter(|c| c.background_image.is_some()).count(),
            with_url: cards.iter().filter(|c| c.url.is_some()).count(),
            issues: inspect(cards),
        }
    }

    /// A deck with issues loads as empty.
    pub fn is_browsable(&self) -> bool {
        self.issues.is_empty() && self.cards > 0
    }
}

// ============================================================================
// DECK SUMMARY
// ============================================================================

pub fn format_deck_summary(summary: &DeckSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_deck_human(summary),
        OutputFormat::Json => {
            let value = json!({
                "source": summary.source,
                "cards": summary.cards,
                "institutions": summary.institutions,
                "with_image": summary.with_image,
                "with_url": summary.with_url,
                "issues": summary.issues,
                "browsable": summary.is_browsable(),
            });
            format!("{:#}", value)
        }
    }
}

fn format_deck_human(summary: &DeckSummary) -> String {
    let mut out = String::new();

    if !summary.issues.is_empty() {
        out.push_str("=== Issues (deck will load empty) ===\n");
        for issue in &summary.issues {
            out.push_str(&format!("  {}\n", issue));
        }
        out.push('\n');
    }

    if !summary.institutions.is_empty() {
        out.push_str("=== Institutions ===\n");
        for name in &summary.institutions {
            out.push_str(&format!("  {}\n", name));
        }
        out.push('\n');
    }

    out.push_str("=== Summary ===\n");
    out.push_str(&format!("Deck:          {}\n", summary.source));
    out.push_str(&format!("Cards:         {}\n", summary.cards));
    out.push_str(&format!("With image:    {}\n", summary.with_image));
    out.push_str(&format!("With link:     {}\n", summary.with_url));
    out.push_str(&format!(
        "Browsable:     {}\n",
        if summary.is_browsable() { "yes" } else { "no" }
    ));

    out
}

// ============================================================================
// SAVED GRANTS
// ============================================================================

pub fn format_saved(saved: &[&JournalEntry], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_saved_human(saved),
        OutputFormat::Json => format!("{:#}", json!(saved)),
    }
}

fn format_saved_human(saved: &[&JournalEntry]) -> String {
    if saved.is_empty() {
        return "No saved grants yet.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("=== Saved Grants ===\n");
    for entry in saved {
        out.push_str(&format!("{}\n", entry.title));
        let mut details = Vec::new();
        if !entry.subtitle.is_empty() {
            details.push(entry.subtitle.clone());
        }
        if !entry.value.is_empty() {
            details.push(entry.value.clone());
        }
        if !entry.expiry.is_empty() {
            details.push(format!("valid until {}", entry.expiry));
        }
        if !details.is_empty() {
            out.push_str(&format!("  └─ {}\n", details.join(" · ")));
        }
        if let Some(url) = &entry.url {
            out.push_str(&format!("  └─ {}\n", url));
        }
    }
    out.push('\n');
    out.push_str(&format!("Total saved: {}\n", saved.len()));
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use chrono::{TimeZone, Utc};

    fn grant(id: &str, university: &str) -> Card {
        Card {
            id: id.into(),
            title: format!("Grant {}", id),
            subtitle: university.into(),
            value: "$40k - $60k".into(),
            expiry: "25-15".into(),
            background_image: None,
            url: Some(format!("https://grants.example/{}", id)),
        }
    }

    fn saved_entry(id: &str) -> JournalEntry {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();
        JournalEntry::new(&grant(id, "McGill University"), Direction::Accept, at)
    }

    // --- Deck summary ---

    #[test]
    fn summary_counts_cards_and_institutions() {
        let cards = vec![grant("1", "McGill"), grant("2", "Toronto"), grant("3", "McGill")];
        let summary = DeckSummary::new("deck.json", &cards);
        assert_eq!(summary.cards, 3);
        assert_eq!(summary.institutions, vec!["McGill", "Toronto"]);
        assert_eq!(summary.with_url, 3);
        assert_eq!(summary.with_image, 0);
        assert!(summary.is_browsable());
    }

    #[test]
    fn human_summary_lists_issues() {
        let cards = vec![grant("1", "McGill"), grant("1", "Toronto")];
        let output = format_deck_summary(&DeckSummary::new("deck.json", &cards), OutputFormat::Human);
        assert!(output.contains("=== Issues"));
        assert!(output.contains("repeats id \"1\""));
        assert!(output.contains("Browsable:     no"));
    }

    #[test]
    fn human_summary_for_clean_deck() {
        let cards = vec![grant("1", "McGill")];
        let output = format_deck_summary(&DeckSummary::new("deck.json", &cards), OutputFormat::Human);
        assert!(!output.contains("=== Issues"));
        assert!(output.contains("Cards:         1"));
        assert!(output.contains("Browsable:     yes"));
    }

    #[test]
    fn empty_deck_is_not_browsable() {
        let summary = DeckSummary::new("empty.json", &[]);
        assert!(!summary.is_browsable());
    }

    #[test]
    fn json_summary_has_expected_fields() {
        let cards = vec![grant("1", "McGill"), grant("", "Toronto")];
        let output = format_deck_summary(&DeckSummary::new("deck.json", &cards), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["cards"], 2);
        assert_eq!(parsed["browsable"], false);
        assert_eq!(parsed["issues"][0]["kind"], "blank_id");
        assert_eq!(parsed["issues"][0]["index"], 1);
    }

    // --- Saved grants ---

    #[test]
    fn human_saved_lists_details() {
        let entry = saved_entry("7");
        let output = format_saved(&[&entry], OutputFormat::Human);
        assert!(output.contains("=== Saved Grants ==="));
        assert!(output.contains("Grant 7"));
        assert!(output.contains("McGill University · $40k - $60k · valid until 25-15"));
        assert!(output.contains("https://grants.example/7"));
        assert!(output.contains("Total saved: 1"));
    }

    #[test]
    fn human_saved_empty() {
        assert_eq!(format_saved(&[], OutputFormat::Human), "No saved grants yet.\n");
    }

    #[test]
    fn json_saved_is_array_of_entries() {
        let a = saved_entry("a");
        let b = saved_entry("b");
        let output = format_saved(&[&a, &b], OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["card_id"], "b");
        assert_eq!(parsed[0]["direction"], "accept");
    }
}
