//! TUI color semantics and style constants.
//!
//! Pure data, consumed by the rendering layer for visual consistency.
//!
//! Color semantics:
//! - Green: accept (right swipe, saved)
//! - Red: discard (left swipe)
//! - Magenta: card chrome (the app's purple)
//! - Cyan: interactive elements (keybinding hints)
//! - Dim: de-emphasized (cards further down the stack, metadata)

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// SEMANTIC STYLES
// ============================================================================

/// Accept overlay / saved — green.
pub const STYLE_ACCEPT: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Discard overlay — red.
pub const STYLE_DISCARD: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

/// Interactive element / keybinding hint — cyan.
pub const STYLE_INTERACTIVE: Style = Style::new().fg(Color::Cyan);

/// De-emphasized metadata — dark gray.
pub const STYLE_DIM: Style = Style::new().fg(Color::DarkGray);

/// Important text — bold.
pub const STYLE_IMPORTANT: Style = Style::new().add_modifier(Modifier::BOLD);

// ============================================================================
// UI ELEMENT STYLES
// ============================================================================

/// Title bar / header.
pub const STYLE_TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Border of the active card.
pub const STYLE_CARD: Style = Style::new().fg(Color::Magenta);

/// Border of a card resting behind the active one.
pub const STYLE_CARD_BEHIND: Style = Style::new().fg(Color::DarkGray);

/// Card headline.
pub const STYLE_HEADLINE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);

/// Opacity below which a resting card is drawn dimmed.
pub const DIM_BELOW_OPACITY: f32 = 0.9;

/// Opacity below which a card is not drawn at all.
pub const HIDE_BELOW_OPACITY: f32 = 0.05;

/// Overlay intensity at which the ACCEPT / DISCARD label appears.
pub const OVERLAY_LABEL_AT: f32 = 0.5;

/// Border style for a card at the given opacity.
pub fn card_border(opacity: f32, active: bool) -> Style {
    if active && opacity >= DIM_BELOW_OPACITY {
        STYLE_CARD
    } else {
        STYLE_CARD_BEHIND
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_styles_have_expected_colors() {
        assert_eq!(STYLE_ACCEPT.fg, Some(Color::Green));
        assert_eq!(STYLE_DISCARD.fg, Some(Color::Red));
        assert_eq!(STYLE_INTERACTIVE.fg, Some(Color::Cyan));
        assert_eq!(STYLE_DIM.fg, Some(Color::DarkGray));
    }

    #[test]
    fn important_style_is_bold() {
        assert!(STYLE_IMPORTANT.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn fading_active_card_loses_highlight() {
        assert_eq!(card_border(1.0, true), STYLE_CARD);
        assert_eq!(card_border(0.5, true), STYLE_CARD_BEHIND);
        assert_eq!(card_border(1.0, false), STYLE_CARD_BEHIND);
    }
}
