//! Pure rendering: map App state to ratatui widget trees.
//!
//! The card stack already computes every transform; this module only
//! maps them onto terminal cells. Pixels become cells through the same
//! constants the key map uses, scale shrinks the card box, opacity picks
//! a style, and the flip narrows the card toward its edge before showing
//! the other face. Rotation cannot be drawn in a grid, so it is reported
//! in the status line.

use std::time::Duration;

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::stack::{DecisionSink, Phase};
use crate::types::{Card, Direction, FaceState, SlotPosition, SlotView, Transform};

use super::state::{App, Screen, PX_PER_COLUMN, PX_PER_ROW};
use super::theme;

/// Card box at scale 1, in cells.
const CARD_WIDTH: u16 = 46;
const CARD_HEIGHT: u16 = 16;

/// Narrowest a card gets mid-flip, as a fraction of its width.
const MIN_FLIP_WIDTH: f32 = 0.08;

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the whole screen at `now`.
pub fn render<S: DecisionSink>(app: &App<S>, now: Duration, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // title
        Constraint::Min(0),    // stack
        Constraint::Length(1), // status
        Constraint::Length(1), // help
    ])
    .split(area);

    frame.render_widget(render_title(app), chunks[0]);
    frame.render_widget(render_status(app, now), chunks[2]);
    frame.render_widget(render_help(app.ui.screen), chunks[3]);

    if app.stack.is_exhausted() {
        render_exhausted(app, frame, chunks[1]);
    } else {
        render_stack(app, now, frame, chunks[1]);
    }

    if app.ui.screen == Screen::Help {
        render_help_overlay(frame, chunks[1]);
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

fn render_title<S: DecisionSink>(app: &App<S>) -> Paragraph<'static> {
    let total = app.stack.deck().len();
    let position = if app.stack.is_exhausted() {
        format!("  {} of {} reviewed", app.stack.current_index(), total)
    } else {
        format!("  card {} of {}", app.stack.current_index() + 1, total)
    };

    Paragraph::new(Line::from(vec![
        Span::styled("grant-swipe", theme::STYLE_TITLE),
        Span::styled(position, theme::STYLE_DIM),
    ]))
}

/// Phase, offset and rotation of the active card.
fn render_status<S: DecisionSink>(app: &App<S>, now: Duration) -> Paragraph<'static> {
    let frame = app.stack.frame(now);
    let Some(top) = frame.slots.first() else {
        return Paragraph::new(Line::from(Span::styled(
            app.stack.phase().name(),
            theme::STYLE_DIM,
        )));
    };

    let t = top.transform;
    let mut spans = vec![
        Span::styled(format!("{:<11}", app.stack.phase().name()), theme::STYLE_DIM),
        Span::styled(
            format!(
                "dx {:+6.0}  dy {:+5.0}  ↻ {:+5.1}°",
                t.translate_x, t.translate_y, t.rotate_deg
            ),
            theme::STYLE_DIM,
        ),
    ];
    if let Phase::Committing { direction, .. } = app.stack.phase() {
        let style = match direction {
            Direction::Accept => theme::STYLE_ACCEPT,
            Direction::Discard => theme::STYLE_DISCARD,
        };
        spans.push(Span::styled(format!("  {}", direction), style));
    }
    Paragraph::new(Line::from(spans))
}

fn render_help(screen: Screen) -> Paragraph<'static> {
    let help_text = match screen {
        Screen::Browse => {
            "drag with mouse  [←/→] nudge  [Enter] let go  [a/d] swipe  [Space] flip  [?] help  [q] quit"
        }
        Screen::Help => "[Esc/?] close  [q] quit",
    };
    Paragraph::new(Line::from(Span::styled(help_text, theme::STYLE_HELP)))
}

// ============================================================================
// STACK
// ============================================================================

/// Terminal rectangle for a card with `transform`, centred in `area`.
///
/// `width_factor` narrows the card for the flip. Returns None when the
/// card is entirely outside `area`.
pub fn card_rect(area: Rect, transform: &Transform, width_factor: f32) -> Option<Rect> {
    let base_w = CARD_WIDTH.min(area.width.saturating_sub(4)).max(3) as f32;
    let base_h = CARD_HEIGHT.min(area.height.saturating_sub(2)).max(3) as f32;

    let w = (base_w * transform.scale * width_factor).round().max(1.0) as i32;
    let h = (base_h * transform.scale).round().max(1.0) as i32;

    let cx = area.x as i32 + area.width as i32 / 2 + (transform.translate_x / PX_PER_COLUMN).round() as i32;
    let cy = area.y as i32 + area.height as i32 / 2 + (transform.translate_y / PX_PER_ROW).round() as i32;

    let left = (cx - w / 2).max(area.x as i32);
    let top = (cy - h / 2).max(area.y as i32);
    let right = (cx - w / 2 + w).min(area.right() as i32);
    let bottom = (cy - h / 2 + h).min(area.bottom() as i32);

    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Card width multiplier for a flip progress in degrees.
pub fn flip_width(progress_deg: f32) -> f32 {
    progress_deg.to_radians().cos().abs().max(MIN_FLIP_WIDTH)
}

fn render_stack<S: DecisionSink>(app: &App<S>, now: Duration, frame: &mut Frame, area: Rect) {
    let stack_frame = app.stack.frame(now);
    let face = stack_frame.face.unwrap_or_default();

    // Back to front so the active card lands on top.
    for slot in stack_frame.slots.iter().rev() {
        let Some(card) = app.stack.deck().get(slot.card_index) else {
            continue;
        };
        render_card(card, slot, &face, frame, area);
    }
}

fn render_card(card: &Card, slot: &SlotView, face: &FaceState, frame: &mut Frame, area: Rect) {
    let t = &slot.transform;
    if t.opacity < theme::HIDE_BELOW_OPACITY {
        return;
    }

    let active = slot.position == SlotPosition::Current;
    let width_factor = if active { flip_width(face.flip_progress) } else { 1.0 };
    let Some(rect) = card_rect(area, t, width_factor) else {
        return;
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::card_border(t.opacity, active));

    let mut lines = Vec::new();
    if active {
        if let Some((label, style)) = overlay_label(face) {
            block = block.border_style(style);
            lines.push(Line::from(Span::styled(label, style)).alignment(Alignment::Center));
            lines.push(Line::from(""));
        }
    }

    let dim = !active || t.opacity < theme::DIM_BELOW_OPACITY;
    if active && face.flip_progress >= 90.0 {
        lines.extend(back_lines(card));
    } else {
        lines.extend(front_lines(card, dim));
    }

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        rect,
    );
}

/// Overlay label once a drag is committed enough to show it.
fn overlay_label(face: &FaceState) -> Option<(&'static str, Style)> {
    if face.right_overlay >= theme::OVERLAY_LABEL_AT {
        Some(("✓ ACCEPT", theme::STYLE_ACCEPT))
    } else if face.left_overlay >= theme::OVERLAY_LABEL_AT {
        Some(("✕ DISCARD", theme::STYLE_DISCARD))
    } else {
        None
    }
}

fn front_lines(card: &Card, dim: bool) -> Vec<Line<'static>> {
    let (headline, body) = if dim {
        (theme::STYLE_DIM, theme::STYLE_DIM)
    } else {
        (theme::STYLE_HEADLINE, Style::new())
    };

    let mut lines = vec![
        Line::from(Span::styled(card.subtitle.clone(), theme::STYLE_DIM)),
        Line::from(""),
        Line::from(Span::styled(card.title.clone(), headline)),
        Line::from(""),
    ];
    if !card.value.is_empty() {
        lines.push(Line::from(Span::styled("Grant value:", theme::STYLE_DIM)));
        lines.push(Line::from(Span::styled(card.value.clone(), body)));
    }
    if !card.expiry.is_empty() {
        lines.push(Line::from(""));
        lines.push(
            Line::from(Span::styled(format!("valid until {}", card.expiry), theme::STYLE_DIM))
                .alignment(Alignment::Center),
        );
    }
    lines
}

fn back_lines(card: &Card) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled("Details", theme::STYLE_HEADLINE)),
        Line::from(""),
        Line::from(Span::styled(
            card.url.clone().unwrap_or_else(|| "(no listing link)".to_string()),
            theme::STYLE_INTERACTIVE,
        )),
        Line::from(""),
        Line::from(Span::styled(format!("id {}", card.id), theme::STYLE_DIM)),
        Line::from(Span::styled("[Space] flip back", theme::STYLE_HELP)),
    ]
}

// ============================================================================
// OTHER STATES
// ============================================================================

fn render_exhausted<S: DecisionSink>(app: &App<S>, frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("No more grants available", theme::STYLE_IMPORTANT)),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} reviewed this session", app.stack.current_index()),
            theme::STYLE_DIM,
        )),
        Line::from(Span::styled("[q] quit", theme::STYLE_INTERACTIVE)),
    ];
    let rect = card_rect(area, &Transform::IDENTITY, 1.0).unwrap_or(area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(theme::STYLE_CARD_BEHIND)),
        rect,
    );
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let bindings = [
        ("mouse drag", "move the card; let go past the line to decide"),
        ("click", "flip the card"),
        ("← → / h l", "nudge the card one step"),
        ("Enter", "let go of a nudged card"),
        ("d", "swipe right: save grant"),
        ("a", "swipe left: discard grant"),
        ("Space / f", "flip the card"),
        ("q / Ctrl+C", "quit"),
    ];
    let lines: Vec<Line> = bindings
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{:<12}", key), theme::STYLE_INTERACTIVE),
                Span::raw(*what),
            ])
        })
        .collect();

    let rect = card_rect(area, &Transform::IDENTITY, 1.2).unwrap_or(area);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Keys")
                .border_style(theme::STYLE_INTERACTIVE),
        ),
        rect,
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(0, 1, 100, 30)
    }

    #[test]
    fn identity_card_is_centred() {
        let rect = card_rect(area(), &Transform::IDENTITY, 1.0).unwrap();
        assert_eq!(rect.width, CARD_WIDTH);
        assert_eq!(rect.height, CARD_HEIGHT);
        assert_eq!(rect.x, 50 - CARD_WIDTH / 2);
        assert_eq!(rect.y, 1 + 15 - CARD_HEIGHT / 2);
    }

    #[test]
    fn translation_moves_by_cells() {
        let t = Transform {
            translate_x: 10.0 * PX_PER_COLUMN,
            ..Transform::IDENTITY
        };
        let base = card_rect(area(), &Transform::IDENTITY, 1.0).unwrap();
        let moved = card_rect(area(), &t, 1.0).unwrap();
        assert_eq!(moved.x, base.x + 10);
    }

    #[test]
    fn scaled_card_is_smaller() {
        let t = Transform {
            scale: 0.9,
            ..Transform::IDENTITY
        };
        let rect = card_rect(area(), &t, 1.0).unwrap();
        assert!(rect.width < CARD_WIDTH);
        assert!(rect.height < CARD_HEIGHT);
    }

    #[test]
    fn card_is_clipped_at_edge() {
        let t = Transform {
            translate_x: 45.0 * PX_PER_COLUMN,
            ..Transform::IDENTITY
        };
        let rect = card_rect(area(), &t, 1.0).unwrap();
        assert_eq!(rect.right(), area().right());
        assert!(rect.width < CARD_WIDTH);
    }

    #[test]
    fn card_off_screen_is_not_drawn() {
        let t = Transform {
            translate_x: 1000.0 * PX_PER_COLUMN,
            ..Transform::IDENTITY
        };
        assert!(card_rect(area(), &t, 1.0).is_none());
    }

    #[test]
    fn flip_narrows_card_at_midpoint() {
        assert_eq!(flip_width(0.0), 1.0);
        assert!((flip_width(180.0) - 1.0).abs() < 1e-6);
        assert_eq!(flip_width(90.0), MIN_FLIP_WIDTH);
    }

    #[test]
    fn overlay_label_needs_half_intensity() {
        let weak = FaceState {
            right_overlay: 0.3,
            ..Default::default()
        };
        assert!(overlay_label(&weak).is_none());
        let strong = FaceState {
            left_overlay: 0.8,
            ..Default::default()
        };
        assert_eq!(overlay_label(&strong).map(|(l, _)| l), Some("✕ DISCARD"));
    }

    #[test]
    fn front_lists_value_and_expiry() {
        let card = Card {
            value: "$40k - $60k".into(),
            expiry: "25-15".into(),
            ..Card::new("1", "Are you blind?")
        };
        let text: Vec<String> = front_lines(&card, false).iter().map(|l| l.to_string()).collect();
        assert!(text.contains(&"Are you blind?".to_string()));
        assert!(text.contains(&"$40k - $60k".to_string()));
        assert!(text.contains(&"valid until 25-15".to_string()));
    }
}
