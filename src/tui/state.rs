//! TUI state algebra: pure types, zero effects.
//!
//! The card stack owns gesture semantics. What lives here is the thin
//! layer of terminal-side state needed to turn key presses and mouse
//! events into stack inputs: where the pointer went down, how far the
//! keyboard drag has travelled, which screen is showing.

use crossterm::event::{KeyEvent, MouseEvent};

use crate::stack::{CardStack, DecisionSink, Input, Phase};
use crate::types::Direction;

/// Horizontal pixels per terminal column when mapping mouse drags.
pub const PX_PER_COLUMN: f32 = 8.0;

/// Vertical pixels per terminal row.
pub const PX_PER_ROW: f32 = 16.0;

/// Keyboard drag step, in pixels.
pub const NUDGE_STEP: f32 = 25.0;

/// How far past the threshold a one-key swipe travels.
pub const SWIPE_OVERSHOOT: f32 = 40.0;

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Two producers feed a single mpsc channel:
/// - An input reader thread sends `Key` and `Mouse` variants
/// - A frame clock thread sends `Tick`
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Frame tick: advance animations and redraw.
    Tick,
}

// ============================================================================
// UI STATE
// ============================================================================

/// A mouse press on the card, not yet released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub column: u16,
    pub row: u16,
    /// Set once the pointer has moved; a press that never moves is a tap.
    pub moved: bool,
}

/// The current TUI screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// The card stack.
    #[default]
    Browse,
    /// Key binding reference, drawn over the stack.
    Help,
}

/// Terminal-side state. Everything else belongs to the card stack.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ui {
    pub screen: Screen,
    pub pointer: Option<Pointer>,
    /// Accumulated keyboard drag, if one is in progress.
    pub nudge: Option<f32>,
}

/// Read-only facts about the stack the transition function needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackView {
    /// The stack is tracking a gesture right now.
    pub dragging: bool,
    pub threshold: f32,
}

/// Everything the event loop owns.
pub struct App<S> {
    pub ui: Ui,
    pub stack: CardStack<S>,
    pub should_quit: bool,
}

impl<S: DecisionSink> App<S> {
    pub fn new(stack: CardStack<S>) -> Self {
        App {
            ui: Ui::default(),
            stack,
            should_quit: false,
        }
    }

    pub fn stack_view(&self) -> StackView {
        StackView {
            dragging: matches!(self.stack.phase(), Phase::Dragging { .. }),
            threshold: self.stack.config().threshold(),
        }
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw terminal events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Left button pressed at a cell.
    PointerDown { column: u16, row: u16 },
    /// Left button dragged to a cell.
    PointerDrag { column: u16, row: u16 },
    /// Left button released.
    PointerUp,
    /// Drag the card one step with the keyboard.
    Nudge(Direction),
    /// Let go of a keyboard drag.
    Release,
    /// Full swipe in one key press.
    Swipe(Direction),
    /// Turn the card over.
    Flip,
    ToggleHelp,
    Back,
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure UI transition.
///
/// The effects boundary stores the new UI state and feeds `inputs` to
/// the card stack in order, all stamped with the same time.
#[derive(Debug, PartialEq)]
pub enum Transition {
    Step { ui: Ui, inputs: Vec<Input> },
    Quit,
}

impl Transition {
    pub fn ui(ui: Ui) -> Self {
        Transition::Step { ui, inputs: Vec::new() }
    }
}

// ============================================================================
// TESTS
// ============================================================================
