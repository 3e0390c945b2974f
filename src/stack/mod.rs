//! Swipe-gesture card stack.
//!
//! Organized along the same pure/effectful boundary as the TUI:
//! - `state`: Phase machine and inputs (pure data)
//! - `update`: (state, input, now) → transition (pure)
//! - `slots`: (state, now) → frame of transforms (pure)
//! - `sink`: where decisions go
//!
//! [`CardStack`] is the effects boundary: it owns the deck, the state and
//! the sink, and is the only place a decision leaves the stack.

pub mod sink;
pub mod slots;
pub mod state;
pub mod update;

use std::time::Duration;

use tracing::{debug, info};

use crate::config::StackConfig;
use crate::deck::Deck;
use crate::types::{Card, Decision, Direction, StackFrame};

pub use sink::{Callbacks, DecisionSink};
pub use state::{Input, MotionId, Phase, StackState};

/// A deck of cards being swiped through.
///
/// All time-dependent methods take `now`, the time elapsed since any fixed
/// epoch the caller chooses. The stack never reads a clock.
pub struct CardStack<S> {
    deck: Deck,
    config: StackConfig,
    state: StackState,
    sink: S,
}

impl<S: DecisionSink> CardStack<S> {
    /// Start a session at the first card. An empty deck starts exhausted.
    pub fn new(deck: Deck, config: StackConfig, sink: S) -> Self {
        let state = StackState::new(deck.len());
        debug!(cards = deck.len(), phase = state.phase.name(), "card stack ready");
        CardStack {
            deck,
            config,
            state,
            sink,
        }
    }

    // ------------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------------

    pub fn gesture_start(&mut self, now: Duration) {
        self.dispatch(Input::GestureStart, now);
    }

    /// `dx`/`dy` are the translation since the gesture started.
    pub fn gesture_move(&mut self, dx: f32, dy: f32, now: Duration) {
        self.dispatch(Input::GestureMove { dx, dy }, now);
    }

    pub fn gesture_release(&mut self, now: Duration) {
        self.dispatch(Input::GestureRelease, now);
    }

    /// Flip the active card.
    pub fn tap(&mut self, now: Duration) {
        self.dispatch(Input::Tap, now);
    }

    /// Complete any motion whose duration has elapsed by `now`.
    pub fn tick(&mut self, now: Duration) {
        self.dispatch(Input::Tick, now);
    }

    /// Report that an externally driven animation finished. Ids that no
    /// longer own the card are ignored.
    pub fn complete_motion(&mut self, motion: MotionId, now: Duration) {
        self.dispatch(Input::MotionComplete(motion), now);
    }

    /// Feed one input through the pure transition and execute its effect.
    ///
    /// State is replaced before the sink runs, so the stack has already
    /// advanced even if the sink panics.
    pub fn dispatch(&mut self, input: Input, now: Duration) {
        let previous = self.state.phase.name();
        let state = std::mem::take(&mut self.state);
        let transition = update::update(state, &input, self.deck.cards(), &self.config, now);
        self.state = transition.state;

        let current = self.state.phase.name();
        if previous != current {
            debug!(from = previous, to = current, index = self.state.current_index, "phase change");
        }

        if let Some(decision) = transition.decision {
            self.report(decision);
        }
    }

    fn report(&mut self, decision: Decision) {
        info!(
            index = decision.index,
            card = %decision.card.id,
            direction = %decision.direction,
            "card committed"
        );
        match decision.direction {
            Direction::Accept => self.sink.on_accept(&decision.card),
            Direction::Discard => self.sink.on_discard(&decision.card),
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Transforms for every visible card at `now`.
    pub fn frame(&self, now: Duration) -> StackFrame {
        slots::frame(&self.state, now, &self.config)
    }

    pub fn phase(&self) -> &Phase {
        &self.state.phase
    }

    pub fn state(&self) -> &StackState {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    /// The card receiving gestures, if any.
    pub fn current_card(&self) -> Option<&Card> {
        if self.state.is_exhausted() {
            return None;
        }
        self.deck.get(self.state.current_index)
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    /// The motion currently owning the card transform, if any.
    pub fn active_motion(&self) -> Option<MotionId> {
        self.state.phase.motion()
    }

    /// Cards not yet decided, including the active one.
    pub fn remaining(&self) -> usize {
        self.deck.len().saturating_sub(self.state.current_index)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

// ============================================================================
// TESTS
// ============================================================================
