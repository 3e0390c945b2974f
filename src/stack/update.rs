//! Pure state transitions: (StackState, Input, now) → Transition.
//!
//! This is the core logic of the card stack. Fully testable without a
//! renderer or a clock. Each phase defines which inputs it accepts;
//! unhandled inputs return the state unchanged.

use std::time::Duration;

use crate::config::StackConfig;
use crate::motion;
use crate::types::{Card, Decision, Direction};

use super::state::{FlipState, Input, MotionId, Offset, Phase, StackState, Transition};

/// Pure state transition function.
///
/// `deck` is the full deck the state was built for; the card being
/// committed is cloned out of it at release.
pub fn update(
    state: StackState,
    input: &Input,
    deck: &[Card],
    config: &StackConfig,
    now: Duration,
) -> Transition {
    let mut state = state;
    state.flip = state.flip.settled(now, config.flip_duration());

    match state.phase.clone() {
        Phase::Exhausted => Transition::to(state),
        Phase::Idle => update_idle(state, input, config, now),
        Phase::Dragging { offset } => update_dragging(state, offset, input, deck, config, now),
        Phase::Settling { started, motion, .. } => {
            update_settling(state, started, motion, input, config, now)
        }
        Phase::Committing {
            direction,
            index,
            card,
            started,
            motion,
            ..
        } => update_committing(state, direction, index, card, started, motion, input, config, now),
    }
}

// ============================================================================
// PER-PHASE HANDLERS
// ============================================================================

/// Idle: a gesture can begin, the card can flip.
fn update_idle(mut state: StackState, input: &Input, config: &StackConfig, now: Duration) -> Transition {
    match input {
        Input::GestureStart => {
            state.phase = Phase::Dragging { offset: Offset::ZERO };
            Transition::to(state)
        }
        Input::Tap => flip(state, config, now),
        _ => Transition::to(state),
    }
}

/// Dragging: the offset tracks the pointer; release decides.
fn update_dragging(
    mut state: StackState,
    offset: Offset,
    input: &Input,
    deck: &[Card],
    config: &StackConfig,
    now: Duration,
) -> Transition {
    match input {
        Input::GestureMove { dx, dy } => {
            state.phase = Phase::Dragging {
                offset: Offset::new(*dx, *dy),
            };
            Transition::to(state)
        }
        Input::GestureRelease => release(state, offset, deck, config, now),
        Input::Tap => flip(state, config, now),
        // A second start while the pointer is down, stray completions,
        // and ticks change nothing.
        _ => Transition::to(state),
    }
}

/// Settling: a new drag takes over; its own translation owns the card.
fn update_settling(
    mut state: StackState,
    started: Duration,
    motion: MotionId,
    input: &Input,
    config: &StackConfig,
    now: Duration,
) -> Transition {
    match input {
        Input::GestureStart => {
            state.phase = Phase::Dragging { offset: Offset::ZERO };
            Transition::to(state)
        }
        Input::Tick if motion::is_finished(started, now, config.settle_duration()) => {
            state.phase = Phase::Idle;
            Transition::to(state)
        }
        Input::MotionComplete(id) if *id == motion => {
            state.phase = Phase::Idle;
            Transition::to(state)
        }
        Input::Tap => flip(state, config, now),
        _ => Transition::to(state),
    }
}

/// Committing: runs to completion; every gesture is ignored.
#[allow(clippy::too_many_arguments)]
fn update_committing(
    state: StackState,
    direction: Direction,
    index: usize,
    card: Card,
    started: Duration,
    motion: MotionId,
    input: &Input,
    config: &StackConfig,
    now: Duration,
) -> Transition {
    let finished = match input {
        Input::Tick => motion::is_finished(started, now, config.commit_duration()),
        Input::MotionComplete(id) => *id == motion,
        _ => false,
    };

    if finished {
        advance(state, Decision { index, card, direction }, now)
    } else {
        Transition::to(state)
    }
}

// ============================================================================
// SHARED STEPS
// ============================================================================

/// Release: commit past the threshold (exclusive), otherwise settle.
fn release(
    mut state: StackState,
    offset: Offset,
    deck: &[Card],
    config: &StackConfig,
    now: Duration,
) -> Transition {
    let motion = state.issue_motion();

    if offset.x.abs() > config.threshold() {
        match deck.get(state.current_index) {
            Some(card) => {
                state.phase = Phase::Committing {
                    direction: Direction::from_offset(offset.x),
                    index: state.current_index,
                    card: card.clone(),
                    from: offset,
                    started: now,
                    motion,
                };
            }
            // Deck shorter than the state believes: nothing to commit.
            None => state.phase = Phase::Exhausted,
        }
    } else {
        state.phase = Phase::Settling {
            from: offset,
            started: now,
            motion,
        };
    }

    Transition::to(state)
}

/// Commit finished: move to the next card and report the decision.
fn advance(mut state: StackState, decision: Decision, now: Duration) -> Transition {
    state.current_index = decision.index + 1;
    state.flip = FlipState::default();
    state.promoted_at = Some(now);
    state.phase = if state.current_index >= state.deck_len {
        Phase::Exhausted
    } else {
        Phase::Idle
    };

    Transition {
        state,
        decision: Some(decision),
    }
}

fn flip(mut state: StackState, config: &StackConfig, now: Duration) -> Transition {
    state.flip = state.flip.toggled(now, config.flip_duration());
    Transition::to(state)
}

// ============================================================================
// TESTS
// ============================================================================
