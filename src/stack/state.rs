//! Card stack state algebra: pure types, zero effects.
//!
//! `Phase` is the gesture state machine for the active card. Everything
//! else the stack needs (deck position, flip, promotion timing) sits next
//! to it in `StackState`. Poses and transforms are never stored; they are
//! derived from these values and the current time in `slots`.

use std::time::Duration;

use crate::motion;
use crate::types::{Card, Decision, Direction};

// ============================================================================
// INPUTS
// ============================================================================

/// Identifies one settle or commit motion.
///
/// A new id is issued every time a motion starts, so a completion report
/// for a motion that has since been superseded can be recognised and
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MotionId(pub u64);

/// Everything the stack reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// Pointer went down on the active card.
    GestureStart,
    /// Pointer moved; (dx, dy) is the translation since `GestureStart`.
    GestureMove { dx: f32, dy: f32 },
    /// Pointer went up.
    GestureRelease,
    /// Tap (press without drag) on the active card: flips it.
    Tap,
    /// Frame tick: completes any motion whose duration has elapsed.
    Tick,
    /// An external animation runtime finished this motion.
    MotionComplete(MotionId),
}

// ============================================================================
// PHASE
// ============================================================================

/// Horizontal and vertical displacement of the active card.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Offset { x, y }
    }
}

/// Gesture state of the active card.
///
/// `Committing` carries the card it is committing, cloned at release, so
/// the decision reported on completion can never observe a later card.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Card at rest.
    Idle,

    /// Pointer is down. `offset` is the gesture's translation since it
    /// started, also when the drag interrupted a settle.
    Dragging { offset: Offset },

    /// Released below threshold, springing back to rest.
    Settling {
        from: Offset,
        started: Duration,
        motion: MotionId,
    },

    /// Released past threshold, flying off-screen.
    Committing {
        direction: Direction,
        index: usize,
        card: Card,
        from: Offset,
        started: Duration,
        motion: MotionId,
    },

    /// No cards left.
    Exhausted,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Dragging { .. } => "dragging",
            Phase::Settling { .. } => "settling",
            Phase::Committing { .. } => "committing",
            Phase::Exhausted => "exhausted",
        }
    }

    /// The motion currently owning the card transform, if any.
    pub fn motion(&self) -> Option<MotionId> {
        match self {
            Phase::Settling { motion, .. } | Phase::Committing { motion, .. } => Some(*motion),
            _ => None,
        }
    }
}

// ============================================================================
// FLIP
// ============================================================================

/// Front/back rotation of the active card, independent of dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipState {
    /// Progress when the current flip motion began.
    pub from: f32,
    /// 0 (front) or 180 (back).
    pub to: f32,
    /// None when at rest on `to`.
    pub started: Option<Duration>,
}

pub const FLIP_FRONT: f32 = 0.0;
pub const FLIP_BACK: f32 = 180.0;

impl Default for FlipState {
    fn default() -> Self {
        FlipState {
            from: FLIP_FRONT,
            to: FLIP_FRONT,
            started: None,
        }
    }
}

impl FlipState {
    /// Flip progress in degrees at `now`.
    pub fn progress_at(&self, now: Duration, duration: Duration) -> f32 {
        match self.started {
            None => self.to,
            Some(started) => {
                let t = motion::ease_out_cubic(motion::progress(started, now, duration));
                motion::lerp(self.from, self.to, t)
            }
        }
    }

    /// Head for the other face, starting from wherever the card is now.
    pub fn toggled(&self, now: Duration, duration: Duration) -> FlipState {
        let to = if self.to == FLIP_FRONT { FLIP_BACK } else { FLIP_FRONT };
        FlipState {
            from: self.progress_at(now, duration),
            to,
            started: Some(now),
        }
    }

    /// Drop the running motion once it has played out.
    pub fn settled(self, now: Duration, duration: Duration) -> FlipState {
        match self.started {
            Some(started) if motion::is_finished(started, now, duration) => FlipState {
                from: self.to,
                to: self.to,
                started: None,
            },
            _ => self,
        }
    }

    pub fn showing_back(&self) -> bool {
        self.to == FLIP_BACK
    }
}

// ============================================================================
// STACK STATE
// ============================================================================

/// Complete controller state for one deck.
#[derive(Debug, Clone, PartialEq)]
pub struct StackState {
    pub phase: Phase,
    /// Index of the active card. Never decreases.
    pub current_index: usize,
    pub deck_len: usize,
    pub flip: FlipState,
    /// When `current_index` last advanced; drives the resting-slot
    /// promotion animation.
    pub promoted_at: Option<Duration>,
    pub(crate) next_motion: u64,
}

impl StackState {
    /// Fresh state for a deck of `deck_len` cards.
    pub fn new(deck_len: usize) -> Self {
        StackState {
            phase: if deck_len == 0 { Phase::Exhausted } else { Phase::Idle },
            current_index: 0,
            deck_len,
            flip: FlipState::default(),
            promoted_at: None,
            next_motion: 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase == Phase::Exhausted
    }

    /// Issue a fresh motion id.
    pub(crate) fn issue_motion(&mut self) -> MotionId {
        let id = MotionId(self.next_motion);
        self.next_motion += 1;
        id
    }
}

/// Placeholder used while a transition owns the real state.
impl Default for StackState {
    fn default() -> Self {
        StackState::new(0)
    }
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
///
/// `decision` is set exactly when a commit motion completed during this
/// step; the effects boundary forwards it to the decision sink.
#[derive(Debug, PartialEq)]
pub struct Transition {
    pub state: StackState,
    pub decision: Option<Decision>,
}

impl Transition {
    pub fn to(state: StackState) -> Self {
        Transition { state, decision: None }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn empty_deck_starts_exhausted() {
        let state = StackState::new(0);
        assert_eq!(state.phase, Phase::Exhausted);
        assert!(state.is_exhausted());
    }

    #[test]
    fn non_empty_deck_starts_idle() {
        let state = StackState::new(3);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.current_index, 0);
        assert_eq!(state.promoted_at, None);
    }

    #[test]
    fn motion_ids_are_unique() {
        let mut state = StackState::new(1);
        let a = state.issue_motion();
        let b = state.issue_motion();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn phase_motion_only_for_animating_phases() {
        assert_eq!(Phase::Idle.motion(), None);
        let settling = Phase::Settling {
            from: Offset::new(40.0, 0.0),
            started: ms(0),
            motion: MotionId(7),
        };
        assert_eq!(settling.motion(), Some(MotionId(7)));
        assert_eq!(settling.name(), "settling");
    }

    // -- Flip --

    #[test]
    fn flip_at_rest_reports_target() {
        let flip = FlipState::default();
        assert_eq!(flip.progress_at(ms(1000), ms(500)), FLIP_FRONT);
        assert!(!flip.showing_back());
    }

    #[test]
    fn flip_toggle_runs_to_back() {
        let flip = FlipState::default().toggled(ms(0), ms(500));
        assert!(flip.showing_back());
        assert_eq!(flip.progress_at(ms(0), ms(500)), FLIP_FRONT);
        assert_eq!(flip.progress_at(ms(500), ms(500)), FLIP_BACK);
        let mid = flip.progress_at(ms(250), ms(500));
        assert!(mid > FLIP_FRONT && mid < FLIP_BACK);
    }

    #[test]
    fn flip_toggle_mid_motion_reverses_from_current_progress() {
        let flip = FlipState::default().toggled(ms(0), ms(500));
        let mid = flip.progress_at(ms(250), ms(500));
        let back = flip.toggled(ms(250), ms(500));
        assert_eq!(back.to, FLIP_FRONT);
        assert_eq!(back.progress_at(ms(250), ms(500)), mid);
        assert_eq!(back.progress_at(ms(750), ms(500)), FLIP_FRONT);
    }

    #[test]
    fn flip_settles_after_duration() {
        let flip = FlipState::default().toggled(ms(0), ms(500));
        assert!(flip.settled(ms(100), ms(500)).started.is_some());
        let done = flip.settled(ms(500), ms(500));
        assert_eq!(done.started, None);
        assert_eq!(done.progress_at(ms(600), ms(500)), FLIP_BACK);
    }
}
