//! Pure rendering projection: (StackState, now) → StackFrame.
//!
//! The visible window is derived from the deck length and the current
//! index alone; there are no separately tracked "next" indices. The
//! active card's pose is a function of its phase and the elapsed time of
//! whatever motion owns it.

use std::time::Duration;

use crate::config::StackConfig;
use crate::motion;
use crate::types::{Direction, FaceState, SlotPosition, SlotView, StackFrame, Transform};

use super::state::{Offset, Phase, StackState};

/// Number of cards drawn at once.
pub const VISIBLE_SLOTS: usize = 3;

/// Resting transform per stack depth. The last entry is where a card
/// waits before it becomes visible in the third slot.
const REST: [Transform; VISIBLE_SLOTS + 1] = [
    Transform::IDENTITY,
    Transform {
        translate_x: 0.0,
        translate_y: 10.0,
        rotate_deg: 0.0,
        scale: 0.95,
        opacity: 0.7,
    },
    Transform {
        translate_x: 0.0,
        translate_y: 20.0,
        rotate_deg: 0.0,
        scale: 0.9,
        opacity: 0.5,
    },
    Transform {
        translate_x: 0.0,
        translate_y: 30.0,
        rotate_deg: 0.0,
        scale: 0.85,
        opacity: 0.0,
    },
];

/// Off-screen distance of a committed card, as a multiple of screen width.
const EXIT_DISTANCE: f32 = 1.5;

/// Fraction of the release y offset a committed card keeps as it leaves.
const EXIT_DRIFT_Y: f32 = 0.5;

// ============================================================================
// VISIBLE WINDOW
// ============================================================================

/// Deck indices shown in each slot (current, next, third).
pub fn render_slots(deck_len: usize, current_index: usize) -> [Option<usize>; VISIBLE_SLOTS] {
    let mut slots = [None; VISIBLE_SLOTS];
    for (depth, slot) in slots.iter_mut().enumerate() {
        let index = current_index + depth;
        if index < deck_len {
            *slot = Some(index);
        }
    }
    slots
}

/// Resting transform for a stack depth, mid-promotion if the index
/// advanced less than `promote_duration` ago.
pub fn resting_transform(depth: usize, promoted_at: Option<Duration>, now: Duration, config: &StackConfig) -> Transform {
    let target = REST[depth.min(VISIBLE_SLOTS)];
    let Some(promoted_at) = promoted_at else {
        return target;
    };
    let t = motion::ease_out_cubic(motion::progress(promoted_at, now, config.promote_duration()));
    let from = REST[(depth + 1).min(VISIBLE_SLOTS)];
    lerp_transform(&from, &target, t)
}

fn lerp_transform(from: &Transform, to: &Transform, t: f32) -> Transform {
    Transform {
        translate_x: motion::lerp(from.translate_x, to.translate_x, t),
        translate_y: motion::lerp(from.translate_y, to.translate_y, t),
        rotate_deg: motion::lerp(from.rotate_deg, to.rotate_deg, t),
        scale: motion::lerp(from.scale, to.scale, t),
        opacity: motion::lerp(from.opacity, to.opacity, t),
    }
}

// ============================================================================
// ACTIVE CARD POSE
// ============================================================================

/// Live pose of the active card, before stacking is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub offset: Offset,
    pub rotate_deg: f32,
    pub opacity: f32,
}

impl Pose {
    pub const REST: Pose = Pose {
        offset: Offset::ZERO,
        rotate_deg: 0.0,
        opacity: 1.0,
    };
}

/// Rotation for a horizontal offset: linear over ±screen width, clamped.
pub fn rotation_for(dx: f32, config: &StackConfig) -> f32 {
    motion::interpolate_clamped(
        dx,
        (-config.screen_width, config.screen_width),
        (-config.max_rotation_deg, config.max_rotation_deg),
    )
}

/// Decision overlay intensities `(left, right)` for a horizontal offset.
///
/// Each ramps from 0 at the activation distance to 1 at the commit
/// threshold. At most one is non-zero.
pub fn overlays_for(dx: f32, config: &StackConfig) -> (f32, f32) {
    let activation = config.overlay_activation;
    let ramp = config.threshold() - activation;
    let intensity = |distance: f32| {
        if ramp <= 0.0 {
            1.0
        } else {
            ((distance - activation) / ramp).clamp(0.0, 1.0)
        }
    };

    if dx > activation {
        (0.0, intensity(dx))
    } else if dx < -activation {
        (intensity(-dx), 0.0)
    } else {
        (0.0, 0.0)
    }
}

/// Offset of a settling card at `now`.
pub fn settle_offset(from: Offset, started: Duration, now: Duration, config: &StackConfig) -> Offset {
    let remaining = 1.0 - motion::spring(motion::progress(started, now, config.settle_duration()));
    Offset::new(from.x * remaining, from.y * remaining)
}

/// Pose of a committing card at `now`.
fn commit_pose(direction: Direction, from: Offset, started: Duration, now: Duration, config: &StackConfig) -> Pose {
    let t = motion::ease_out_cubic(motion::progress(started, now, config.commit_duration()));
    let exit_x = direction.sign() * EXIT_DISTANCE * config.screen_width;
    let exit_rotation = direction.sign() * config.exit_rotation_deg;
    Pose {
        offset: Offset::new(
            motion::lerp(from.x, exit_x, t),
            motion::lerp(from.y, from.y * EXIT_DRIFT_Y, t),
        ),
        rotate_deg: motion::lerp(rotation_for(from.x, config), exit_rotation, t),
        opacity: 1.0 - motion::progress(started, now, config.fade_duration()),
    }
}

/// Pose of the active card at `now`.
pub fn active_pose(phase: &Phase, now: Duration, config: &StackConfig) -> Pose {
    let tracking = |offset: Offset| Pose {
        offset,
        rotate_deg: rotation_for(offset.x, config),
        opacity: 1.0,
    };

    match phase {
        Phase::Idle | Phase::Exhausted => Pose::REST,
        Phase::Dragging { offset, .. } => tracking(*offset),
        Phase::Settling { from, started, .. } => tracking(settle_offset(*from, *started, now, config)),
        Phase::Committing {
            direction,
            from,
            started,
            ..
        } => commit_pose(*direction, *from, *started, now, config),
    }
}

// ============================================================================
// FRAME
// ============================================================================

/// Project the full stack for one frame.
pub fn frame(state: &StackState, now: Duration, config: &StackConfig) -> StackFrame {
    let positions = [SlotPosition::Current, SlotPosition::Next, SlotPosition::Third];
    let window = render_slots(state.deck_len, state.current_index);

    if state.is_exhausted() || window[0].is_none() {
        return StackFrame::default();
    }

    // While committing, the leaving card still occupies the top slot.
    let pose = active_pose(&state.phase, now, config);
    let mut slots = Vec::with_capacity(VISIBLE_SLOTS);

    for (position, index) in positions.iter().zip(window) {
        let Some(card_index) = index else { break };
        let depth = position.depth();
        let rest = resting_transform(depth, state.promoted_at, now, config);
        let transform = if depth == 0 {
            Transform {
                translate_x: pose.offset.x,
                translate_y: rest.translate_y + pose.offset.y,
                rotate_deg: pose.rotate_deg,
                scale: rest.scale,
                opacity: rest.opacity * pose.opacity,
            }
        } else {
            rest
        };
        slots.push(SlotView {
            position: *position,
            card_index,
            transform,
        });
    }

    let (left_overlay, right_overlay) = overlays_for(pose.offset.x, config);
    StackFrame {
        slots,
        face: Some(FaceState {
            flip_progress: state.flip.progress_at(now, config.flip_duration()),
            left_overlay,
            right_overlay,
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::state::MotionId;
    use crate::types::Card;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn config() -> StackConfig {
        StackConfig::default()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    // -- Window --

    #[test]
    fn window_shows_up_to_three_cards() {
        assert_eq!(render_slots(5, 0), [Some(0), Some(1), Some(2)]);
        assert_eq!(render_slots(5, 3), [Some(3), Some(4), None]);
        assert_eq!(render_slots(5, 4), [Some(4), None, None]);
        assert_eq!(render_slots(5, 5), [None, None, None]);
        assert_eq!(render_slots(0, 0), [None, None, None]);
    }

    // -- Rotation and overlays --

    #[test]
    fn rotation_is_linear_and_clamped() {
        let config = config();
        assert_eq!(rotation_for(0.0, &config), 0.0);
        assert!(close(rotation_for(config.screen_width / 2.0, &config), 7.5));
        assert_eq!(rotation_for(10_000.0, &config), 15.0);
        assert_eq!(rotation_for(-10_000.0, &config), -15.0);
    }

    #[test]
    fn overlays_are_mutually_exclusive() {
        let config = config();
        for dx in [-300.0, -100.0, -60.0, -20.0, 0.0, 20.0, 60.0, 100.0, 300.0] {
            let (left, right) = overlays_for(dx, &config);
            assert!(left == 0.0 || right == 0.0, "dx={} left={} right={}", dx, left, right);
        }
    }

    #[test]
    fn overlays_ramp_from_activation_to_threshold() {
        let config = config();
        assert_eq!(overlays_for(20.0, &config), (0.0, 0.0));
        assert_eq!(overlays_for(60.0, &config), (0.0, 0.5));
        assert_eq!(overlays_for(-60.0, &config), (0.5, 0.0));
        assert_eq!(overlays_for(100.0, &config), (0.0, 1.0));
        assert_eq!(overlays_for(-400.0, &config), (1.0, 0.0));
    }

    // -- Poses --

    #[test]
    fn settle_returns_to_rest() {
        let config = config();
        let from = Offset::new(-40.0, 12.0);
        assert_eq!(settle_offset(from, ms(0), ms(0), &config), from);
        let end = settle_offset(from, ms(0), config.settle_duration(), &config);
        assert!(close(end.x, 0.0) && close(end.y, 0.0), "{:?}", end);
    }

    #[test]
    fn commit_pose_leaves_screen_in_release_direction() {
        let config = config();
        let phase = Phase::Committing {
            direction: Direction::Accept,
            index: 0,
            card: Card::new("a", "A"),
            from: Offset::new(150.0, 20.0),
            started: ms(0),
            motion: MotionId(0),
        };
        let start = active_pose(&phase, ms(0), &config);
        assert_eq!(start.offset, Offset::new(150.0, 20.0));
        assert_eq!(start.opacity, 1.0);

        let end = active_pose(&phase, config.commit_duration(), &config);
        assert!(close(end.offset.x, 1.5 * config.screen_width));
        assert!(close(end.offset.y, 10.0));
        assert!(close(end.rotate_deg, 20.0));
        assert_eq!(end.opacity, 0.0);
    }

    #[test]
    fn discard_pose_rotates_left() {
        let config = config();
        let phase = Phase::Committing {
            direction: Direction::Discard,
            index: 0,
            card: Card::new("a", "A"),
            from: Offset::new(-150.0, 0.0),
            started: ms(0),
            motion: MotionId(0),
        };
        let end = active_pose(&phase, ms(1000), &config);
        assert!(end.offset.x < -config.screen_width);
        assert!(close(end.rotate_deg, -20.0));
    }

    // -- Frame --

    #[test]
    fn exhausted_frame_is_empty() {
        let frame = frame(&StackState::new(0), ms(0), &config());
        assert!(frame.slots.is_empty());
        assert!(frame.face.is_none());
    }

    #[test]
    fn resting_frame_stacks_three_cards() {
        let frame = frame(&StackState::new(4), ms(0), &config());
        assert_eq!(frame.slots.len(), 3);
        assert_eq!(frame.slots[0].transform, Transform::IDENTITY);
        assert_eq!(frame.slots[1].transform.scale, 0.95);
        assert_eq!(frame.slots[1].transform.translate_y, 10.0);
        assert_eq!(frame.slots[1].transform.opacity, 0.7);
        assert_eq!(frame.slots[2].transform.scale, 0.9);
        assert_eq!(frame.slots[2].transform.opacity, 0.5);
        assert_eq!(frame.slots[2].card_index, 2);
        assert_eq!(frame.face, Some(FaceState::default()));
    }

    #[test]
    fn drag_frame_moves_only_top_card() {
        let mut state = StackState::new(3);
        state.phase = Phase::Dragging {
            offset: Offset::new(60.0, -5.0),
        };
        let config = config();
        let frame = frame(&state, ms(0), &config);
        let top = frame.slots[0].transform;
        assert_eq!(top.translate_x, 60.0);
        assert_eq!(top.translate_y, -5.0);
        assert_eq!(top.rotate_deg, rotation_for(60.0, &config));
        assert_eq!(frame.slots[1].transform.translate_x, 0.0);
        let face = frame.face.unwrap();
        assert_eq!(face.right_overlay, 0.5);
        assert_eq!(face.left_overlay, 0.0);
    }

    #[test]
    fn promotion_is_continuous() {
        let config = config();
        let mut state = StackState::new(4);
        state.current_index = 1;
        state.promoted_at = Some(ms(1000));

        // At the instant of promotion the new top card sits where the
        // "next" slot was, and the new third card is still invisible.
        let at_start = frame(&state, ms(1000), &config);
        assert_eq!(at_start.slots[0].card_index, 1);
        assert!(close(at_start.slots[0].transform.scale, 0.95));
        assert!(close(at_start.slots[0].transform.translate_y, 10.0));
        assert!(close(at_start.slots[0].transform.opacity, 0.7));
        assert!(close(at_start.slots[2].transform.opacity, 0.0));

        let settled = frame(&state, ms(1000) + config.promote_duration(), &config);
        assert_eq!(settled.slots[0].transform, Transform::IDENTITY);
        assert!(close(settled.slots[1].transform.scale, 0.95));
        assert!(close(settled.slots[2].transform.opacity, 0.5));
    }
}
