//! Pure UI transitions: (Ui, Action, StackView) → Transition.
//!
//! Translates terminal gestures into card stack inputs. Fully testable
//! without a terminal. Whether a drag is live is asked of the stack, not
//! remembered here, so a commit or settle that ends a gesture can never
//! leave the UI out of step.

use crate::stack::Input;
use crate::types::Direction;

use super::state::{
    Action, Pointer, Screen, StackView, Transition, Ui, NUDGE_STEP, PX_PER_COLUMN, PX_PER_ROW,
    SWIPE_OVERSHOOT,
};

/// Pure UI transition function.
pub fn update(ui: Ui, action: &Action, stack: &StackView) -> Transition {
    match ui.screen {
        Screen::Browse => update_browse(ui, action, stack),
        Screen::Help => update_help(ui, action),
    }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

/// Browse: pointer and keyboard gestures drive the stack.
fn update_browse(mut ui: Ui, action: &Action, stack: &StackView) -> Transition {
    match action {
        Action::PointerDown { column, row } => {
            ui.pointer = Some(Pointer {
                column: *column,
                row: *row,
                moved: false,
            });
            Transition::ui(ui)
        }
        Action::PointerDrag { column, row } => pointer_drag(ui, *column, *row, stack),
        Action::PointerUp => match ui.pointer.take() {
            Some(Pointer { moved: true, .. }) => step(ui, vec![Input::GestureRelease]),
            Some(Pointer { moved: false, .. }) => step(ui, vec![Input::Tap]),
            None => Transition::ui(ui),
        },
        Action::Nudge(direction) => {
            let (dx, mut inputs) = match ui.nudge {
                Some(dx) if stack.dragging => (dx + direction.sign() * NUDGE_STEP, Vec::new()),
                _ => (direction.sign() * NUDGE_STEP, vec![Input::GestureStart]),
            };
            inputs.push(Input::GestureMove { dx, dy: 0.0 });
            ui.nudge = Some(dx);
            step(ui, inputs)
        }
        Action::Release => match ui.nudge.take() {
            Some(_) if stack.dragging => step(ui, vec![Input::GestureRelease]),
            _ => Transition::ui(ui),
        },
        Action::Swipe(direction) => {
            ui.nudge = None;
            let dx = direction.sign() * (stack.threshold + SWIPE_OVERSHOOT);
            step(
                ui,
                vec![
                    Input::GestureStart,
                    Input::GestureMove { dx, dy: 0.0 },
                    Input::GestureRelease,
                ],
            )
        }
        Action::Flip => step(ui, vec![Input::Tap]),
        Action::ToggleHelp => {
            ui.screen = Screen::Help;
            Transition::ui(ui)
        }
        Action::Back => Transition::ui(ui),
        Action::Quit => Transition::Quit,
    }
}

/// Help: any dismiss key returns to the stack.
fn update_help(mut ui: Ui, action: &Action) -> Transition {
    match action {
        Action::ToggleHelp | Action::Back => {
            ui.screen = Screen::Browse;
            Transition::ui(ui)
        }
        Action::Quit => Transition::Quit,
        _ => Transition::ui(ui),
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn step(ui: Ui, inputs: Vec<Input>) -> Transition {
    Transition::Step { ui, inputs }
}

/// Mouse drag: translation is measured from the press point.
fn pointer_drag(mut ui: Ui, column: u16, row: u16, stack: &StackView) -> Transition {
    let Some(mut pointer) = ui.pointer else {
        return Transition::ui(ui);
    };

    let mut inputs = Vec::with_capacity(2);
    if !pointer.moved {
        inputs.push(Input::GestureStart);
    } else if !stack.dragging {
        // A keyboard swipe ended the gesture while the button stayed
        // down: the next card's drag starts here.
        pointer.column = column;
        pointer.row = row;
        inputs.push(Input::GestureStart);
    }

    let dx = (column as f32 - pointer.column as f32) * PX_PER_COLUMN;
    let dy = (row as f32 - pointer.row as f32) * PX_PER_ROW;
    inputs.push(Input::GestureMove { dx, dy });

    ui.pointer = Some(Pointer { moved: true, ..pointer });
    step(ui, inputs)
}

// ============================================================================
// TESTS
// ============================================================================
