//! TUI module for interactive terminal interface.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (Ui, Action, Transition)
//! - `update`: Pure transitions from terminal gestures to stack inputs
//! - `view`: Pure rendering of stack frames
//! - `theme`: Style constants
//! - `run`: Effects (terminal, threads, clock)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

pub use run::run;
