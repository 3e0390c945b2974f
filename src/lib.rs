//! grant-swipe: a swipe-gesture card stack for browsing grants.

pub mod config;
pub mod deck;
pub mod journal;
pub mod logging;
pub mod motion;
pub mod report;
pub mod stack;
pub mod tui;
pub mod types;
