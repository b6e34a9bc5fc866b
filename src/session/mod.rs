//! Training session: statistics, adaptive selection, and round lifecycle
//!
//! # Components
//! - `stats.rs`: Per-key statistics store with JSON persistence
//! - `select.rs`: Difficulty-weighted random key selection
//! - `round.rs`: Round state machine, rolling window, and event log

pub mod round;
pub mod select;
pub mod stats;

pub use round::{RoundController, RoundPhase};
pub use select::SelectionEngine;
pub use stats::{StatsStore, KEY_SET};
