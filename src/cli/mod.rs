//! CLI Interface: User input and terminal rendering
//!
//! # Components
//! - `input.rs`: Keystroke capture using crossterm
//! - `display.rs`: Dual-pane terminal rendering
//! - `text.rs`: ANSI-aware width measurement and layout helpers

pub mod display;
pub mod input;
pub mod text;
