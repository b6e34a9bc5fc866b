//! Round lifecycle state machine
//!
//! Handles:
//! - Prompt selection and reaction timing for one round at a time
//! - Rolling window of recent successful reaction times
//! - Append-only event log of scored outcomes
//! - Deferred scheduling of the next round

use crate::session::select::SelectionEngine;
use crate::session::stats::StatsStore;
use crossterm::style::Stylize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How many recent successful reaction times feed the rolling average
pub const ROLLING_WINDOW: usize = 4;
/// Pause between scoring a press and issuing the next prompt
pub const ROUND_DELAY: Duration = Duration::from_millis(100);

/// Where the controller is in the prompt-response cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    /// No key prompted; stray presses are dropped
    Idle,
    /// Key prompted, reaction timer running
    AwaitingInput,
}

/// Drives rounds: selects prompts, scores presses, keeps the log
pub struct RoundController {
    engine: SelectionEngine,
    phase: RoundPhase,
    round_number: u64,
    prompted_key: Option<char>,
    prompt_issued_at: Option<Instant>,
    /// Deadline for the next deferred round start; cleared once fired
    next_round_due: Option<Instant>,
    rolling: VecDeque<u64>,
    event_log: Vec<String>,
}

impl RoundController {
    pub fn new(engine: SelectionEngine) -> Self {
        RoundController {
            engine,
            phase: RoundPhase::Idle,
            round_number: 0,
            prompted_key: None,
            prompt_issued_at: None,
            next_round_due: None,
            rolling: VecDeque::with_capacity(ROLLING_WINDOW),
            event_log: Vec::new(),
        }
    }

    /// Arm the deferred round start `ROUND_DELAY` from `now`
    pub fn schedule_next(&mut self, now: Instant) {
        self.next_round_due = Some(now + ROUND_DELAY);
    }

    /// Fire the deferred round start once its deadline has passed.
    /// Returns true when a new round began (screen needs a redraw).
    pub fn tick(&mut self, now: Instant, store: &StatsStore) -> bool {
        if self.phase != RoundPhase::Idle {
            return false;
        }
        match self.next_round_due {
            Some(due) if now >= due => {
                self.start_round(now, store);
                true
            }
            _ => false,
        }
    }

    /// Begin a new round: bump the counter, pick a key, start the timer
    pub fn start_round(&mut self, now: Instant, store: &StatsStore) {
        if self.phase != RoundPhase::Idle {
            return;
        }
        self.round_number += 1;
        self.prompted_key = Some(self.engine.choose_next(store));
        self.prompt_issued_at = Some(now);
        self.next_round_due = None;
        self.phase = RoundPhase::AwaitingInput;
    }

    /// Score a key press against the active prompt.
    ///
    /// A press while `Idle` is expected steady-state noise (it raced the
    /// inter-round delay) and is dropped without any state change.
    /// Returns true when the press was scored.
    pub fn on_key_press(&mut self, pressed: char, now: Instant, store: &mut StatsStore) -> bool {
        if self.phase != RoundPhase::AwaitingInput {
            return false;
        }
        let (prompted, issued_at) = match (self.prompted_key, self.prompt_issued_at) {
            (Some(key), Some(at)) => (key, at),
            _ => return false,
        };

        let reaction_ms = now.duration_since(issued_at).as_millis() as u64;
        let correct = pressed == prompted;

        store.record_attempt(prompted, correct, reaction_ms);

        if correct {
            if self.rolling.len() == ROLLING_WINDOW {
                self.rolling.pop_front();
            }
            self.rolling.push_back(reaction_ms);
        }

        self.event_log
            .push(format_outcome(self.round_number, prompted, pressed, correct, reaction_ms));

        store.save();

        self.phase = RoundPhase::Idle;
        self.prompted_key = None;
        self.prompt_issued_at = None;
        self.schedule_next(now);
        true
    }

    /// Mean of the rolling window, `None` until the first correct press
    pub fn rolling_average(&self) -> Option<f64> {
        if self.rolling.is_empty() {
            return None;
        }
        Some(self.rolling.iter().sum::<u64>() as f64 / self.rolling.len() as f64)
    }

    /// Rolling average formatted in ms, `N/A` while the window is empty
    pub fn rolling_average_label(&self) -> String {
        match self.rolling_average() {
            Some(avg) => format!("{:.0} ms", avg),
            None => "N/A".to_string(),
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round_number(&self) -> u64 {
        self.round_number
    }

    pub fn prompted_key(&self) -> Option<char> {
        self.prompted_key
    }

    pub fn event_log(&self) -> &[String] {
        &self.event_log
    }

    #[cfg(test)]
    fn rolling_window(&self) -> Vec<u64> {
        self.rolling.iter().copied().collect()
    }
}

/// One styled log line for a scored press
fn format_outcome(round: u64, prompted: char, pressed: char, correct: bool, reaction_ms: u64) -> String {
    if correct {
        format!("#{:<4} [{}] {} {} ms", round, prompted, "hit ".green(), reaction_ms)
    } else {
        format!(
            "#{:<4} [{}] {} {} ms (pressed '{}')",
            round,
            prompted,
            "miss".red(),
            reaction_ms,
            pressed
        )
    }
}
