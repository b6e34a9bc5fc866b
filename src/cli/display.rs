//! Dual-pane terminal rendering
//!
//! Layout:
//! - Left: fixed 60x22 stats panel (header, legend, aggregates, per-key table)
//! - A full-height vertical separator column
//! - Right: scrolling event log, most recent entries that fit
//!
//! Frames are rebuilt from scratch against the current terminal size and
//! drawn with absolute cursor addressing; nothing is diffed or cached.

use crate::cli::text;
use crate::session::round::{RoundController, RoundPhase};
use crate::session::stats::{StatsStore, KEY_SET};
use crossterm::style::{Print, Stylize};
use crossterm::terminal::ClearType;
use crossterm::{cursor, execute, queue, terminal};
use std::io::{stdout, Write};

/// Fixed width of the stats panel in display columns
pub const LEFT_WIDTH: usize = 60;
/// Fixed height of the stats panel in rows
pub const LEFT_HEIGHT: usize = 22;

/// Build the full frame as one string per terminal row
pub fn build_frame(
    store: &StatsStore,
    controller: &RoundController,
    width: usize,
    height: usize,
) -> Vec<String> {
    let left = left_pane(store, controller);
    let right_width = width.saturating_sub(LEFT_WIDTH + 1);
    let right = right_pane(controller.event_log(), right_width, height);
    let blank_left = " ".repeat(LEFT_WIDTH);

    let mut rows = Vec::with_capacity(height);
    for y in 0..height {
        let mut row = String::new();
        row.push_str(left.get(y).map(String::as_str).unwrap_or(&blank_left));
        row.push('│');
        if let Some(r) = right.get(y) {
            row.push_str(r);
        }
        rows.push(text::pad_to(&row, width));
    }
    rows
}

/// Stats panel: exactly `LEFT_HEIGHT` rows of `LEFT_WIDTH` columns
fn left_pane(store: &StatsStore, controller: &RoundController) -> Vec<String> {
    let mut rows = Vec::with_capacity(LEFT_HEIGHT);

    rows.push(format!(" {}", "REFLEX TRAINER".bold()));
    rows.push("─".repeat(LEFT_WIDTH));
    rows.push(" Press the prompted key as fast as you can.".to_string());
    let legend: Vec<String> = KEY_SET.iter().map(|k| k.to_string()).collect();
    rows.push(format!(" Keys: {}", legend.join(" ")));
    rows.push(String::new());
    rows.push(format!(
        " Round: {:<8} Games played: {}",
        controller.round_number(),
        store.games_played()
    ));
    rows.push(format!(
        " Accuracy: {:<8} Rolling avg: {}",
        store.overall_accuracy_label(),
        controller.rolling_average_label()
    ));
    rows.push(String::new());
    rows.push(format!(
        " KEY {:>6} {:>6} {:>6} {:>7} {:>7} {:>7}",
        "ATT", "HIT", "ERR", "AVG", "BEST", "WORST"
    ));
    for &key in &KEY_SET {
        let stat = store.get(key);
        rows.push(format!(
            "  {}  {:>6} {:>6} {:>6} {:>7} {:>7} {:>7}",
            key,
            stat.attempts,
            stat.successes,
            stat.errors,
            ms_label(stat.avg_time_ms().map(|avg| avg.round() as u64)),
            ms_label(stat.best_time_ms),
            ms_label(stat.worst_time_ms),
        ));
    }
    rows.push(String::new());
    rows.push(prompt_line(controller));
    rows.push(String::new());
    rows.push(format!(" {}", "Ctrl+C or Esc to quit".dark_grey()));

    text::fit_rows(rows, LEFT_HEIGHT, LEFT_WIDTH)
}

/// Event-log panel: header plus the newest entries that fit
fn right_pane(log: &[String], width: usize, height: usize) -> Vec<String> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut rows = Vec::with_capacity(height);
    rows.push(format!(" {}", "EVENT LOG".bold()));
    rows.push("─".repeat(width));

    let capacity = height.saturating_sub(2);
    let start = log.len().saturating_sub(capacity);
    for entry in &log[start..] {
        rows.push(format!(" {}", entry));
    }

    text::fit_rows(rows, height, width)
}

fn prompt_line(controller: &RoundController) -> String {
    match (controller.phase(), controller.prompted_key()) {
        (RoundPhase::AwaitingInput, Some(key)) => {
            format!(" Press: {}", format!("[{}]", key).green().bold())
        }
        _ => format!(" {}", "Get ready…".dark_grey()),
    }
}

fn ms_label(value: Option<u64>) -> String {
    match value {
        Some(ms) => ms.to_string(),
        None => "N/A".to_string(),
    }
}

/// Terminal draw surface; owns cursor visibility for the session
pub struct Display;

impl Display {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        execute!(stdout(), cursor::Hide)?;
        Ok(Display)
    }

    /// Repaint the whole frame, addressing each row absolutely
    pub fn draw(&self, frame: &[String]) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;
        for (y, row) in frame.iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, y as u16), Print(row))?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Restore the terminal for normal output (summary printing)
    pub fn shutdown(&self) -> Result<(), Box<dyn std::error::Error>> {
        execute!(
            stdout(),
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = execute!(stdout(), cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::text::{display_width, parse_segments, Segment};
    use crate::session::select::SelectionEngine;

    fn printable(s: &str) -> String {
        parse_segments(s)
            .into_iter()
            .filter_map(|seg| match seg {
                Segment::Text(t) => Some(t),
                Segment::Style(_) => None,
            })
            .collect()
    }

    fn harness() -> (StatsStore, RoundController) {
        let store = StatsStore::fresh(
            std::env::temp_dir()
                .join(format!("reflex-display-test-{}.json", std::process::id()))
                .as_path(),
        );
        (store, RoundController::new(SelectionEngine::with_seed(11)))
    }

    #[test]
    fn test_frame_fills_terminal_exactly() {
        let (store, controller) = harness();
        let frame = build_frame(&store, &controller, 100, 24);

        assert_eq!(frame.len(), 24);
        for row in &frame {
            assert_eq!(display_width(row), 100);
        }
    }

    #[test]
    fn test_separator_sits_after_left_pane() {
        let (store, controller) = harness();
        let frame = build_frame(&store, &controller, 90, 30);

        for row in &frame {
            let chars: Vec<char> = printable(row).chars().collect();
            assert_eq!(chars[LEFT_WIDTH], '│');
        }
    }

    #[test]
    fn test_left_pane_is_fixed_size() {
        let (store, controller) = harness();
        let pane = left_pane(&store, &controller);

        assert_eq!(pane.len(), LEFT_HEIGHT);
        for row in &pane {
            assert_eq!(display_width(row), LEFT_WIDTH);
        }
    }

    #[test]
    fn test_fresh_store_renders_na_placeholders() {
        let (store, controller) = harness();
        let pane = left_pane(&store, &controller);
        let flat: String = pane.iter().map(|r| printable(r)).collect();

        assert!(flat.contains("Accuracy: N/A"));
        assert!(flat.contains("Rolling avg: N/A"));
        // Every key row shows N/A for avg/best/worst
        assert!(printable(&pane[9]).contains("N/A"));
    }

    #[test]
    fn test_key_table_reflects_recorded_stats() {
        let (mut store, controller) = harness();
        store.record_attempt('q', true, 120);
        store.record_attempt('q', true, 80);
        store.record_attempt('q', false, 0);

        let pane = left_pane(&store, &controller);
        // 'q' is the first table row, directly under the header
        let q_row = printable(&pane[9]);
        assert!(q_row.starts_with("  q"));
        assert!(q_row.contains('3')); // attempts
        assert!(q_row.contains("100")); // avg of 120 and 80
        assert!(q_row.contains("80")); // best
        assert!(q_row.contains("120")); // worst
    }

    #[test]
    fn test_log_pane_keeps_newest_entries() {
        let entries: Vec<String> = (1..=50).map(|i| format!("entry {}", i)).collect();
        let pane = right_pane(&entries, 20, 10);

        assert_eq!(pane.len(), 10);
        let flat: String = pane.iter().map(|r| printable(r)).collect();
        // 8 data rows after header + rule: entries 43..=50 survive
        assert!(flat.contains("entry 50"));
        assert!(flat.contains("entry 43"));
        assert!(!flat.contains("entry 42"));
    }

    #[test]
    fn test_narrow_terminal_degrades_without_panic() {
        let (store, controller) = harness();
        let frame = build_frame(&store, &controller, 30, 5);
        assert_eq!(frame.len(), 5);
        for row in &frame {
            assert_eq!(display_width(row), 30);
        }
    }
}
