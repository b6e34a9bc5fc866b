//! Reflex Trainer - adaptive key-reaction drills
//!
//! Repeatedly prompts a key, measures reaction time, persists per-key
//! stats across sessions, and biases prompts toward slower or more
//! error-prone keys.

mod cli;
mod session;

use clap::Parser;
use cli::display::{self, Display};
use cli::input::InputHandler;
use session::round::RoundController;
use session::select::SelectionEngine;
use session::stats::{StatsStore, KEY_SET};
use std::error::Error;
use std::path::Path;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "Reflex Trainer")]
#[command(about = "Adaptive reflex-training drills in the terminal")]
struct Args {
    /// Path to the persisted stats file
    #[arg(short, long, default_value = "data/stats.json")]
    stats: String,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut store = StatsStore::load(Path::new(&args.stats));
    if args.debug {
        eprintln!(
            "✓ Stats loaded from {} ({} games played)",
            args.stats,
            store.games_played()
        );
    }

    let mut controller = RoundController::new(SelectionEngine::new());

    InputHandler::enable_raw_mode()?;
    let input = InputHandler::new();
    let display = Display::new()?;

    // First prompt goes out after the usual inter-round delay
    controller.schedule_next(Instant::now());

    let mut last_size = crossterm::terminal::size()?;
    let mut dirty = true;

    loop {
        if controller.tick(Instant::now(), &store) {
            dirty = true;
        }

        // Dimensions are queried fresh so resizes take effect next frame
        let size = crossterm::terminal::size()?;
        if size != last_size {
            last_size = size;
            dirty = true;
        }

        if dirty {
            let frame =
                display::build_frame(&store, &controller, size.0 as usize, size.1 as usize);
            display.draw(&frame)?;
            dirty = false;
        }

        match input.read_key()? {
            Some(key) if InputHandler::is_exit(&key) => break,
            Some(key) => {
                if let Some(c) = InputHandler::key_to_char(&key) {
                    if controller.on_key_press(c, Instant::now(), &mut store) {
                        dirty = true;
                    }
                }
            }
            None => {}
        }
    }

    // Shutdown: an in-flight round is abandoned unscored
    display.shutdown()?;
    InputHandler::disable_raw_mode()?;

    store.increment_games_played();
    store.save();

    print_summary(&store, &controller);
    Ok(())
}

/// Final session summary printed after the UI is torn down
fn print_summary(store: &StatsStore, controller: &RoundController) {
    println!("🎉 Session Complete!");
    println!(
        "📊 Rounds: {}  |  Games played: {}  |  Accuracy: {}  |  Rolling avg: {}",
        controller.round_number(),
        store.games_played(),
        store.overall_accuracy_label(),
        controller.rolling_average_label()
    );
    println!();
    println!(
        " KEY {:>6} {:>6} {:>6} {:>7} {:>7} {:>7}",
        "ATT", "HIT", "ERR", "AVG", "BEST", "WORST"
    );
    for &key in &KEY_SET {
        let stat = store.get(key);
        let label = |v: Option<u64>| v.map(|ms| ms.to_string()).unwrap_or_else(|| "N/A".into());
        println!(
            "  {}  {:>6} {:>6} {:>6} {:>7} {:>7} {:>7}",
            key,
            stat.attempts,
            stat.successes,
            stat.errors,
            label(stat.avg_time_ms().map(|avg| avg.round() as u64)),
            label(stat.best_time_ms),
            label(stat.worst_time_ms),
        );
    }
    println!("\nThanks for practicing!");
}
