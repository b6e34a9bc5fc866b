//! Difficulty-weighted key selection
//!
//! Each key's weight grows with its average reaction time and error count,
//! so harder keys are prompted more often. A constant floor keeps every
//! key selectable even when it is fast and error-free.

use crate::session::stats::{KeyStat, StatsStore, KEY_SET};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Assumed average reaction time (ms) for a key with no correct presses yet
pub const NEUTRAL_AVG_MS: f64 = 500.0;
/// Weight added per recorded error
pub const ERROR_PENALTY_MS: f64 = 100.0;
/// Constant floor so no key's selection probability reaches zero
pub const WEIGHT_FLOOR_MS: f64 = 100.0;

/// Samples the next key to prompt, proportional to per-key weight
pub struct SelectionEngine {
    rng: StdRng,
}

impl SelectionEngine {
    pub fn new() -> Self {
        SelectionEngine {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic engine for reproducible selection in tests
    pub fn with_seed(seed: u64) -> Self {
        SelectionEngine {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `avg reaction + errors * 100 + 100`; a key with no history weighs 600
    pub fn weight(stat: &KeyStat) -> f64 {
        let avg = stat.avg_time_ms().unwrap_or(NEUTRAL_AVG_MS);
        avg + stat.errors as f64 * ERROR_PENALTY_MS + WEIGHT_FLOOR_MS
    }

    /// Weighted random draw: pick `r` in `[0, Σweights)` and walk the
    /// canonical key order subtracting weights until the remainder drops
    /// to or below zero
    pub fn choose_next(&mut self, store: &StatsStore) -> char {
        let total: f64 = KEY_SET.iter().map(|&k| Self::weight(&store.get(k))).sum();
        let mut remainder = self.rng.gen_range(0.0..total);

        for &key in &KEY_SET {
            remainder -= Self::weight(&store.get(key));
            if remainder <= 0.0 {
                return key;
            }
        }

        // Float round-off can leave a sliver of remainder past the last key
        KEY_SET[KEY_SET.len() - 1]
    }
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn fresh_store() -> StatsStore {
        StatsStore::fresh(std::env::temp_dir().join("reflex-select-test.json").as_path())
    }

    #[test]
    fn test_untouched_key_weighs_600() {
        let stat = KeyStat::default();
        assert_eq!(SelectionEngine::weight(&stat), 600.0);
    }

    #[test]
    fn test_weight_combines_avg_and_errors() {
        let stat = KeyStat {
            attempts: 5,
            successes: 4,
            total_time_ms: 1200, // avg 300
            errors: 2,
            best_time_ms: Some(200),
            worst_time_ms: Some(400),
        };
        assert_eq!(SelectionEngine::weight(&stat), 300.0 + 200.0 + 100.0);
    }

    #[test]
    fn test_choose_next_returns_tracked_key() {
        let store = fresh_store();
        let mut engine = SelectionEngine::with_seed(7);
        for _ in 0..100 {
            let key = engine.choose_next(&store);
            assert!(KEY_SET.contains(&key));
        }
    }

    #[test]
    fn test_selection_frequency_tracks_weights() {
        // Give 'q' ten errors: weight 1600 vs 600 for the other eight keys.
        let mut store = fresh_store();
        for _ in 0..10 {
            store.record_attempt('q', false, 0);
        }

        let total: f64 = KEY_SET.iter().map(|&k| SelectionEngine::weight(&store.get(k))).sum();
        let expected_q = SelectionEngine::weight(&store.get('q')) / total;

        let mut engine = SelectionEngine::with_seed(42);
        let trials = 20_000;
        let mut counts: FxHashMap<char, u32> = FxHashMap::default();
        for _ in 0..trials {
            *counts.entry(engine.choose_next(&store)).or_default() += 1;
        }

        let observed_q = *counts.get(&'q').unwrap_or(&0) as f64 / trials as f64;
        assert!(
            (observed_q - expected_q).abs() < 0.02,
            "expected {:.3}, observed {:.3}",
            expected_q,
            observed_q
        );

        // Weighted keys must come up more often than unweighted ones
        let observed_e = *counts.get(&'e').unwrap_or(&0) as f64 / trials as f64;
        assert!(observed_q > observed_e * 1.5);
    }

    #[test]
    fn test_uniform_when_weights_equal() {
        let store = fresh_store();
        let mut engine = SelectionEngine::with_seed(1);
        let trials = 18_000;
        let mut counts: FxHashMap<char, u32> = FxHashMap::default();
        for _ in 0..trials {
            *counts.entry(engine.choose_next(&store)).or_default() += 1;
        }

        let expected = trials as f64 / KEY_SET.len() as f64;
        for &key in &KEY_SET {
            let observed = *counts.get(&key).unwrap_or(&0) as f64;
            assert!(
                (observed - expected).abs() < expected * 0.15,
                "key {:?}: expected ~{:.0}, observed {:.0}",
                key,
                expected,
                observed
            );
        }
    }
}
