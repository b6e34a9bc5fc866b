//! Per-key statistics with JSON persistence
//!
//! Tracks:
//! - Attempts, successes, and errors for every trainable key
//! - Total/best/worst reaction times over correct presses
//! - Games-played counter carried across sessions

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Trainable keys in canonical prompt order
pub const KEY_SET: [char; 9] = ['q', 'e', 'r', 't', 'f', 'g', 'c', 'x', 'z'];

/// Accumulated metrics for one trainable key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStat {
    /// Presses scored while this key was prompted (correct or not)
    pub attempts: u64,
    /// Correct presses
    pub successes: u64,
    /// Sum of reaction times over correct presses only (ms)
    #[serde(rename = "totalTime")]
    pub total_time_ms: u64,
    /// Mismatched presses charged against this (prompted) key
    pub errors: u64,
    /// Fastest correct press (ms)
    #[serde(rename = "bestTime")]
    pub best_time_ms: Option<u64>,
    /// Slowest correct press (ms)
    #[serde(rename = "worstTime")]
    pub worst_time_ms: Option<u64>,
}

impl KeyStat {
    /// Average reaction time over correct presses, if any
    pub fn avg_time_ms(&self) -> Option<f64> {
        if self.successes > 0 {
            Some(self.total_time_ms as f64 / self.successes as f64)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct SessionMeta {
    #[serde(rename = "gamesPlayed")]
    games_played: u64,
}

/// On-disk shape: `meta` block plus one entry per tracked key
#[derive(Serialize, Deserialize)]
struct PersistedStats {
    meta: SessionMeta,
    #[serde(flatten)]
    keys: BTreeMap<String, KeyStat>,
}

/// In-memory store for all per-key metrics and session meta counters
#[derive(Clone, Debug)]
pub struct StatsStore {
    path: PathBuf,
    meta: SessionMeta,
    keys: FxHashMap<char, KeyStat>,
}

impl StatsStore {
    /// Create a fresh store with every tracked key zeroed
    pub fn fresh(path: &Path) -> Self {
        let mut keys = FxHashMap::default();
        for &key in &KEY_SET {
            keys.insert(key, KeyStat::default());
        }
        StatsStore {
            path: path.to_path_buf(),
            meta: SessionMeta::default(),
            keys,
        }
    }

    /// Load persisted stats; missing or corrupt data falls back to a
    /// fresh store with a warning (never fatal)
    pub fn load(path: &Path) -> Self {
        let mut store = Self::fresh(path);

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return store, // first run, nothing saved yet
        };

        match serde_json::from_str::<PersistedStats>(&content) {
            Ok(persisted) => {
                store.meta = persisted.meta;
                for (name, stat) in persisted.keys {
                    if let Some(key) = name.chars().next() {
                        if KEY_SET.contains(&key) {
                            store.keys.insert(key, stat);
                        }
                    }
                }
            }
            Err(e) => {
                eprintln!("⚠ Corrupt stats file {} ({}), starting fresh", path.display(), e);
            }
        }

        store
    }

    /// Persist the full store; failures are logged and swallowed so a
    /// transient write error never stalls the session
    pub fn save(&self) {
        let persisted = PersistedStats {
            meta: self.meta.clone(),
            keys: self
                .keys
                .iter()
                .map(|(&key, &stat)| (key.to_string(), stat))
                .collect(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = fs::create_dir_all(parent);
            }
        }

        let result = serde_json::to_string_pretty(&persisted)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&self.path, json).map_err(|e| e.to_string()));

        if let Err(e) = result {
            eprintln!("⚠ Could not save stats to {}: {}", self.path.display(), e);
        }
    }

    /// Score one press against the prompted key.
    ///
    /// Attempts always increment. A correct press feeds the time metrics;
    /// a mismatch only bumps the error count. The error is charged to the
    /// prompted key, not the key actually pressed.
    pub fn record_attempt(&mut self, key: char, correct: bool, reaction_ms: u64) {
        let stat = self.keys.entry(key).or_default();
        stat.attempts += 1;

        if correct {
            stat.successes += 1;
            stat.total_time_ms += reaction_ms;
            stat.best_time_ms = Some(match stat.best_time_ms {
                Some(best) => best.min(reaction_ms),
                None => reaction_ms,
            });
            stat.worst_time_ms = Some(match stat.worst_time_ms {
                Some(worst) => worst.max(reaction_ms),
                None => reaction_ms,
            });
        } else {
            stat.errors += 1;
        }
    }

    /// Bump the games-played counter (once, at shutdown)
    pub fn increment_games_played(&mut self) {
        self.meta.games_played += 1;
    }

    pub fn games_played(&self) -> u64 {
        self.meta.games_played
    }

    /// Metrics for one key (zeroed default if never touched)
    pub fn get(&self, key: char) -> KeyStat {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    /// Success percentage across all keys; `None` until the first attempt
    pub fn overall_accuracy(&self) -> Option<f64> {
        let attempts: u64 = self.keys.values().map(|s| s.attempts).sum();
        if attempts == 0 {
            return None;
        }
        let successes: u64 = self.keys.values().map(|s| s.successes).sum();
        Some(100.0 * successes as f64 / attempts as f64)
    }

    /// Accuracy formatted to one decimal place, `N/A` before any attempt
    pub fn overall_accuracy_label(&self) -> String {
        match self.overall_accuracy() {
            Some(pct) => format!("{:.1}%", pct),
            None => "N/A".to_string(),
        }
    }
}
