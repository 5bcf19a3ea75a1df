//! High score table
//!
//! One best score per (mode, difficulty) pair, persisted through a `Store`.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::persistence::{Store, load_json, save_json};
use crate::tuning::{Difficulty, GameMode};

/// Best scores for each difficulty of one mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyScores {
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
}

impl DifficultyScores {
    fn slot_mut(&mut self, difficulty: Difficulty) -> &mut u64 {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    fn get(&self, difficulty: Difficulty) -> u64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

/// High score table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScores {
    pub arithmetic: DifficultyScores,
    pub plain_number: DifficultyScores,
}

impl HighScores {
    /// Store key
    pub const STORAGE_KEY: &'static str = "cpu_overload_highscores";

    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    fn mode(&self, mode: GameMode) -> &DifficultyScores {
        match mode {
            GameMode::Arithmetic => &self.arithmetic,
            GameMode::PlainNumber => &self.plain_number,
        }
    }

    fn mode_mut(&mut self, mode: GameMode) -> &mut DifficultyScores {
        match mode {
            GameMode::Arithmetic => &mut self.arithmetic,
            GameMode::PlainNumber => &mut self.plain_number,
        }
    }

    pub fn best(&self, mode: GameMode, difficulty: Difficulty) -> u64 {
        self.mode(mode).get(difficulty)
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, mode: GameMode, difficulty: Difficulty, score: u64) -> bool {
        score > self.best(mode, difficulty)
    }

    /// Store the score if it beats the current best.
    /// Returns true if the table changed.
    pub fn record(&mut self, mode: GameMode, difficulty: Difficulty, score: u64) -> bool {
        if !self.qualifies(mode, difficulty, score) {
            return false;
        }
        *self.mode_mut(mode).slot_mut(difficulty) = score;
        true
    }

    /// Load from the store; missing or corrupt data yields an empty table
    pub fn load(store: &dyn Store) -> Self {
        match load_json::<HighScores>(store, Self::STORAGE_KEY) {
            Ok(Some(scores)) => {
                log::info!("Loaded high scores");
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(err) => {
                log::warn!("Discarding unreadable high scores: {err}");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn Store) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("High scores saved");
        Ok(())
    }
}
