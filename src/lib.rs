//! CPU Overload - falling-task arithmetic typing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (task generation, tick, input matching, scoring)
//! - `session`: Match lifecycle state machine and key handling
//! - `snapshot`: Read-only view handed to the presentation layer
//! - `persistence`: Key/value store collaborator (file, LocalStorage, memory)
//! - `tuning`: Data-driven difficulty balance

pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use error::{ConfigError, StoreError};
pub use highscores::HighScores;
pub use session::{Key, Modifiers, Session};
pub use settings::Settings;
pub use snapshot::Snapshot;
pub use tuning::{Difficulty, GameConfig, GameMode};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (same units as task positions)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 700.0;

    /// Tasks enter just above the visible area
    pub const SPAWN_Y: f32 = -40.0;
    /// Estimated rendered width of one character of task text
    pub const CHAR_WIDTH: f32 = 12.0;
    /// Horizontal margin kept clear on both sides at spawn
    pub const SPAWN_MARGIN: f32 = 20.0;

    /// Spawn cadence tightens by this much per level...
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 100.0;
    /// ...but never below this
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 500.0;

    /// Chance that a spawned task carries a power-up
    pub const POWER_UP_CHANCE: f64 = 0.10;
    /// Lifetime of every power-up effect
    pub const EFFECT_DURATION_MS: f64 = 10_000.0;
    /// Vertical movement multiplier while Slow is active
    pub const SLOW_TIME_SCALE: f32 = 0.5;

    /// How long a rejected keystroke keeps the error flag raised
    pub const INPUT_ERROR_MS: f64 = 300.0;
    /// Input lock after a wrong tutorial keystroke
    pub const TUTORIAL_ERROR_MS: f64 = 400.0;
    /// Longest possible answer in plain-number mode
    pub const PLAIN_NUMBER_MAX_INPUT: usize = 3;

    /// Health
    pub const MAX_HEALTH: i32 = 100;
    pub const SOLVE_HEAL: i32 = 2;
    pub const POWER_UP_HEAL: i32 = 15;
    pub const LEVEL_UP_HEAL: i32 = 20;
    pub const MISS_DAMAGE: i32 = 10;

    /// Scoring: each solve is worth BASE_POINTS * level (x2 under Double)
    pub const BASE_POINTS: u64 = 10;
    /// Level N ends once score exceeds N * LEVEL_THRESHOLD
    pub const LEVEL_THRESHOLD: u64 = 500;

    /// Particles
    pub const MAX_PARTICLES: usize = 256;
    pub const EXPLOSION_PARTICLES: usize = 10;
    pub const EXPLOSION_SPEED: f32 = 5.0;
    pub const PARTICLE_DECAY: f32 = 0.05;
    /// Explosion origin relative to the task's text anchor
    pub const EXPLOSION_OFFSET_X: f32 = 20.0;
    pub const EXPLOSION_OFFSET_Y: f32 = 10.0;
}

/// Estimated rendered width of a piece of task text
#[inline]
pub fn text_width(text: &str) -> f32 {
    text.chars().count() as f32 * consts::CHAR_WIDTH
}

/// Normalize raw player input for comparison against answers
#[inline]
pub fn normalize_input(raw: &str) -> String {
    raw.trim().to_uppercase()
}
