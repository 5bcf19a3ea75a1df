//! Game settings and preferences
//!
//! Persisted separately from high scores.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PARTICLES;
use crate::error::StoreError;
use crate::persistence::{Store, load_json, save_json};
use crate::tuning::{Difficulty, GameConfig, GameMode};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Last menu selection ===
    pub mode: GameMode,
    pub difficulty: Difficulty,

    // === Audio ===
    /// Sound on/off (the M key)
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Visual Effects ===
    /// Particle effects on solve
    pub particles: bool,
    /// Particle cap when enabled
    pub max_particles: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Arithmetic,
            difficulty: Difficulty::Medium,

            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,

            particles: true,
            max_particles: MAX_PARTICLES,
        }
    }
}

impl Settings {
    /// Store key
    pub const STORAGE_KEY: &'static str = "cpu_overload_settings";

    pub fn config(&self) -> GameConfig {
        GameConfig::new(self.mode, self.difficulty)
    }

    /// Effective particle count cap
    pub fn effective_max_particles(&self) -> usize {
        if !self.particles { 0 } else { self.max_particles }
    }

    /// Flip sound on/off, returning the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Load settings; missing or corrupt data yields defaults
    pub fn load(store: &dyn Store) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Discarding unreadable settings: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn Store) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
