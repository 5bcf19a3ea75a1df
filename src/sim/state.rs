//! Game state and core simulation types
//!
//! The session owns exactly one `GameState`; the tick and the input matcher
//! are the only code that mutates it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::ParticleField;
use super::tutorial::TutorialState;
use crate::consts::*;
use crate::tuning::GameConfig;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, configuration is editable
    Menu,
    /// Typing tutorial overlay
    Tutorial,
    /// Active gameplay
    Playing,
    /// Game is paused, physics frozen
    Paused,
    /// Run ended, health ran out
    GameOver,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUp {
    /// Halves task fall speed
    Slow,
    /// Missed tasks deal no damage
    Shield,
    /// Solves score double
    Double,
}

impl PowerUp {
    pub const ALL: [PowerUp; 3] = [PowerUp::Slow, PowerUp::Shield, PowerUp::Double];

    /// Display color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            PowerUp::Slow => 0x34d399,
            PowerUp::Shield => 0x60a5fa,
            PowerUp::Double => 0xfbbf24,
        }
    }

    /// Short badge label
    pub fn label(&self) -> &'static str {
        match self {
            PowerUp::Slow => "SLOW",
            PowerUp::Shield => "SHIELD",
            PowerUp::Double => "2X",
        }
    }
}

/// Visual category of a task (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskCategory {
    Arithmetic,
    PlainNumber,
}

impl TaskCategory {
    pub fn color(&self) -> u32 {
        match self {
            TaskCategory::Arithmetic => 0x3b82f6,
            TaskCategory::PlainNumber => 0x06b6d4,
        }
    }
}

/// A falling task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    /// Text anchor; x is fixed at spawn, y only grows
    pub pos: Vec2,
    /// Distance per tick
    pub speed: f32,
    /// What the player sees, e.g. "7 × 8"
    pub text: String,
    /// What the player must type, e.g. "56" (uppercase)
    pub answer: String,
    pub category: TaskCategory,
    pub power_up: Option<PowerUp>,
}

impl Task {
    pub fn new(
        id: u32,
        pos: Vec2,
        speed: f32,
        text: impl Into<String>,
        answer: impl Into<String>,
        category: TaskCategory,
    ) -> Self {
        Self {
            id,
            pos,
            speed,
            text: text.into(),
            answer: answer.into().to_uppercase(),
            category,
            power_up: None,
        }
    }

    pub fn with_power_up(mut self, power_up: PowerUp) -> Self {
        self.power_up = Some(power_up);
        self
    }

    /// Power-up tasks take the power-up's color
    pub fn color(&self) -> u32 {
        self.power_up
            .map(|p| p.color())
            .unwrap_or_else(|| self.category.color())
    }

    /// Whether normalized input could still become this task's answer
    pub fn accepts_prefix(&self, normalized: &str) -> bool {
        self.answer.starts_with(normalized)
    }
}

/// Active power-up effects, each an absolute expiry timestamp (ms)
///
/// `None` means the effect was never activated this run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub slow_until: Option<f64>,
    pub shield_until: Option<f64>,
    pub double_until: Option<f64>,
}

impl ActiveEffects {
    fn slot(&self, effect: PowerUp) -> Option<f64> {
        match effect {
            PowerUp::Slow => self.slow_until,
            PowerUp::Shield => self.shield_until,
            PowerUp::Double => self.double_until,
        }
    }

    fn slot_mut(&mut self, effect: PowerUp) -> &mut Option<f64> {
        match effect {
            PowerUp::Slow => &mut self.slow_until,
            PowerUp::Shield => &mut self.shield_until,
            PowerUp::Double => &mut self.double_until,
        }
    }

    /// Start (or restart) an effect; any remaining time is replaced, not extended.
    /// Returns the new expiry.
    pub fn activate(&mut self, effect: PowerUp, now_ms: f64) -> f64 {
        let until = now_ms + EFFECT_DURATION_MS;
        *self.slot_mut(effect) = Some(until);
        until
    }

    pub fn is_active(&self, effect: PowerUp, now_ms: f64) -> bool {
        self.slot(effect).is_some_and(|until| until > now_ms)
    }

    /// Milliseconds left on an effect (0 when inactive)
    pub fn remaining_ms(&self, effect: PowerUp, now_ms: f64) -> f64 {
        self.slot(effect)
            .map(|until| (until - now_ms).max(0.0))
            .unwrap_or(0.0)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Things that happened during a tick or keystroke, for audio and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    TaskSpawned { id: u32 },
    TaskSolved { id: u32, points: u64, power_up: Option<PowerUp> },
    PowerUpActivated { kind: PowerUp, until_ms: f64 },
    LevelUp { level: u32 },
    InputRejected,
    /// `damage` is 0 when the shield absorbed the hit
    TaskMissed { id: u32, damage: i32 },
    GameOver { score: u64 },
    NewHighScore { score: u64 },
    SoundToggled { enabled: bool },
    /// Correct character in a tutorial drill
    TutorialKeyAccepted,
    TutorialAdvanced { step: usize },
    TutorialCompleted,
}

/// Complete game state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Mode and difficulty for the current (or next) run
    pub config: GameConfig,
    /// Current phase
    pub phase: GamePhase,
    pub score: u64,
    /// Always within [0, MAX_HEALTH]
    pub health: i32,
    /// Starts at 1
    pub level: u32,
    /// Raw input buffer as last accepted
    pub input: String,
    /// Error flash expiry after a rejected keystroke
    pub input_error_until: Option<f64>,
    /// Live tasks in spawn order
    pub tasks: Vec<Task>,
    /// Active power-up effects
    pub effects: ActiveEffects,
    /// Timestamp of the last spawn (None: spawn on the next tick)
    pub last_spawn_ms: Option<f64>,
    /// Gameplay RNG (task generation only)
    pub rng: Pcg32,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: ParticleField,
    /// Tutorial progress, meaningful in `Tutorial` only
    pub tutorial: TutorialState,
    /// Events not yet drained by the session
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new state sitting in the menu
    pub fn new(seed: u64, config: GameConfig) -> Self {
        Self {
            seed,
            config,
            phase: GamePhase::Menu,
            score: 0,
            health: MAX_HEALTH,
            level: 1,
            input: String::new(),
            input_error_until: None,
            tasks: Vec::new(),
            effects: ActiveEffects::default(),
            last_spawn_ms: None,
            rng: Pcg32::seed_from_u64(seed),
            particles: ParticleField::new(seed, MAX_PARTICLES),
            tutorial: TutorialState::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Zero every per-run counter, rewind both RNGs to the run seed and
    /// enter `Playing`. Two runs from the same seed play out identically.
    pub fn begin_run(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.particles = ParticleField::new(self.seed, self.particles.cap());
        self.score = 0;
        self.health = MAX_HEALTH;
        self.level = 1;
        self.input.clear();
        self.input_error_until = None;
        self.tasks.clear();
        self.effects.clear();
        self.last_spawn_ms = None;
        self.next_id = 1;
        self.phase = GamePhase::Playing;
    }

    /// Add to health, clamped to [0, MAX_HEALTH]
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).clamp(0, MAX_HEALTH);
    }

    /// Whether the rejected-input flash is still showing
    pub fn input_error(&self, now_ms: f64) -> bool {
        self.input_error_until.is_some_and(|until| until > now_ms)
    }

    pub fn task(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_replaces_instead_of_stacking() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUp::Shield, 1_000.0);
        let until = effects.activate(PowerUp::Shield, 1_000.0);
        assert_eq!(until, 11_000.0);
        assert_eq!(effects.shield_until, Some(11_000.0));

        // Re-activation later restarts from the new time
        effects.activate(PowerUp::Shield, 5_000.0);
        assert_eq!(effects.shield_until, Some(15_000.0));
    }

    #[test]
    fn test_effects_are_independent() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUp::Slow, 0.0);
        assert!(effects.is_active(PowerUp::Slow, 9_999.0));
        assert!(!effects.is_active(PowerUp::Shield, 1.0));
        assert!(!effects.is_active(PowerUp::Double, 1.0));
    }

    #[test]
    fn test_effect_expiry_boundary() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUp::Double, 0.0);
        assert!(effects.is_active(PowerUp::Double, 9_999.9));
        assert!(!effects.is_active(PowerUp::Double, 10_000.0));
        assert_eq!(effects.remaining_ms(PowerUp::Double, 4_000.0), 6_000.0);
        assert_eq!(effects.remaining_ms(PowerUp::Double, 20_000.0), 0.0);
        assert_eq!(effects.remaining_ms(PowerUp::Slow, 0.0), 0.0);
    }

    #[test]
    fn test_begin_run_zeroes_state() {
        let mut state = GameState::new(7, GameConfig::default());
        state.score = 900;
        state.health = 3;
        state.level = 4;
        state.input.push_str("12");
        state.effects.activate(PowerUp::Slow, 0.0);
        let id = state.next_entity_id();
        state
            .tasks
            .push(Task::new(id, Vec2::ZERO, 1.0, "1 + 1", "2", TaskCategory::Arithmetic));

        state.begin_run();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!((state.score, state.health, state.level), (0, 100, 1));
        assert!(state.input.is_empty());
        assert!(state.tasks.is_empty());
        assert_eq!(state.effects, ActiveEffects::default());
        assert_eq!(state.last_spawn_ms, None);
    }

    #[test]
    fn test_begin_run_rewinds_rng() {
        use rand::Rng;

        let mut state = GameState::new(7, GameConfig::default());
        state.particles.set_cap(32);
        state.begin_run();
        let first: u32 = state.rng.random();
        state.particles.burst(Vec2::ZERO, 0xffffff);

        state.begin_run();
        assert_eq!(state.rng.random::<u32>(), first);
        assert!(state.particles.is_empty());
        assert_eq!(state.particles.cap(), 32);
    }

    #[test]
    fn test_heal_clamps() {
        let mut state = GameState::new(1, GameConfig::default());
        state.heal(50);
        assert_eq!(state.health, 100);
        state.heal(-250);
        assert_eq!(state.health, 0);
    }

    #[test]
    fn test_task_color_prefers_power_up() {
        let task = Task::new(1, Vec2::ZERO, 1.0, "42", "42", TaskCategory::PlainNumber);
        assert_eq!(task.color(), 0x06b6d4);
        let task = task.with_power_up(PowerUp::Double);
        assert_eq!(task.color(), 0xfbbf24);
    }
}
