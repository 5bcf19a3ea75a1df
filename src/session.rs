//! Match session: lifecycle, key handling and high-score bookkeeping
//!
//! ```text
//! menu -> playing <-> paused
//! playing -> gameover
//! menu -> tutorial -> menu (finished)
//! {playing, paused, gameover, tutorial} -> menu
//! {playing, paused, gameover} -> playing (restart)
//! ```
//! Anything else is a silent no-op.

use crate::error::ConfigError;
use crate::highscores::HighScores;
use crate::persistence::Store;
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GamePhase, GameState, InputOutcome, TutorialState};
use crate::snapshot::Snapshot;
use crate::tuning::GameConfig;

/// Discrete keys the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Back to menu
    Escape,
    /// Restart the run
    Restart,
    /// Toggle pause
    Pause,
    /// Toggle sound
    Mute,
    /// Submit input, or continue in the tutorial
    Enter,
}

impl Key {
    /// Map a keyboard key name. Letters are case-sensitive (Shift+R etc.)
    /// so lowercase typing never triggers a shortcut.
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "Escape" => Some(Key::Escape),
            "R" => Some(Key::Restart),
            "P" => Some(Key::Pause),
            "M" => Some(Key::Mute),
            "Enter" => Some(Key::Enter),
            _ => None,
        }
    }
}

/// Modifier state of a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    /// Auto-repeat from a held key
    pub repeat: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// One player's game session
pub struct Session {
    state: GameState,
    settings: Settings,
    high_scores: HighScores,
    store: Box<dyn Store>,
}

impl Session {
    /// Load settings and high scores, then sit in the menu
    pub fn new(store: Box<dyn Store>, seed: u64) -> Self {
        let settings = Settings::load(&*store);
        let high_scores = HighScores::load(&*store);
        let mut state = GameState::new(seed, settings.config());
        state.particles.set_cap(settings.effective_max_particles());
        log::info!("Session created with seed {}", seed);
        Self {
            state,
            settings,
            high_scores,
            store,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn config(&self) -> GameConfig {
        self.state.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Best score for the configured mode and difficulty
    pub fn high_score(&self) -> u64 {
        let config = self.state.config;
        self.high_scores.best(config.mode, config.difficulty)
    }

    pub fn sound_enabled(&self) -> bool {
        self.settings.sound_enabled
    }

    /// Select mode and difficulty; only allowed from the menu
    pub fn configure(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        if self.state.phase != GamePhase::Menu {
            return Err(ConfigError::Locked {
                phase: self.state.phase,
            });
        }
        self.state.config = config;
        self.settings.mode = config.mode;
        self.settings.difficulty = config.difficulty;
        self.persist_settings();
        Ok(())
    }

    /// Apply new preferences (particles, volume, sound)
    pub fn update_settings(&mut self, settings: Settings) {
        self.state
            .particles
            .set_cap(settings.effective_max_particles());
        self.settings = Settings {
            mode: self.settings.mode,
            difficulty: self.settings.difficulty,
            ..settings
        };
        self.persist_settings();
    }

    /// Start a run from the menu
    pub fn start(&mut self) {
        if self.state.phase == GamePhase::Menu {
            self.begin_run();
        }
    }

    /// Restart the current run with a clean slate
    pub fn restart(&mut self) {
        if matches!(
            self.state.phase,
            GamePhase::Playing | GamePhase::Paused | GamePhase::GameOver
        ) {
            self.begin_run();
        }
    }

    fn begin_run(&mut self) {
        self.state.begin_run();
        log::info!(
            "Run started ({} {})",
            self.state.config.mode.as_str(),
            self.state.config.difficulty.as_str()
        );
    }

    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.state.phase = GamePhase::Paused;
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Playing;
            log::info!("Resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn open_tutorial(&mut self) {
        if self.state.phase == GamePhase::Menu {
            self.state.tutorial = TutorialState::default();
            self.state.input.clear();
            self.state.phase = GamePhase::Tutorial;
            log::info!("Tutorial opened");
        }
    }

    /// Previous tutorial page
    pub fn tutorial_back(&mut self) {
        if self.state.phase == GamePhase::Tutorial {
            self.state.tutorial.prev();
        }
    }

    /// Abandon whatever is going on and return to the menu
    pub fn exit_to_menu(&mut self) {
        if self.state.phase != GamePhase::Menu {
            self.state.phase = GamePhase::Menu;
            log::info!("Back to menu");
        }
    }

    pub fn toggle_sound(&mut self) {
        let enabled = self.settings.toggle_sound();
        self.state.push_event(GameEvent::SoundToggled { enabled });
        self.persist_settings();
    }

    /// Advance one frame
    pub fn tick(&mut self, now_ms: f64) {
        let was_playing = self.state.phase == GamePhase::Playing;
        sim::tick(&mut self.state, now_ms);
        if was_playing && self.state.phase == GamePhase::GameOver {
            self.on_game_over();
        }
    }

    /// Raw text field changed. In the tutorial the keystroke drives the
    /// drill and nothing is stored.
    pub fn on_input_change(&mut self, raw: &str, now_ms: f64) -> InputOutcome {
        if self.state.phase == GamePhase::Tutorial {
            sim::tutorial_input(&mut self.state, raw, now_ms);
            return InputOutcome::Stored;
        }
        sim::on_input_change(&mut self.state, raw, now_ms)
    }

    /// Enter pressed in the text field
    pub fn submit(&mut self) {
        sim::submit(&mut self.state);
    }

    /// Key press from the input layer; modified presses are ignored
    pub fn handle_key_event(&mut self, name: &str, modifiers: Modifiers) {
        if modifiers.any() {
            return;
        }
        match Key::from_name(name) {
            Some(Key::Enter) => self.press_enter(modifiers.repeat),
            Some(key) => self.handle_key(key),
            None => {}
        }
    }

    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Escape => self.exit_to_menu(),
            Key::Restart => self.restart(),
            Key::Pause => self.toggle_pause(),
            Key::Mute => self.toggle_sound(),
            Key::Enter => self.press_enter(false),
        }
    }

    fn press_enter(&mut self, repeat: bool) {
        match self.state.phase {
            GamePhase::Tutorial => {
                sim::tutorial_enter(&mut self.state, repeat);
            }
            GamePhase::Playing => self.submit(),
            _ => {}
        }
    }

    pub fn snapshot(&self, now_ms: f64) -> Snapshot {
        Snapshot::capture(&self.state, now_ms, self.high_score(), self.sound_enabled())
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    fn on_game_over(&mut self) {
        let GameConfig { mode, difficulty } = self.state.config;
        let score = self.state.score;
        if self.high_scores.record(mode, difficulty, score) {
            log::info!("New high score {} ({} {})", score, mode.as_str(), difficulty.as_str());
            self.state.push_event(GameEvent::NewHighScore { score });
            if let Err(err) = self.high_scores.save(&mut *self.store) {
                log::warn!("Failed to save high scores: {err}");
            }
        }
    }

    fn persist_settings(&mut self) {
        if let Err(err) = self.settings.save(&mut *self.store) {
            log::warn!("Failed to save settings: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYFIELD_HEIGHT;
    use crate::persistence::MemoryStore;
    use crate::sim::{Task, TaskCategory};
    use crate::tuning::{Difficulty, GameMode};
    use glam::Vec2;

    fn session() -> Session {
        Session::new(Box::new(MemoryStore::new()), 77)
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut s = session();
        assert_eq!(s.phase(), GamePhase::Menu);

        // Pause/resume do nothing outside a run
        s.pause();
        s.resume();
        assert_eq!(s.phase(), GamePhase::Menu);

        s.start();
        assert_eq!(s.phase(), GamePhase::Playing);
        s.toggle_pause();
        assert_eq!(s.phase(), GamePhase::Paused);
        s.start(); // start only works from the menu
        assert_eq!(s.phase(), GamePhase::Paused);
        s.toggle_pause();
        assert_eq!(s.phase(), GamePhase::Playing);

        s.exit_to_menu();
        assert_eq!(s.phase(), GamePhase::Menu);
        s.restart(); // restart needs a run
        assert_eq!(s.phase(), GamePhase::Menu);

        s.open_tutorial();
        assert_eq!(s.phase(), GamePhase::Tutorial);
        s.start();
        assert_eq!(s.phase(), GamePhase::Tutorial);
        s.handle_key(Key::Escape);
        assert_eq!(s.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_configure_only_in_menu() {
        let mut s = session();
        let config = GameConfig::new(GameMode::PlainNumber, Difficulty::Hard);
        assert!(s.configure(config).is_ok());
        assert_eq!(s.config(), config);
        assert_eq!(s.settings().difficulty, Difficulty::Hard);

        s.start();
        assert_eq!(
            s.configure(GameConfig::default()),
            Err(ConfigError::Locked {
                phase: GamePhase::Playing
            })
        );
        assert_eq!(s.config(), config);
    }

    #[test]
    fn test_keys() {
        let mut s = session();
        s.start();
        s.handle_key_event("P", Modifiers::default());
        assert_eq!(s.phase(), GamePhase::Paused);

        // Lowercase and modified presses are not shortcuts
        s.handle_key_event("p", Modifiers::default());
        s.handle_key_event(
            "P",
            Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        );
        assert_eq!(s.phase(), GamePhase::Paused);

        s.handle_key_event("R", Modifiers::default());
        assert_eq!(s.phase(), GamePhase::Playing);

        assert!(s.sound_enabled());
        s.handle_key_event("M", Modifiers::default());
        assert!(!s.sound_enabled());
        assert!(s.drain_events().contains(&GameEvent::SoundToggled { enabled: false }));
    }

    #[test]
    fn test_game_over_records_high_score() {
        let mut s = session();
        s.start();
        s.state.score = 420;
        s.state.health = 10;
        s.state.last_spawn_ms = Some(0.0);
        let id = s.state.next_entity_id();
        s.state.tasks.push(Task::new(
            id,
            Vec2::new(0.0, PLAYFIELD_HEIGHT),
            1.0,
            "1",
            "1",
            TaskCategory::PlainNumber,
        ));

        s.tick(1.0);
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert_eq!(s.high_score(), 420);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::GameOver { score: 420 }));
        assert!(events.contains(&GameEvent::NewHighScore { score: 420 }));

        // Persisted: a new session on the same store sees it
        let store = std::mem::replace(&mut s.store, Box::new(MemoryStore::new()));
        let reloaded = Session::new(store, 1);
        assert_eq!(reloaded.high_score(), 420);

        // Further ticks don't re-record
        s.tick(2.0);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_restart_matches_fresh_start() {
        let mut fresh = session();
        fresh.start();

        let mut s = session();
        s.start();
        for frame in 0..600 {
            s.tick(frame as f64 * 16.0);
        }
        s.on_input_change("1", 9_600.0);
        s.restart();

        let a = s.state();
        let b = fresh.state();
        assert_eq!(a.phase, b.phase);
        assert_eq!((a.score, a.health, a.level), (b.score, b.health, b.level));
        assert_eq!(a.input, b.input);
        assert_eq!(a.tasks, b.tasks);
        assert_eq!(a.effects, b.effects);
        assert_eq!(a.last_spawn_ms, b.last_spawn_ms);
        assert!(a.particles.is_empty());

        // Same seed, same first spawn
        s.tick(0.0);
        fresh.tick(0.0);
        assert_eq!(s.state().tasks, fresh.state().tasks);
        for frame in 1..2000 {
            let now = frame as f64 * 16.0;
            s.tick(now);
            fresh.tick(now);
        }
        assert_eq!(s.state().tasks, fresh.state().tasks);
        assert_eq!(s.state().rng, fresh.state().rng);
    }

    #[test]
    fn test_tutorial_walkthrough() {
        let mut s = session();
        s.open_tutorial();
        assert_eq!(s.phase(), GamePhase::Tutorial);

        // Held Enter doesn't skip pages
        let held = Modifiers {
            repeat: true,
            ..Modifiers::default()
        };
        s.handle_key_event("Enter", held);
        assert_eq!(s.state().tutorial.step, 0);

        for _ in 0..3 {
            s.handle_key_event("Enter", Modifiers::default());
        }
        assert_eq!(s.state().tutorial.step, 3);

        // Typing drives the drill and never lands in the buffer
        assert_eq!(s.on_input_change("9", 0.0), InputOutcome::Stored);
        assert!(s.state().tutorial.is_error(100.0));
        assert!(s.state().input.is_empty());

        s.tutorial_back();
        assert_eq!(s.state().tutorial.step, 2);
        s.handle_key(Key::Enter);

        let mut now = 1_000.0;
        while let Some(c) = s.state().tutorial.target_char() {
            s.on_input_change(&c.to_string(), now);
            now += 50.0;
        }
        assert_eq!(s.state().tutorial.step, 6);
        s.handle_key(Key::Enter);
        assert_eq!(s.phase(), GamePhase::Menu);
        assert!(s.drain_events().contains(&GameEvent::TutorialCompleted));

        // Reopening starts from the first page
        s.open_tutorial();
        assert_eq!(s.state().tutorial.step, 0);
    }

    #[test]
    fn test_enter_submits_during_play() {
        let mut s = session();
        s.start();
        s.state.input = "4".to_string();
        s.handle_key_event("Enter", Modifiers::default());
        assert!(s.state().input.is_empty());
    }

    #[test]
    fn test_disabling_particles() {
        let mut s = session();
        s.update_settings(Settings {
            particles: false,
            ..Settings::default()
        });
        assert_eq!(s.state().particles.cap(), 0);
    }
}
