//! Read-only view of the session for the presentation layer
//!
//! Captured after each tick or input change; renderers never touch `GameState`.

use serde::Serialize;

use crate::consts::LEVEL_THRESHOLD;
use crate::normalize_input;
use crate::sim::tutorial::{STEPS, TutorialStep};
use crate::sim::{Finger, GamePhase, GameState, Particle, PowerUp};
use crate::tuning::{Difficulty, GameMode};

/// One task as it should be drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub color: u32,
    pub power_up: Option<PowerUp>,
    /// Badge text for the carried power-up
    pub badge: Option<&'static str>,
    /// Current input is a prefix of this task's answer (highlight)
    pub matching: bool,
}

/// Tutorial page as it should be drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorialView {
    pub step: usize,
    pub step_count: usize,
    pub page: TutorialStep,
    pub target: Option<char>,
    pub finger: Option<Finger>,
    /// Characters of the drill already typed
    pub typed: usize,
    pub error: bool,
    pub wrong_char: Option<char>,
}

/// Remaining time on each effect in ms (0 = inactive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EffectTimers {
    pub slow_ms: f64,
    pub shield_ms: f64,
    pub double_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub score: u64,
    pub health: i32,
    pub level: u32,
    /// Points earned inside the current level
    pub level_progress: u64,
    /// Points a level spans
    pub level_span: u64,
    pub input: String,
    pub input_error: bool,
    pub tasks: Vec<TaskView>,
    pub particles: Vec<Particle>,
    pub effects: EffectTimers,
    /// Best score for the current mode and difficulty
    pub high_score: u64,
    pub sound_enabled: bool,
    /// Present while the tutorial is open
    pub tutorial: Option<TutorialView>,
}

impl Snapshot {
    pub fn capture(state: &GameState, now_ms: f64, high_score: u64, sound_enabled: bool) -> Self {
        let typed = normalize_input(&state.input);
        let tasks = state
            .tasks
            .iter()
            .map(|t| TaskView {
                id: t.id,
                x: t.pos.x,
                y: t.pos.y,
                text: t.text.clone(),
                color: t.color(),
                power_up: t.power_up,
                badge: t.power_up.map(|p| p.label()),
                matching: !typed.is_empty() && t.accepts_prefix(&typed),
            })
            .collect();

        let tutorial = (state.phase == GamePhase::Tutorial).then(|| {
            let tut = &state.tutorial;
            TutorialView {
                step: tut.step,
                step_count: STEPS.len(),
                page: *tut.current(),
                target: tut.target_char(),
                finger: tut.active_finger(),
                typed: tut.sequence_index,
                error: tut.is_error(now_ms),
                wrong_char: tut.wrong_char,
            }
        });

        let level_floor = (state.level as u64 - 1) * LEVEL_THRESHOLD;

        Self {
            phase: state.phase,
            mode: state.config.mode,
            difficulty: state.config.difficulty,
            score: state.score,
            health: state.health,
            level: state.level,
            level_progress: state.score.saturating_sub(level_floor),
            level_span: LEVEL_THRESHOLD,
            input: state.input.clone(),
            input_error: state.input_error(now_ms),
            tasks,
            particles: state.particles.iter().copied().collect(),
            effects: EffectTimers {
                slow_ms: state.effects.remaining_ms(PowerUp::Slow, now_ms),
                shield_ms: state.effects.remaining_ms(PowerUp::Shield, now_ms),
                double_ms: state.effects.remaining_ms(PowerUp::Double, now_ms),
            },
            high_score,
            sound_enabled,
            tutorial,
        }
    }

    /// Level progress as a fraction in [0, 1]
    pub fn level_fraction(&self) -> f32 {
        (self.level_progress as f32 / self.level_span as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Task, TaskCategory};
    use crate::tuning::GameConfig;
    use glam::Vec2;

    #[test]
    fn test_capture_marks_matching_tasks() {
        let mut state = GameState::new(5, GameConfig::default());
        state.begin_run();
        for answer in ["56", "27"] {
            let id = state.next_entity_id();
            state
                .tasks
                .push(Task::new(id, Vec2::new(10.0, 20.0), 1.0, answer, answer, TaskCategory::Arithmetic));
        }
        state.input = "5".to_string();

        let snap = Snapshot::capture(&state, 0.0, 0, true);
        assert_eq!(snap.tasks.len(), 2);
        assert!(snap.tasks[0].matching);
        assert!(!snap.tasks[1].matching);
        assert_eq!((snap.tasks[0].x, snap.tasks[0].y), (10.0, 20.0));
    }

    #[test]
    fn test_level_progress_and_timers() {
        let mut state = GameState::new(5, GameConfig::default());
        state.begin_run();
        state.level = 2;
        state.score = 750;
        state.effects.activate(PowerUp::Slow, 1_000.0);

        let snap = Snapshot::capture(&state, 3_000.0, 900, false);
        assert_eq!(snap.level_progress, 250);
        assert!((snap.level_fraction() - 0.5).abs() < 1e-6);
        assert_eq!(snap.effects.slow_ms, 8_000.0);
        assert_eq!(snap.effects.shield_ms, 0.0);
        assert_eq!(snap.high_score, 900);
        assert!(!snap.sound_enabled);
    }

    #[test]
    fn test_power_up_badge() {
        let mut state = GameState::new(5, GameConfig::default());
        state.begin_run();
        let id = state.next_entity_id();
        state.tasks.push(
            Task::new(id, Vec2::ZERO, 1.0, "3", "3", TaskCategory::PlainNumber)
                .with_power_up(PowerUp::Double),
        );
        let snap = Snapshot::capture(&state, 0.0, 0, true);
        assert_eq!(snap.tasks[0].badge, Some("2X"));
        assert_eq!(snap.tasks[0].color, PowerUp::Double.color());
        assert!(snap.tutorial.is_none());
    }

    #[test]
    fn test_tutorial_view() {
        let mut state = GameState::new(5, GameConfig::default());
        state.phase = GamePhase::Tutorial;
        state.tutorial.step = 4;
        state.tutorial.sequence_index = 2;

        let snap = Snapshot::capture(&state, 0.0, 0, true);
        let view = snap.tutorial.unwrap();
        assert_eq!(view.step_count, 7);
        assert_eq!(view.page.key, "right_hand");
        assert_eq!(view.target, Some('8'));
        assert_eq!(view.finger, Some(Finger::RightMiddle));
        assert_eq!(view.typed, 2);
        assert!(!view.error);
    }
}
