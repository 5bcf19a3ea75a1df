//! Incremental input matching, scoring and leveling
//!
//! Every change to the raw text field is run through `on_input_change`.
//! The buffer is only ever a valid prefix of some live answer, empty, or
//! (outside gameplay) whatever the player typed.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState, PowerUp};
use crate::consts::*;
use crate::normalize_input;
use crate::tuning::GameMode;

/// What a single input change did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Not playing: stored verbatim, no matching
    Stored,
    /// Longer than any possible answer; buffer left unchanged
    TooLong,
    /// Not a prefix of any live answer; buffer cleared, error flag raised
    Rejected,
    /// Buffer is empty after normalization
    Empty,
    /// Valid prefix, typing in progress
    Partial,
    /// Exact match, task cleared
    Solved { id: u32, points: u64 },
}

/// Handle a change of the raw input field
pub fn on_input_change(state: &mut GameState, raw: &str, now_ms: f64) -> InputOutcome {
    if state.phase != GamePhase::Playing {
        state.input = raw.to_string();
        return InputOutcome::Stored;
    }

    if state.config.mode == GameMode::PlainNumber && raw.chars().count() > PLAIN_NUMBER_MAX_INPUT {
        return InputOutcome::TooLong;
    }

    let normalized = normalize_input(raw);
    if normalized.is_empty() {
        state.input = raw.to_string();
        return InputOutcome::Empty;
    }

    if !state.tasks.iter().any(|t| t.accepts_prefix(&normalized)) {
        log::debug!("Rejected input {:?}", normalized);
        state.input.clear();
        state.input_error_until = Some(now_ms + INPUT_ERROR_MS);
        state.push_event(GameEvent::InputRejected);
        return InputOutcome::Rejected;
    }

    state.input = raw.to_string();

    // Duplicate answers resolve to the earliest spawned task
    match state.tasks.iter().position(|t| t.answer == normalized) {
        Some(index) => {
            let id = state.tasks[index].id;
            let points = solve_task(state, index, now_ms);
            InputOutcome::Solved { id, points }
        }
        None => InputOutcome::Partial,
    }
}

/// Enter pressed: discard whatever is typed
pub fn submit(state: &mut GameState) {
    if state.phase == GamePhase::Playing && !state.input.is_empty() {
        state.input.clear();
    }
}

/// Points for one solve
pub fn points_for_solve(level: u32, double_active: bool) -> u64 {
    let multiplier = if double_active { 2 } else { 1 };
    BASE_POINTS * level as u64 * multiplier
}

/// Level-up rule, checked once per solve against the post-solve score
pub fn level_up_due(score_before: u64, points: u64, level: u32) -> bool {
    score_before + points > level as u64 * LEVEL_THRESHOLD
}

/// Clear the task at `index`: heal, apply its power-up, score, maybe level up.
/// Returns the points awarded.
pub fn solve_task(state: &mut GameState, index: usize, now_ms: f64) -> u64 {
    let task = state.tasks.remove(index);

    state.particles.burst(
        task.pos + Vec2::new(EXPLOSION_OFFSET_X, EXPLOSION_OFFSET_Y),
        task.color(),
    );

    // Multiplier is read before this task's own power-up takes effect
    let double_active = state.effects.is_active(PowerUp::Double, now_ms);

    let mut heal = SOLVE_HEAL;
    if let Some(kind) = task.power_up {
        heal += POWER_UP_HEAL;
        let until_ms = state.effects.activate(kind, now_ms);
        state.push_event(GameEvent::PowerUpActivated { kind, until_ms });
    }
    state.heal(heal);

    let points = points_for_solve(state.level, double_active);
    let score_before = state.score;
    state.score += points;
    log::debug!("Solved task {} for {} points", task.id, points);
    state.push_event(GameEvent::TaskSolved {
        id: task.id,
        points,
        power_up: task.power_up,
    });

    if level_up_due(score_before, points, state.level) {
        state.level += 1;
        state.heal(LEVEL_UP_HEAL);
        log::info!("Level up: {} (score {})", state.level, state.score);
        state.push_event(GameEvent::LevelUp { level: state.level });
    }

    state.input.clear();
    points
}
