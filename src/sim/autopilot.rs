//! Idle/demo player
//!
//! Types the answer of the most dangerous task one character at a time.
//! Used for the attract loop and headless runs.

use super::state::{GamePhase, GameState, Task};
use crate::normalize_input;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Minimum time between keystrokes
    pub typing_interval_ms: f64,
    last_key_ms: Option<f64>,
}

impl Autopilot {
    pub fn new(typing_interval_ms: f64) -> Self {
        Self {
            typing_interval_ms,
            last_key_ms: None,
        }
    }

    /// Next raw value for the input field, or None to leave it alone this frame
    pub fn next_input(&mut self, state: &GameState, now_ms: f64) -> Option<String> {
        if state.phase != GamePhase::Playing {
            return None;
        }
        if self
            .last_key_ms
            .is_some_and(|last| now_ms - last < self.typing_interval_ms)
        {
            return None;
        }

        let typed = normalize_input(&state.input);
        let target = pick_target(state, &typed)?;

        // Continue the current answer, or start over on the target
        let next: String = if !typed.is_empty() && target.answer.starts_with(&typed) {
            let count = typed.chars().count() + 1;
            target.answer.chars().take(count).collect()
        } else {
            target.answer.chars().take(1).collect()
        };

        self.last_key_ms = Some(now_ms);
        Some(next)
    }
}

/// Lowest task already being typed, otherwise the lowest task overall
fn pick_target<'a>(state: &'a GameState, typed: &str) -> Option<&'a Task> {
    let lowest = |a: &&Task, b: &&Task| {
        a.pos
            .y
            .partial_cmp(&b.pos.y)
            .unwrap_or(std::cmp::Ordering::Equal)
    };

    if !typed.is_empty() {
        let in_progress = state
            .tasks
            .iter()
            .filter(|t| t.accepts_prefix(typed))
            .max_by(lowest);
        if in_progress.is_some() {
            return in_progress;
        }
    }
    state.tasks.iter().max_by(lowest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::{InputOutcome, on_input_change};
    use crate::sim::state::TaskCategory;
    use crate::tuning::GameConfig;
    use glam::Vec2;

    #[test]
    fn test_types_lowest_task() {
        let mut state = GameState::new(3, GameConfig::default());
        state.begin_run();
        let high = state.next_entity_id();
        state.tasks.push(Task::new(high, Vec2::new(0.0, 10.0), 1.0, "9", "9", TaskCategory::PlainNumber));
        let low = state.next_entity_id();
        state.tasks.push(Task::new(low, Vec2::new(0.0, 400.0), 1.0, "40 + 2", "42", TaskCategory::Arithmetic));

        let mut pilot = Autopilot::new(50.0);
        let first = pilot.next_input(&state, 0.0);
        assert_eq!(first.as_deref(), Some("4"));
        on_input_change(&mut state, "4", 0.0);

        // Rate limited
        assert_eq!(pilot.next_input(&state, 10.0), None);

        let second = pilot.next_input(&state, 60.0).unwrap_or_default();
        assert_eq!(second, "42");
        assert_eq!(
            on_input_change(&mut state, &second, 60.0),
            InputOutcome::Solved { id: low, points: 10 }
        );
    }

    #[test]
    fn test_idle_outside_gameplay() {
        let state = GameState::new(3, GameConfig::default());
        let mut pilot = Autopilot::new(0.0);
        assert_eq!(pilot.next_input(&state, 0.0), None);
    }
}
