//! Per-frame simulation tick
//!
//! Advances the simulation by one animation frame. Movement is per frame,
//! spawning is paced by the wall-clock timestamp passed in.
//! Order within a tick: spawn, move, collide, particles.

use super::generate::generate_task;
use super::state::{GameEvent, GamePhase, GameState, PowerUp, Task};
use crate::consts::*;

/// Advance the game state by one frame at timestamp `now_ms`
pub fn tick(state: &mut GameState, now_ms: f64) {
    // Don't tick unless a run is live
    if state.phase != GamePhase::Playing {
        return;
    }

    let interval = state.config.difficulty.spawn_interval_ms(state.level);
    if state.last_spawn_ms.is_none_or(|last| now_ms - last > interval) {
        spawn_task(state);
        state.last_spawn_ms = Some(now_ms);
    }

    let time_scale = if state.effects.is_active(PowerUp::Slow, now_ms) {
        SLOW_TIME_SCALE
    } else {
        1.0
    };
    let shielded = state.effects.is_active(PowerUp::Shield, now_ms);

    // Walk backwards so removal doesn't disturb unvisited indices
    for i in (0..state.tasks.len()).rev() {
        let task = &mut state.tasks[i];
        task.pos.y += task.speed * time_scale;

        if task.pos.y > PLAYFIELD_HEIGHT {
            let task = state.tasks.remove(i);
            apply_miss(state, &task, shielded);
            if state.phase == GamePhase::GameOver {
                // Physics freezes at the frame health ran out
                return;
            }
        }
    }

    state.particles.update();
}

/// Generate a task for the current level and add it to the live set
pub fn spawn_task(state: &mut GameState) -> u32 {
    let id = state.next_entity_id();
    let GameState {
        rng, config, level, ..
    } = state;
    let task = generate_task(rng, id, *level, config.difficulty, config.mode);
    log::debug!(
        "Spawned task {} {:?} = {:?} at x={} (power-up {:?})",
        id,
        task.text,
        task.answer,
        task.pos.x,
        task.power_up
    );
    state.tasks.push(task);
    state.push_event(GameEvent::TaskSpawned { id });
    id
}

/// A task crossed the bottom edge: damage unless shielded, maybe end the run
fn apply_miss(state: &mut GameState, task: &Task, shielded: bool) {
    let damage = if shielded { 0 } else { MISS_DAMAGE };
    state.push_event(GameEvent::TaskMissed {
        id: task.id,
        damage,
    });
    if damage == 0 {
        return;
    }

    let health = state.health - damage;
    state.health = health.max(0);
    if health <= 0 {
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver { score: state.score });
        log::info!(
            "Game over: score {} at level {} ({} {})",
            state.score,
            state.level,
            state.config.mode.as_str(),
            state.config.difficulty.as_str()
        );
    }
}
