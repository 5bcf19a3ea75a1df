//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Time is always passed in, never read
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod generate;
pub mod input;
pub mod particles;
pub mod state;
pub mod tick;
pub mod tutorial;

pub use autopilot::Autopilot;
pub use generate::{generate_task, spawn_x};
pub use input::{InputOutcome, level_up_due, on_input_change, points_for_solve, solve_task, submit};
pub use particles::{Particle, ParticleField};
pub use state::{ActiveEffects, GameEvent, GamePhase, GameState, PowerUp, Task, TaskCategory};
pub use tick::{spawn_task, tick};
pub use tutorial::{Finger, TutorialOutcome, TutorialState, finger_for, tutorial_enter, tutorial_input};
