//! Task generation
//!
//! Total for every (level, difficulty, mode); draws only from the RNG it is given.

use glam::Vec2;
use rand::Rng;

use super::state::{PowerUp, Task, TaskCategory};
use crate::consts::*;
use crate::text_width;
use crate::tuning::{Difficulty, DifficultyTuning, GameMode, Operator};

/// Build a new task at the top of the playfield
pub fn generate_task<R: Rng + ?Sized>(
    rng: &mut R,
    id: u32,
    level: u32,
    difficulty: Difficulty,
    mode: GameMode,
) -> Task {
    let tuning = difficulty.tuning();
    let speed = difficulty.task_speed(level);

    let (text, answer, category) = match mode {
        GameMode::PlainNumber => {
            let text = plain_number(rng, tuning).to_string();
            (text.clone(), text, TaskCategory::PlainNumber)
        }
        GameMode::Arithmetic => {
            let (text, answer) = arithmetic_problem(rng, tuning);
            (text, answer.to_string(), TaskCategory::Arithmetic)
        }
    };

    let x = spawn_x(rng, &text);
    let mut task = Task::new(id, Vec2::new(x, SPAWN_Y), speed, text, answer, category);
    task.power_up = roll_power_up(rng);
    task
}

/// Uniform number with a digit count drawn from the tier's range
fn plain_number<R: Rng + ?Sized>(rng: &mut R, tuning: &DifficultyTuning) -> u32 {
    let (lo, hi) = tuning.digits;
    let digits = rng.random_range(lo..=hi);
    let min = if digits == 1 { 1 } else { 10u32.pow(digits - 1) };
    let max = 10u32.pow(digits) - 1;
    rng.random_range(min..=max)
}

/// Returns (display text, integer answer)
fn arithmetic_problem<R: Rng + ?Sized>(rng: &mut R, tuning: &DifficultyTuning) -> (String, i64) {
    let op = tuning.operators[rng.random_range(0..tuning.operators.len())];
    let (a_lo, a_hi) = tuning.first_operand;
    let (b_lo, b_hi) = tuning.second_operand;
    let mut a = rng.random_range(a_lo..=a_hi);
    let mut b = rng.random_range(b_lo..=b_hi);

    match op {
        Operator::Div => {
            // Divisor and quotient first so the division is always exact
            let quotient = rng.random_range(a_lo..=a_hi);
            a = b * quotient;
        }
        Operator::Sub if tuning.ordered_subtraction && a < b => {
            std::mem::swap(&mut a, &mut b);
        }
        _ => {}
    }

    let text = format!("{} {} {}", a, op.symbol(), b);
    (text, op.apply(a, b))
}

/// Random x that keeps the whole text inside the playfield margins
pub fn spawn_x<R: Rng + ?Sized>(rng: &mut R, text: &str) -> f32 {
    let min = SPAWN_MARGIN as i32;
    let max = ((PLAYFIELD_WIDTH - text_width(text) - SPAWN_MARGIN) as i32).max(min);
    rng.random_range(min..=max) as f32
}

fn roll_power_up<R: Rng + ?Sized>(rng: &mut R) -> Option<PowerUp> {
    if rng.random_bool(POWER_UP_CHANCE) {
        Some(PowerUp::ALL[rng.random_range(0..PowerUp::ALL.len())])
    } else {
        None
    }
}
