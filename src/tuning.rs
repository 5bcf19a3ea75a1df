//! Data-driven game balance
//!
//! Everything that differs between difficulty tiers lives in one table so
//! the generator and the tick never branch on difficulty directly.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{MIN_SPAWN_INTERVAL_MS, SPAWN_INTERVAL_STEP_MS};
use crate::error::ConfigError;

/// Which kind of task falls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// "CPU Overload": solve small arithmetic problems
    #[default]
    Arithmetic,
    /// "Data Stream": retype plain numbers
    PlainNumber,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Arithmetic, GameMode::PlainNumber];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Arithmetic => "arithmetic",
            GameMode::PlainNumber => "numbers",
        }
    }
}

impl FromStr for GameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "arithmetic" | "math" | "cpu" => Ok(GameMode::Arithmetic),
            "numbers" | "plain" | "plain-number" | "stream" => Ok(GameMode::PlainNumber),
            _ => Err(ConfigError::UnknownMode {
                name: s.to_string(),
            }),
        }
    }
}

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Balance table entry for this tier
    pub fn tuning(&self) -> &'static DifficultyTuning {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
        }
    }

    /// Fall speed (distance per tick) for a task spawned at `level`
    pub fn task_speed(&self, level: u32) -> f32 {
        let t = self.tuning();
        t.speed_base + level as f32 * t.speed_inc
    }

    /// Milliseconds between spawns at `level`, floored at 500ms
    pub fn spawn_interval_ms(&self, level: u32) -> f64 {
        let base = self.tuning().spawn_rate_ms;
        (base - level as f64 * SPAWN_INTERVAL_STEP_MS).max(MIN_SPAWN_INTERVAL_MS)
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty {
                name: s.to_string(),
            }),
        }
    }
}

/// Mode and difficulty, chosen in the menu and fixed for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
}

impl GameConfig {
    pub fn new(mode: GameMode, difficulty: Difficulty) -> Self {
        Self { mode, difficulty }
    }
}

/// Arithmetic operators a task can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Symbol shown in the task text
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '×',
            Operator::Div => '÷',
        }
    }

    /// Exact result. Callers guarantee `b` divides `a` for `Div`.
    pub fn apply(&self, a: i64, b: i64) -> i64 {
        match self {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div => a / b,
        }
    }
}

/// Per-difficulty balance values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyTuning {
    /// Spawn interval at level 0, before the per-level tightening
    pub spawn_rate_ms: f64,
    pub speed_base: f32,
    pub speed_inc: f32,
    /// Digit count for plain-number tasks (inclusive range)
    pub digits: (u32, u32),
    /// Operators drawn uniformly for arithmetic tasks
    pub operators: &'static [Operator],
    pub first_operand: (i64, i64),
    pub second_operand: (i64, i64),
    /// Reorder subtraction operands so the result is never negative
    pub ordered_subtraction: bool,
}

const ALL_OPERATORS: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];
const ADDITIVE_OPERATORS: [Operator; 2] = [Operator::Add, Operator::Sub];

static EASY: DifficultyTuning = DifficultyTuning {
    spawn_rate_ms: 2500.0,
    speed_base: 0.5,
    speed_inc: 0.1,
    digits: (1, 1),
    operators: &ALL_OPERATORS,
    first_operand: (1, 9),
    second_operand: (1, 9),
    ordered_subtraction: true,
};

static MEDIUM: DifficultyTuning = DifficultyTuning {
    spawn_rate_ms: 3500.0,
    speed_base: 0.4,
    speed_inc: 0.1,
    digits: (2, 2),
    operators: &ADDITIVE_OPERATORS,
    first_operand: (10, 99),
    second_operand: (1, 9),
    ordered_subtraction: false,
};

// Slowest cadence, widest values
static HARD: DifficultyTuning = DifficultyTuning {
    spawn_rate_ms: 6000.0,
    speed_base: 0.2,
    speed_inc: 0.1,
    digits: (1, 3),
    operators: &ADDITIVE_OPERATORS,
    first_operand: (100, 999),
    second_operand: (1, 9),
    ordered_subtraction: false,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" HARD ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("stream".parse::<GameMode>(), Ok(GameMode::PlainNumber));
        assert_eq!("arithmetic".parse::<GameMode>(), Ok(GameMode::Arithmetic));

        for d in Difficulty::ALL {
            assert_eq!(d.as_str().parse::<Difficulty>(), Ok(d));
        }
        for m in GameMode::ALL {
            assert_eq!(m.as_str().parse::<GameMode>(), Ok(m));
        }
    }

    #[test]
    fn test_unknown_names_fail_fast() {
        assert!(matches!(
            "insane".parse::<Difficulty>(),
            Err(ConfigError::UnknownDifficulty { .. })
        ));
        assert!(matches!(
            "".parse::<GameMode>(),
            Err(ConfigError::UnknownMode { .. })
        ));
    }

    #[test]
    fn test_spawn_interval_tightens_and_floors() {
        assert_eq!(Difficulty::Easy.spawn_interval_ms(1), 2400.0);
        assert_eq!(Difficulty::Medium.spawn_interval_ms(5), 3000.0);
        assert_eq!(Difficulty::Easy.spawn_interval_ms(100), 500.0);

        let mut prev = f64::MAX;
        for level in 1..80 {
            let interval = Difficulty::Hard.spawn_interval_ms(level);
            assert!(interval <= prev);
            assert!(interval >= 500.0);
            prev = interval;
        }
    }

    #[test]
    fn test_task_speed() {
        assert!((Difficulty::Easy.task_speed(1) - 0.6).abs() < 1e-6);
        assert!((Difficulty::Hard.task_speed(3) - 0.5).abs() < 1e-6);
        // Hard starts slowest
        assert!(Difficulty::Hard.task_speed(1) < Difficulty::Medium.task_speed(1));
        assert!(Difficulty::Medium.task_speed(1) < Difficulty::Easy.task_speed(1));
    }

    #[test]
    fn test_operator_apply() {
        assert_eq!(Operator::Add.apply(7, 8), 15);
        assert_eq!(Operator::Sub.apply(3, 8), -5);
        assert_eq!(Operator::Mul.apply(7, 8), 56);
        assert_eq!(Operator::Div.apply(56, 8), 7);
    }
}
