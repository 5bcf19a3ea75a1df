//! Typing tutorial
//!
//! A fixed walk through seven steps. Reading steps advance on Enter,
//! drill steps advance once every character of their sequence has been
//! typed in order. A wrong character locks input for a short moment.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::TUTORIAL_ERROR_MS;

/// How a step is cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepAction {
    /// Press Enter to continue
    PressEnter,
    /// Type each character in turn
    TypeSequence(&'static [char]),
}

/// One page of the tutorial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TutorialStep {
    /// Stable key for looking up title and body text
    pub key: &'static str,
    pub action: StepAction,
    pub show_keyboard: bool,
    pub highlight_home_row: bool,
    pub highlight_numbers: bool,
}

const fn reading(key: &'static str) -> TutorialStep {
    TutorialStep {
        key,
        action: StepAction::PressEnter,
        show_keyboard: false,
        highlight_home_row: false,
        highlight_numbers: false,
    }
}

const fn drill(key: &'static str, sequence: &'static [char]) -> TutorialStep {
    TutorialStep {
        key,
        action: StepAction::TypeSequence(sequence),
        show_keyboard: true,
        highlight_home_row: false,
        highlight_numbers: false,
    }
}

pub static STEPS: [TutorialStep; 7] = [
    reading("welcome"),
    TutorialStep {
        show_keyboard: true,
        highlight_home_row: true,
        ..reading("home_row")
    },
    TutorialStep {
        show_keyboard: true,
        highlight_numbers: true,
        ..reading("number_row")
    },
    drill("left_hand", &['1', '2', '3', '4', '5']),
    drill("right_hand", &['6', '7', '8', '9', '0']),
    drill("mixed", &['1', '0', '3', '8', '5', '6']),
    reading("ready"),
];

/// Finger that should strike a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Finger {
    LeftPinky,
    LeftRing,
    LeftMiddle,
    LeftIndex,
    RightIndex,
    RightMiddle,
    RightRing,
    RightPinky,
}

/// Touch-typing finger for a key on a QWERTY layout
pub fn finger_for(key: char) -> Option<Finger> {
    use Finger::*;
    let finger = match key.to_ascii_uppercase() {
        '1' | 'Q' | 'A' | 'Z' => LeftPinky,
        '2' | 'W' | 'S' | 'X' => LeftRing,
        '3' | 'E' | 'D' | 'C' => LeftMiddle,
        '4' | '5' | 'R' | 'T' | 'F' | 'G' | 'V' | 'B' => LeftIndex,
        '6' | '7' | 'Y' | 'U' | 'H' | 'J' | 'N' | 'M' => RightIndex,
        '8' | 'I' | 'K' | ',' => RightMiddle,
        '9' | 'O' | 'L' | '.' => RightRing,
        '0' | 'P' | ';' | '/' => RightPinky,
        _ => return None,
    };
    Some(finger)
}

/// What a tutorial keystroke did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialOutcome {
    /// Not relevant to the current step, or input is locked
    Ignored,
    /// Correct character, more to type in this step
    Accepted,
    /// Wrong character; input locked briefly
    Rejected,
    /// Moved on to the next step
    Advanced,
    /// Last step cleared
    Completed,
}

/// Progress through the tutorial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TutorialState {
    pub step: usize,
    /// Position within the current drill sequence
    pub sequence_index: usize,
    /// Input lock expiry after a wrong character
    pub error_until: Option<f64>,
    /// The wrong character, shown while locked
    pub wrong_char: Option<char>,
}

impl TutorialState {
    pub fn current(&self) -> &'static TutorialStep {
        &STEPS[self.step.min(STEPS.len() - 1)]
    }

    /// Character the player should type next, on drill steps
    pub fn target_char(&self) -> Option<char> {
        match self.current().action {
            StepAction::TypeSequence(sequence) => sequence.get(self.sequence_index).copied(),
            StepAction::PressEnter => None,
        }
    }

    pub fn active_finger(&self) -> Option<Finger> {
        self.target_char().and_then(finger_for)
    }

    pub fn is_error(&self, now_ms: f64) -> bool {
        self.error_until.is_some_and(|until| until > now_ms)
    }

    /// Enter pressed; held-key repeats never advance
    pub fn on_enter(&mut self, repeat: bool) -> TutorialOutcome {
        if repeat || self.current().action != StepAction::PressEnter {
            return TutorialOutcome::Ignored;
        }
        self.next_step()
    }

    /// Text field changed; only the last character counts
    pub fn on_input_change(&mut self, raw: &str, now_ms: f64) -> TutorialOutcome {
        if self.is_error(now_ms) {
            return TutorialOutcome::Ignored;
        }
        let Some(target) = self.target_char() else {
            return TutorialOutcome::Ignored;
        };
        let Some(typed) = raw.chars().last().map(|c| c.to_ascii_uppercase()) else {
            return TutorialOutcome::Ignored;
        };

        self.error_until = None;
        self.wrong_char = None;
        if typed != target {
            self.error_until = Some(now_ms + TUTORIAL_ERROR_MS);
            self.wrong_char = Some(typed);
            return TutorialOutcome::Rejected;
        }

        let length = match self.current().action {
            StepAction::TypeSequence(sequence) => sequence.len(),
            StepAction::PressEnter => 0,
        };
        if self.sequence_index + 1 >= length {
            self.next_step()
        } else {
            self.sequence_index += 1;
            TutorialOutcome::Accepted
        }
    }

    /// Back one step; no-op on the first
    pub fn prev(&mut self) -> bool {
        if self.step == 0 {
            return false;
        }
        self.step -= 1;
        self.reset_step();
        true
    }

    fn next_step(&mut self) -> TutorialOutcome {
        if self.step + 1 >= STEPS.len() {
            return TutorialOutcome::Completed;
        }
        self.step += 1;
        self.reset_step();
        TutorialOutcome::Advanced
    }

    fn reset_step(&mut self) {
        self.sequence_index = 0;
        self.error_until = None;
        self.wrong_char = None;
    }
}

/// Route a text field change while the tutorial is open
pub fn tutorial_input(state: &mut GameState, raw: &str, now_ms: f64) -> TutorialOutcome {
    if state.phase != GamePhase::Tutorial {
        return TutorialOutcome::Ignored;
    }
    let outcome = state.tutorial.on_input_change(raw, now_ms);
    apply_outcome(state, outcome);
    outcome
}

/// Route an Enter press while the tutorial is open
pub fn tutorial_enter(state: &mut GameState, repeat: bool) -> TutorialOutcome {
    if state.phase != GamePhase::Tutorial {
        return TutorialOutcome::Ignored;
    }
    let outcome = state.tutorial.on_enter(repeat);
    apply_outcome(state, outcome);
    outcome
}

fn apply_outcome(state: &mut GameState, outcome: TutorialOutcome) {
    match outcome {
        TutorialOutcome::Ignored => {}
        TutorialOutcome::Accepted => state.push_event(GameEvent::TutorialKeyAccepted),
        TutorialOutcome::Rejected => state.push_event(GameEvent::InputRejected),
        TutorialOutcome::Advanced => {
            let step = state.tutorial.step;
            log::debug!("Tutorial step {}", step);
            state.push_event(GameEvent::TutorialAdvanced { step });
        }
        TutorialOutcome::Completed => {
            log::info!("Tutorial completed");
            state.tutorial = TutorialState::default();
            state.phase = GamePhase::Menu;
            state.push_event(GameEvent::TutorialCompleted);
        }
    }
    state.input.clear();
}
