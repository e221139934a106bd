//! Game state machine
//!
//! Applies one input at a time to the game state. Inputs are processed in
//! arrival order, so a frame that runs the clock out before a winning digit
//! arrives ends the level as a loss, and vice versa.

use super::state::{AnswerRecord, GameEvent, GamePhase, GameState};
use super::timer::TimerStatus;
use crate::consts::*;

/// A single external event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// Start / Retry / Next Level, depending on phase
    Begin { now_ms: f64 },
    /// Digit pad press
    SelectDigit(u8),
    /// Advance past a correctly answered question
    NextQuestion,
    /// Display refresh while playing
    Frame { now_ms: f64 },
}

/// Apply one input to the game state, returning what happened.
///
/// Inputs that don't fit the current phase are ignored.
pub fn step(state: &mut GameState, input: Input) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match input {
        Input::Begin { now_ms } => begin(state, now_ms, &mut events),
        Input::SelectDigit(digit) => select_digit(state, digit, &mut events),
        Input::NextQuestion => next_question(state, &mut events),
        Input::Frame { now_ms } => frame(state, now_ms, &mut events),
    }

    events
}

fn begin(state: &mut GameState, now_ms: f64, events: &mut Vec<GameEvent>) {
    match state.phase {
        GamePhase::Start | GamePhase::Lose => {}
        GamePhase::Win => state.level += 1,
        GamePhase::Playing => {
            log::debug!("Begin ignored while playing");
            return;
        }
    }

    state.start_level(now_ms);
    events.push(GameEvent::LevelStarted { level: state.level });
}

fn select_digit(state: &mut GameState, digit: u8, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing {
        log::debug!("Digit {} ignored in phase {}", digit, state.phase.as_str());
        return;
    }
    if digit > DIGIT_MAX {
        log::debug!("Digit {} is off the pad", digit);
        return;
    }
    // Pad is locked once the question is scored
    if state.answered_correctly() {
        return;
    }

    let correct = state.question.is_correct(digit);
    state.answer = Some(AnswerRecord { digit, correct });

    if !correct {
        events.push(GameEvent::AnswerWrong {
            digit,
            expected: state.question.answer,
        });
        return;
    }

    state.stars = (state.stars + 1).min(WIN_STARS);
    events.push(GameEvent::AnswerCorrect {
        digit,
        stars: state.stars,
    });

    if state.stars >= WIN_STARS {
        state.countdown.cancel();
        state.phase = GamePhase::Win;
        events.push(GameEvent::LevelWon { level: state.level });
    }
}

fn next_question(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing || !state.answered_correctly() {
        log::debug!("Next question not available");
        return;
    }

    state.new_question();
    events.push(GameEvent::QuestionAdvanced {
        x: state.question.x,
        y: state.question.y,
    });
}

fn frame(state: &mut GameState, now_ms: f64, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing {
        return;
    }

    if state.countdown.update(now_ms) == TimerStatus::Expired {
        state.phase = GamePhase::Lose;
        events.push(GameEvent::TimeUp {
            level: state.level,
            stars: state.stars,
        });
    }
}
