//! Game state and core session types
//!
//! One `GameState` lives for the whole game; each level attempt resets the
//! session part of it (stars, countdown, question, answer).

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::question::{Question, generate_question};
use super::timer::Countdown;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first "Start"
    #[default]
    Start,
    /// Question on screen, countdown running
    Playing,
    /// Level cleared with three stars
    Win,
    /// Countdown ran out
    Lose,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::Playing => "playing",
            GamePhase::Win => "win",
            GamePhase::Lose => "lose",
        }
    }

    /// Label of the begin/retry/next-level button for this phase
    pub fn action_label(&self) -> Option<&'static str> {
        match self {
            GamePhase::Start => Some("Start"),
            GamePhase::Playing => None,
            GamePhase::Win => Some("Next Level"),
            GamePhase::Lose => Some("Retry"),
        }
    }

    /// Win and Lose end the level attempt
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Win | GamePhase::Lose)
    }
}

/// The last digit submitted for the current question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub digit: u8,
    pub correct: bool,
}

/// Something that happened during a step (for logging and front-end cues)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    AnswerCorrect { digit: u8, stars: u8 },
    AnswerWrong { digit: u8, expected: u8 },
    QuestionAdvanced { x: u8, y: u8 },
    LevelWon { level: u32 },
    TimeUp { level: u32, stars: u8 },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Current level (1-based, only ever increases)
    pub level: u32,
    /// Stars earned in the current level attempt, in `[0, WIN_STARS]`
    pub stars: u8,
    /// Question on screen
    pub question: Question,
    /// Last submission for `question`, if any
    pub answer: Option<AnswerRecord>,
    /// Level countdown
    pub countdown: Countdown,
    rng: Pcg32,
}

impl GameState {
    /// Create a new game state in the Start phase
    pub fn new(seed: u64, level_duration_secs: f64) -> Self {
        Self {
            seed,
            phase: GamePhase::Start,
            level: FIRST_LEVEL,
            stars: 0,
            question: Question::default(),
            answer: None,
            countdown: Countdown::new(level_duration_secs),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// True once the current question has been answered correctly
    #[inline]
    pub fn answered_correctly(&self) -> bool {
        self.answer.is_some_and(|a| a.correct)
    }

    /// Replace the question and clear the answer record
    pub fn new_question(&mut self) {
        self.question = generate_question(&mut self.rng);
        self.answer = None;
    }

    /// Reset the session and enter Playing at the current level
    pub fn start_level(&mut self, now_ms: f64) {
        self.stars = 0;
        self.countdown.start(now_ms);
        self.new_question();
        self.phase = GamePhase::Playing;
    }
}
