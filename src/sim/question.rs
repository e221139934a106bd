//! Addition question generation
//!
//! Questions are two non-negative operands whose sum always fits on the
//! single-digit answer pad.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::DIGIT_MAX;

/// A single addition problem (immutable once generated)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Question {
    pub x: u8,
    pub y: u8,
    /// Precomputed `x + y`
    pub answer: u8,
}

impl Question {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y, answer: x + y }
    }

    #[inline]
    pub fn is_correct(&self, digit: u8) -> bool {
        digit == self.answer
    }
}

/// Draw a fresh question: `x` uniform in `[0, 9]`, then `y` uniform in `[0, 9 - x]`.
///
/// Each call is independent; repeats are allowed.
pub fn generate_question<R: Rng + ?Sized>(rng: &mut R) -> Question {
    let x = rng.random_range(0..=DIGIT_MAX);
    let y = rng.random_range(0..=DIGIT_MAX - x);
    Question::new(x, y)
}
