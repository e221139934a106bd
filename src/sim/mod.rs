//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time arrives as explicit timestamps, never read from a clock
//! - Inputs applied one at a time, in arrival order
//! - No rendering or platform dependencies

pub mod question;
pub mod state;
pub mod tick;
pub mod timer;

pub use question::{Question, generate_question};
pub use state::{AnswerRecord, GameEvent, GamePhase, GameState};
pub use tick::{Input, step};
pub use timer::{Countdown, TimerStatus};
