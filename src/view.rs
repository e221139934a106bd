//! Read-only display snapshot
//!
//! Front-ends render from a `HudView` and never touch `GameState` directly.

use serde::{Deserialize, Serialize};

use crate::consts::WIN_STARS;
use crate::sim::{AnswerRecord, GamePhase, GameState};

/// One of the star slots above the equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StarSlot {
    Earned,
    Empty,
}

/// Everything a front-end needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub phase: GamePhase,
    pub level: u32,
    /// "Level N"
    pub level_label: String,
    pub x: u8,
    pub y: u8,
    /// Submitted digit and whether it was right
    pub answer: Option<AnswerRecord>,
    pub stars: Vec<StarSlot>,
    pub time_remaining_secs: f64,
    /// `[0, 1]`, drives the countdown ring
    pub time_fraction: f64,
    /// Digit pad accepts presses
    pub pad_enabled: bool,
    /// Next-question control is shown
    pub next_visible: bool,
    /// Start / Retry / Next Level
    pub action_label: Option<&'static str>,
    /// Summary line on the Win/Lose screens
    pub message: Option<String>,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        let playing = state.phase == GamePhase::Playing;
        let answered = state.answered_correctly();

        // The win screen always shows a full row
        let earned = if state.phase == GamePhase::Win {
            WIN_STARS
        } else {
            state.stars
        };
        let stars = (0..WIN_STARS)
            .map(|i| if i < earned { StarSlot::Earned } else { StarSlot::Empty })
            .collect();

        let message = match state.phase {
            GamePhase::Win => Some(format!("Level {} complete!", state.level)),
            GamePhase::Lose => Some(format!(
                "Time's up! {} of {} stars on level {}",
                state.stars, WIN_STARS, state.level
            )),
            GamePhase::Start | GamePhase::Playing => None,
        };

        Self {
            phase: state.phase,
            level: state.level,
            level_label: format!("Level {}", state.level),
            x: state.question.x,
            y: state.question.y,
            answer: state.answer,
            stars,
            time_remaining_secs: state.countdown.remaining_secs(),
            time_fraction: state.countdown.fraction_remaining(),
            pad_enabled: playing && !answered,
            next_visible: playing && answered,
            action_label: state.phase.action_label(),
            message,
        }
    }

    /// "x + y = ?" or "x + y = d"
    pub fn equation(&self) -> String {
        match self.answer {
            Some(a) => format!("{} + {} = {}", self.x, self.y, a.digit),
            None => format!("{} + {} = ?", self.x, self.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Input, step};

    fn earned_stars(view: &HudView) -> usize {
        view.stars.iter().filter(|s| **s == StarSlot::Earned).count()
    }

    fn playing() -> GameState {
        let mut state = GameState::new(21, 30.0);
        step(&mut state, Input::Begin { now_ms: 0.0 });
        state
    }

    #[test]
    fn test_start_screen() {
        let view = HudView::from_state(&GameState::new(1, 30.0));
        assert_eq!(view.action_label, Some("Start"));
        assert!(!view.pad_enabled);
        assert!(!view.next_visible);
        assert!(view.message.is_none());
    }

    #[test]
    fn test_playing_shows_three_empty_stars_and_level() {
        let view = HudView::from_state(&playing());
        assert_eq!(view.stars, vec![StarSlot::Empty; 3]);
        assert_eq!(view.level_label, "Level 1");
        assert!(view.pad_enabled);
        assert!(!view.next_visible);
        assert!(view.action_label.is_none());
        assert_eq!(view.time_fraction, 1.0);
    }

    #[test]
    fn test_correct_answer_locks_pad_and_shows_next() {
        let mut state = playing();
        let answer = state.question.answer;
        step(&mut state, Input::SelectDigit(answer));
        let view = HudView::from_state(&state);

        assert_eq!(earned_stars(&view), 1);
        assert!(!view.pad_enabled);
        assert!(view.next_visible);
        assert!(view.answer.is_some_and(|a| a.correct));
        assert!(view.equation().ends_with(&state.question.answer.to_string()));
    }

    #[test]
    fn test_wrong_answer_is_displayed() {
        let mut state = playing();
        let wrong = (state.question.answer + 1) % 10;
        step(&mut state, Input::SelectDigit(wrong));
        let view = HudView::from_state(&state);

        assert_eq!(view.answer.map(|a| (a.digit, a.correct)), Some((wrong, false)));
        assert!(view.pad_enabled);
        assert!(!view.next_visible);
    }

    #[test]
    fn test_win_message_names_level() {
        let mut state = playing();
        for _ in 0..3 {
            let answer = state.question.answer;
            step(&mut state, Input::SelectDigit(answer));
            step(&mut state, Input::NextQuestion);
        }
        let view = HudView::from_state(&state);
        assert_eq!(view.phase, GamePhase::Win);
        assert_eq!(view.message.as_deref(), Some("Level 1 complete!"));
        assert_eq!(view.action_label, Some("Next Level"));
        assert_eq!(earned_stars(&view), 3);
    }

    #[test]
    fn test_lose_summary() {
        let mut state = playing();
        let answer = state.question.answer;
        step(&mut state, Input::SelectDigit(answer));
        step(&mut state, Input::Frame { now_ms: 31_000.0 });
        let view = HudView::from_state(&state);

        assert_eq!(view.action_label, Some("Retry"));
        assert_eq!(earned_stars(&view), 1);
        assert_eq!(view.time_fraction, 0.0);
        assert!(view.message.is_some_and(|m| m.starts_with("Time's up!")));
        assert!(!view.next_visible);
    }
}
