//! Game driver
//!
//! Owns the game state and keeps the frame subscription in step with the
//! phase: exactly one frame callback is pending while a level is in play, and
//! none otherwise.

use crate::platform::{FrameHandle, FrameScheduler};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Input, step};
use crate::view::HudView;

/// Game instance holding all state
pub struct Game<S: FrameScheduler> {
    state: GameState,
    scheduler: S,
    /// Frame callback waiting to fire, if any
    pending_frame: Option<FrameHandle>,
    /// Page hidden but kept alive; no frames until resumed
    suspended: bool,
    torn_down: bool,
}

impl<S: FrameScheduler> Game<S> {
    pub fn new(seed: u64, level_duration_secs: f64, scheduler: S) -> Self {
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state: GameState::new(seed, level_duration_secs),
            scheduler,
            pending_frame: None,
            suspended: false,
            torn_down: false,
        }
    }

    /// Build a game from validated settings
    pub fn from_settings(settings: &Settings, fallback_seed: u64, scheduler: S) -> Self {
        Self::new(
            settings.resolve_seed(fallback_seed),
            settings.level_duration_secs,
            scheduler,
        )
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn view(&self) -> HudView {
        HudView::from_state(&self.state)
    }

    /// Start / Retry / Next Level
    pub fn begin(&mut self, now_ms: f64) -> Vec<GameEvent> {
        self.apply(Input::Begin { now_ms })
    }

    pub fn select_digit(&mut self, digit: u8) -> Vec<GameEvent> {
        self.apply(Input::SelectDigit(digit))
    }

    pub fn next_question(&mut self) -> Vec<GameEvent> {
        self.apply(Input::NextQuestion)
    }

    /// Frame callback from the scheduler.
    ///
    /// A callback that is no longer the pending one (cancelled, or delivered
    /// after teardown) is dropped without touching state.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> Vec<GameEvent> {
        if self.pending_frame != Some(handle) {
            log::debug!("Stale frame {:?} ignored", handle);
            return Vec::new();
        }
        // One-shot: it has fired
        self.pending_frame = None;
        self.apply(Input::Frame { now_ms })
    }

    /// Stop frame delivery while the page is hidden but may come back
    /// (browser back/forward cache). The countdown keeps its wall-clock start,
    /// so time spent away still counts.
    pub fn suspend(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.suspended = true;
        log::info!("Game suspended");
    }

    /// Undo [`Game::suspend`]: re-arm the frame if a level is in play
    pub fn resume(&mut self) {
        if self.torn_down || !self.suspended {
            return;
        }
        self.suspended = false;
        self.sync_frames();
        log::info!("Game resumed");
    }

    /// Cancel any pending frame and stop accepting input
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.torn_down = true;
        log::info!("Game torn down at level {}", self.state.level);
    }

    fn apply(&mut self, input: Input) -> Vec<GameEvent> {
        if self.torn_down {
            return Vec::new();
        }

        let events = step(&mut self.state, input);
        for event in &events {
            log_event(event);
        }
        self.sync_frames();
        events
    }

    /// Keep a frame pending iff the level is in play
    fn sync_frames(&mut self) {
        let playing = self.state.phase == GamePhase::Playing && !self.suspended;
        match (playing, self.pending_frame) {
            (true, None) => {
                self.pending_frame = Some(self.scheduler.request_frame());
            }
            (false, Some(handle)) => {
                self.scheduler.cancel_frame(handle);
                self.pending_frame = None;
            }
            _ => {}
        }
    }
}

fn log_event(event: &GameEvent) {
    match *event {
        GameEvent::LevelStarted { level } => log::info!("Level {} started", level),
        GameEvent::AnswerCorrect { digit, stars } => {
            log::info!("Correct: {} ({} stars)", digit, stars)
        }
        GameEvent::AnswerWrong { digit, expected } => {
            log::info!("Wrong: {} (expected {})", digit, expected)
        }
        GameEvent::QuestionAdvanced { x, y } => log::debug!("Next question: {} + {}", x, y),
        GameEvent::LevelWon { level } => log::info!("Level {} complete!", level),
        GameEvent::TimeUp { level, stars } => {
            log::info!("Time's up on level {} with {} stars", level, stars)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WIN_STARS;
    use crate::platform::ManualScheduler;

    const DURATION: f64 = 5.0;

    fn new_game() -> Game<ManualScheduler> {
        Game::new(2024, DURATION, ManualScheduler::new())
    }

    /// Deliver the pending frame at `now_ms`, as the display loop would
    fn fire_frame(game: &mut Game<ManualScheduler>, now_ms: f64) -> Vec<GameEvent> {
        let handle = game
            .scheduler_mut()
            .take_pending()
            .expect("a frame should be pending");
        game.on_frame(handle, now_ms)
    }

    fn answer(game: &mut Game<ManualScheduler>) {
        let digit = game.state().question.answer;
        game.select_digit(digit);
    }

    #[test]
    fn test_no_frames_before_start() {
        let game = new_game();
        assert_eq!(game.phase(), GamePhase::Start);
        assert!(game.pending_frame().is_none());
        assert!(game.scheduler().pending().is_none());
    }

    #[test]
    fn test_begin_schedules_a_frame() {
        let mut game = new_game();
        game.begin(0.0);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.pending_frame().is_some());
        assert_eq!(game.scheduler().pending(), game.pending_frame());
    }

    #[test]
    fn test_frames_reschedule_while_playing() {
        let mut game = new_game();
        game.begin(0.0);
        let mut last = game.view().time_remaining_secs;
        for i in 1..=4 {
            fire_frame(&mut game, i as f64 * 1_000.0);
            let remaining = game.view().time_remaining_secs;
            assert!(remaining < last);
            last = remaining;
            assert!(game.scheduler().pending().is_some());
        }
    }

    #[test]
    fn test_scenario_win_cancels_frame() {
        let mut game = new_game();
        game.begin(0.0);
        for i in 0..WIN_STARS {
            answer(&mut game);
            if i + 1 < WIN_STARS {
                game.next_question();
                fire_frame(&mut game, 100.0 * (i as f64 + 1.0));
            }
        }

        assert_eq!(game.phase(), GamePhase::Win);
        assert_eq!(game.state().stars, WIN_STARS);
        assert_eq!(game.state().level, 1);
        assert!(game.pending_frame().is_none());
        assert!(game.scheduler().pending().is_none());
        assert_eq!(game.scheduler().cancelled, 1);
    }

    #[test]
    fn test_scenario_timeout_loses() {
        let mut game = new_game();
        game.begin(0.0);
        answer(&mut game);
        game.next_question();
        answer(&mut game);

        fire_frame(&mut game, 2_000.0);
        let events = fire_frame(&mut game, 5_000.0);

        assert_eq!(events, vec![GameEvent::TimeUp { level: 1, stars: 2 }]);
        assert_eq!(game.phase(), GamePhase::Lose);
        assert_eq!(game.state().stars, 2);
        assert!(game.pending_frame().is_none());
        assert!(game.scheduler().pending().is_none());
    }

    #[test]
    fn test_retry_and_next_level() {
        let mut game = new_game();
        game.begin(0.0);
        fire_frame(&mut game, 6_000.0);
        assert_eq!(game.phase(), GamePhase::Lose);

        game.begin(10_000.0);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().level, 1);
        assert_eq!(game.view().time_remaining_secs, DURATION);
        assert!(game.scheduler().pending().is_some());

        for _ in 0..WIN_STARS {
            answer(&mut game);
            game.next_question();
        }
        assert_eq!(game.phase(), GamePhase::Win);

        game.begin(20_000.0);
        assert_eq!(game.state().level, 2);
        assert_eq!(game.state().stars, 0);
        assert_eq!(game.view().level_label, "Level 2");
    }

    #[test]
    fn test_stale_frame_is_ignored() {
        let mut game = new_game();
        game.begin(0.0);
        let stale = game.pending_frame().expect("pending");

        for _ in 0..WIN_STARS {
            answer(&mut game);
            game.next_question();
        }
        assert_eq!(game.phase(), GamePhase::Win);

        // The cancelled callback arrives anyway
        assert!(game.on_frame(stale, 60_000.0).is_empty());
        assert_eq!(game.phase(), GamePhase::Win);
    }

    #[test]
    fn test_suspend_and_resume_keep_game_alive() {
        let mut game = new_game();
        game.begin(0.0);
        let hidden = game.pending_frame().expect("pending");

        game.suspend();
        assert!(game.pending_frame().is_none());
        assert!(game.scheduler().pending().is_none());
        assert_eq!(game.scheduler().cancelled, 1);
        assert!(game.on_frame(hidden, 1_000.0).is_empty());

        // Input while hidden still applies but does not arm a frame
        answer(&mut game);
        assert_eq!(game.state().stars, 1);
        assert!(game.scheduler().pending().is_none());

        game.resume();
        assert!(game.scheduler().pending().is_some());
        fire_frame(&mut game, 2_000.0);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!((game.view().time_remaining_secs - 3.0).abs() < 1e-9);

        game.next_question();
        answer(&mut game);
        assert_eq!(game.state().stars, 2);
    }

    #[test]
    fn test_time_away_counts_after_resume() {
        let mut game = new_game();
        game.begin(0.0);
        game.suspend();
        game.resume();

        let events = fire_frame(&mut game, 60_000.0);
        assert_eq!(events, vec![GameEvent::TimeUp { level: 1, stars: 0 }]);
        assert!(game.scheduler().pending().is_none());
    }

    #[test]
    fn test_resume_outside_playing_arms_nothing() {
        let mut game = new_game();
        game.suspend();
        game.resume();
        assert!(game.scheduler().pending().is_none());

        game.begin(0.0);
        assert!(game.scheduler().pending().is_some());
    }

    #[test]
    fn test_resume_after_teardown_is_ignored() {
        let mut game = new_game();
        game.begin(0.0);
        game.suspend();
        game.teardown();
        game.resume();
        assert!(game.scheduler().pending().is_none());
    }

    #[test]
    fn test_teardown_cancels_and_freezes() {
        let mut game = new_game();
        game.begin(0.0);
        let handle = game.pending_frame().expect("pending");

        game.teardown();
        assert!(game.scheduler().pending().is_none());
        assert!(game.on_frame(handle, 60_000.0).is_empty());
        assert!(game.begin(70_000.0).is_empty());
        assert_eq!(game.phase(), GamePhase::Playing);
    }
}
