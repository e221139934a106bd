//! Star Sums - A timed single-digit addition game
//!
//! Core modules:
//! - `sim`: Deterministic game core (questions, countdown, state machine)
//! - `app`: Game driver binding the core to a frame scheduler
//! - `platform`: Browser/native platform abstraction (frame scheduling)
//! - `view`: Read-only display snapshot for front-ends
//! - `settings`: Player-tunable configuration

pub mod app;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod view;

pub use app::Game;
pub use settings::{Settings, SettingsError};
pub use view::HudView;

/// Game configuration constants
pub mod consts {
    /// Stars needed to clear a level (also the number of star slots shown)
    pub const WIN_STARS: u8 = 3;
    /// Largest digit on the pad; every sum fits on it
    pub const DIGIT_MAX: u8 = 9;
    /// Level countdown length in seconds
    pub const DEFAULT_LEVEL_DURATION_SECS: f64 = 30.0;
    /// Level number a fresh game starts on
    pub const FIRST_LEVEL: u32 = 1;
    /// Frame pacing for the terminal front-end (~60 Hz)
    pub const NATIVE_FRAME_MS: u64 = 16;
}
