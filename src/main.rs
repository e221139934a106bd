//! Star Sums entry point
//!
//! Browser builds drive the game from `requestAnimationFrame` and DOM events;
//! native builds run a terminal front-end.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent, PageTransitionEvent};

    use star_sums::consts::DIGIT_MAX;
    use star_sums::platform::{FrameHandle, FrameScheduler};
    use star_sums::view::StarSlot;
    use star_sums::{Game, HudView, Settings};

    type FrameCallback = Closure<dyn FnMut(f64)>;
    type SharedGame = Rc<RefCell<Game<RafScheduler>>>;

    /// Frame scheduler backed by `requestAnimationFrame`
    struct RafScheduler {
        callback: Rc<RefCell<Option<FrameCallback>>>,
    }

    impl FrameScheduler for RafScheduler {
        fn request_frame(&mut self) -> FrameHandle {
            let id = match (web_sys::window(), self.callback.borrow().as_ref()) {
                (Some(window), Some(cb)) => window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                    .unwrap_or_else(|e| {
                        log::error!("requestAnimationFrame failed: {:?}", e);
                        0
                    }),
                _ => 0,
            };
            FrameHandle(id as i64)
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle.0 as i32);
            }
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Star Sums starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document; cannot start");
            return;
        };

        let settings = Settings::load();
        let callback = Rc::new(RefCell::new(None));
        let scheduler = RafScheduler {
            callback: callback.clone(),
        };
        let game: SharedGame = Rc::new(RefCell::new(Game::from_settings(
            &settings,
            js_sys::Date::now() as u64,
            scheduler,
        )));

        // Frame callback: advance the countdown, then redraw
        {
            let game = game.clone();
            let frame = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                let mut g = game.borrow_mut();
                if let Some(handle) = g.pending_frame() {
                    g.on_frame(handle, time);
                }
                update_hud(&g.view());
            });
            *callback.borrow_mut() = Some(frame);
        }

        setup_input_handlers(&document, game.clone());
        setup_page_lifecycle(game.clone());

        update_hud(&game.borrow().view());
        log::info!("Star Sums running!");
    }

    fn setup_input_handlers(document: &Document, game: SharedGame) {
        // Start / Retry / Next Level
        if let Some(btn) = document.get_element_by_id("action-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.begin(now_ms());
                update_hud(&g.view());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Digit pad
        for digit in 0..=DIGIT_MAX {
            if let Some(btn) = document.get_element_by_id(&format!("digit-{}", digit)) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.select_digit(digit);
                    update_hud(&g.view());
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Next question arrow
        if let Some(btn) = document.get_element_by_id("next-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.next_question();
                update_hud(&g.view());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                match key.as_str() {
                    " " | "Enter" => {
                        g.begin(now_ms());
                    }
                    "ArrowRight" | "n" | "N" => {
                        g.next_question();
                    }
                    _ => {
                        if let Ok(digit) = key.parse::<u8>() {
                            g.select_digit(digit);
                        }
                    }
                }
                update_hud(&g.view());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Stop frames when the page is hidden. A page kept in the back/forward
    /// cache is only suspended, and picks up again on `pageshow`.
    fn setup_page_lifecycle(game: SharedGame) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                let mut g = game.borrow_mut();
                if event.persisted() {
                    g.suspend();
                } else {
                    g.teardown();
                }
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                if event.persisted() {
                    let mut g = game.borrow_mut();
                    g.resume();
                    update_hud(&g.view());
                }
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(document: &Document, id: &str, class: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        set_class(document, id, if hidden { "hidden" } else { "" });
    }

    /// Update HUD elements in DOM
    fn update_hud(view: &HudView) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        use star_sums::sim::GamePhase;

        set_hidden(&document, "start-screen", view.phase != GamePhase::Start);
        set_hidden(&document, "game", view.phase != GamePhase::Playing);
        set_hidden(&document, "end-screen", !view.phase.is_terminal());

        set_text(&document, "level", &view.level_label);
        set_text(&document, "x", &view.x.to_string());
        set_text(&document, "y", &view.y.to_string());

        match view.answer {
            Some(a) => {
                set_text(&document, "answer", &a.digit.to_string());
                let class = if a.correct { "answer correct" } else { "answer incorrect" };
                set_class(&document, "answer", class);
            }
            None => {
                set_text(&document, "answer", "");
                set_class(&document, "answer", "answer hidden");
            }
        }

        for (i, slot) in view.stars.iter().enumerate() {
            let class = match slot {
                StarSlot::Earned => "star star-earned",
                StarSlot::Empty => "star star-empty",
            };
            set_class(&document, &format!("star-{}", i), class);
        }

        set_text(&document, "timer", &format!("{:.0}", view.time_remaining_secs.ceil()));
        if let Some(ring) = document.get_element_by_id("timer-ring") {
            let _ = ring.set_attribute("data-fraction", &format!("{:.3}", view.time_fraction));
        }

        for digit in 0..=DIGIT_MAX {
            if let Some(btn) = document.get_element_by_id(&format!("digit-{}", digit)) {
                if view.pad_enabled {
                    let _ = btn.remove_attribute("disabled");
                } else {
                    let _ = btn.set_attribute("disabled", "");
                }
            }
        }

        let next_class = if view.next_visible {
            "next-button visible"
        } else {
            "next-button hidden"
        };
        set_class(&document, "next-btn", next_class);

        match view.action_label {
            Some(label) => {
                set_text(&document, "action-btn", label);
                set_hidden(&document, "action-btn", false);
            }
            None => set_hidden(&document, "action-btn", true),
        }

        set_text(&document, "message", view.message.as_deref().unwrap_or(""));
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, Stdout, Write};
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use crossterm::{
        cursor,
        event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
        execute, queue,
        style::{Color, Print, ResetColor, SetForegroundColor},
        terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    };

    use star_sums::consts::NATIVE_FRAME_MS;
    use star_sums::platform::ManualScheduler;
    use star_sums::sim::GamePhase;
    use star_sums::view::StarSlot;
    use star_sums::{Game, HudView, Settings};

    const BAR_WIDTH: usize = 30;

    /// A run of text in one colour
    type Span = (Color, String);
    /// One screen row
    type Line = Vec<Span>;

    fn elapsed_ms(epoch: Instant) -> f64 {
        epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Raw mode + alternate screen, restored on drop (including early `?` and panics)
    struct TerminalGuard;

    impl TerminalGuard {
        fn enter(out: &mut Stdout) -> io::Result<Self> {
            terminal::enable_raw_mode()?;
            let guard = TerminalGuard;
            execute!(out, EnterAlternateScreen, cursor::Hide)?;
            Ok(guard)
        }
    }

    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }

    pub fn run() -> io::Result<()> {
        let settings = Settings::load();
        let clock_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut game = Game::from_settings(&settings, clock_seed, ManualScheduler::new());

        let mut out = io::stdout();
        let result = {
            let _guard = TerminalGuard::enter(&mut out)?;
            event_loop(&mut game, &mut out)
        };

        game.teardown();
        result
    }

    fn event_loop(game: &mut Game<ManualScheduler>, out: &mut Stdout) -> io::Result<()> {
        let epoch = Instant::now();
        let frame = Duration::from_millis(NATIVE_FRAME_MS);
        let mut screen = Screen::default();

        loop {
            screen.draw(out, screen_lines(&game.view()))?;

            let mut key = None;
            if event::poll(frame)? {
                if let Event::Key(k) = event::read()? {
                    key = Some(k);
                }
            }

            if pump(game, key, elapsed_ms(epoch)) {
                return Ok(());
            }
        }
    }

    /// Apply one loop pass: the key (if any), then the armed frame.
    /// Returns true when the player quits.
    fn pump(game: &mut Game<ManualScheduler>, key: Option<KeyEvent>, now_ms: f64) -> bool {
        // Releases and repeats are dropped, but the frame below still fires
        if let Some(key) = key.filter(|k| k.kind == KeyEventKind::Press) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return true,
                KeyCode::Enter | KeyCode::Char(' ') => {
                    game.begin(now_ms);
                }
                KeyCode::Right | KeyCode::Char('n') => {
                    game.next_question();
                }
                KeyCode::Char(c) => {
                    if let Some(digit) = c.to_digit(10) {
                        game.select_digit(digit as u8);
                    }
                }
                _ => {}
            }
        }

        // Deliver the display-refresh callback, if one is armed
        if let Some(handle) = game.scheduler_mut().take_pending() {
            game.on_frame(handle, now_ms);
        }
        false
    }

    fn plain(text: impl Into<String>) -> Line {
        vec![(Color::Reset, text.into())]
    }

    /// Lay out the HUD as fixed rows
    fn screen_lines(view: &HudView) -> Vec<Line> {
        let stars = view
            .stars
            .iter()
            .map(|slot| match slot {
                StarSlot::Earned => (Color::Yellow, "★ ".to_string()),
                StarSlot::Empty => (Color::DarkGrey, "☆ ".to_string()),
            })
            .collect();

        let mut lines = vec![
            plain("Star Sums"),
            plain(view.level_label.as_str()),
            Line::new(),
            stars,
            Line::new(),
        ];

        match view.phase {
            GamePhase::Start => {
                lines.push(plain("Add the two numbers before time runs out."));
            }
            GamePhase::Playing => {
                let filled = (view.time_fraction * BAR_WIDTH as f64).round() as usize;
                lines.push(plain(format!(
                    "[{}{}] {:>4.1}s",
                    "#".repeat(filled),
                    " ".repeat(BAR_WIDTH.saturating_sub(filled)),
                    view.time_remaining_secs
                )));
                lines.push(Line::new());

                let color = match view.answer {
                    Some(a) if a.correct => Color::Green,
                    Some(_) => Color::Red,
                    None => Color::Reset,
                };
                lines.push(vec![(color, view.equation())]);
                lines.push(Line::new());

                let hint = if view.next_visible {
                    "→ / n: next question"
                } else {
                    "0-9: answer"
                };
                lines.push(plain(hint));
            }
            GamePhase::Win | GamePhase::Lose => {
                lines.push(plain(view.message.as_deref().unwrap_or_default()));
            }
        }

        lines.push(Line::new());
        if let Some(label) = view.action_label {
            lines.push(plain(format!("Enter: {}", label)));
        }
        lines.push(plain("q: quit"));
        lines
    }

    /// Last drawn rows; only changed rows are rewritten
    #[derive(Default)]
    struct Screen {
        shown: Vec<Line>,
    }

    impl Screen {
        fn draw<W: Write>(&mut self, out: &mut W, lines: Vec<Line>) -> io::Result<()> {
            if lines == self.shown {
                return Ok(());
            }

            let rows = lines.len().max(self.shown.len());
            for row in 0..rows {
                let new = lines.get(row);
                if new == self.shown.get(row) {
                    continue;
                }
                queue!(out, cursor::MoveTo(0, row as u16), Clear(ClearType::CurrentLine))?;
                for (color, text) in new.into_iter().flatten() {
                    queue!(out, SetForegroundColor(*color), Print(text))?;
                }
                queue!(out, ResetColor)?;
            }

            self.shown = lines;
            out.flush()
        }
    }

}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    // Logs go to stderr; redirect it when RUST_LOG is set
    env_logger::init();
    log::info!("Star Sums (native) starting...");

    if let Err(e) = terminal::run() {
        log::error!("Terminal error: {}", e);
        eprintln!("star-sums: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
