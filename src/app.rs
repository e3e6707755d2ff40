use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, trace};

use crate::config::Config;
use crate::dispatcher::{Clock, Dispatcher, Observer, SystemClock};
use crate::event::Key;
use crate::runtime::TermEvent;
use crate::session::SessionState;
use crate::text;

/// What the terminal view keeps between frames.
#[derive(Debug)]
pub struct PaperView {
    flash_for: Duration,
    flash_until: Option<Instant>,
    notifications: u64,
}

impl PaperView {
    pub fn new(flash_for: Duration) -> Self {
        Self {
            flash_for,
            flash_until: None,
            notifications: 0,
        }
    }

    pub fn is_flashing(&self, now: Instant) -> bool {
        self.flash_until.is_some_and(|until| now < until)
    }

    pub fn notifications(&self) -> u64 {
        self.notifications
    }

    /// Drop an expired flash. Returns true if the view changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        match self.flash_until {
            Some(until) if now >= until => {
                self.flash_until = None;
                true
            }
            _ => false,
        }
    }
}

impl Observer for PaperView {
    fn notify(&mut self, state: &SessionState) {
        self.notifications += 1;
        if !state.is_empty() && state.is_at_end() && state.has_errors() {
            self.flash_until = Some(Instant::now() + self.flash_for);
        }
    }
}

/// What a terminal key means to the app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Quit,
    Type(Key),
}

/// Translate a terminal key event. Key releases (on terminals that report
/// them) are `None`, as are keys held with a modifier other than shift.
pub fn intent_for(key: KeyEvent) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            _ => None,
        };
    }
    if key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SUPER) {
        return None;
    }
    let key = match key.code {
        KeyCode::Esc => return Some(Intent::Quit),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        _ => Key::Unrecognized,
    };
    Some(Intent::Type(key))
}

#[derive(Debug)]
pub struct App<C: Clock = SystemClock> {
    pub dispatcher: Dispatcher<PaperView, C>,
    pub config: Config,
    pub should_quit: bool,
}

impl App<SystemClock> {
    pub fn new(text: String, config: Config) -> Self {
        Self::with_clock(text, config, SystemClock)
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(text: String, config: Config, clock: C) -> Self {
        let view = PaperView::new(Duration::from_millis(config.error_flash_ms));
        Self {
            dispatcher: Dispatcher::with_clock(SessionState::new(text), view, clock),
            config,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        self.dispatcher.state()
    }

    pub fn view(&self) -> &PaperView {
        self.dispatcher.observer()
    }

    /// Time spent on the current session: live while the timer runs, final
    /// once complete.
    pub fn elapsed(&self) -> Option<Duration> {
        let timer = self.state().timer();
        if timer.running {
            timer
                .start
                .map(|start| self.dispatcher.clock().now().saturating_duration_since(start))
        } else {
            timer.elapsed
        }
    }

    /// Handle one terminal event. Returns true if the screen should be redrawn.
    pub fn on_event(&mut self, event: TermEvent) -> bool {
        match event {
            TermEvent::Key(key) => match intent_for(key) {
                Some(Intent::Quit) => {
                    debug!("quit requested");
                    self.should_quit = true;
                    false
                }
                Some(Intent::Type(key)) => {
                    if self.state().is_empty() {
                        trace!(?key, "no text yet, key ignored");
                        return false;
                    }
                    self.dispatcher.handle_key(key);
                    true
                }
                None => false,
            },
            TermEvent::Paste(pasted) => {
                self.dispatcher.set_text(text::normalize(&pasted));
                true
            }
            TermEvent::Resize => true,
            TermEvent::Tick => {
                let now = Instant::now();
                let flash_cleared = self.dispatcher.observer_mut().on_tick(now);
                flash_cleared || self.state().timer().running
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> TermEvent {
        TermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.on_event(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_intent_for_plain_keys() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(
            intent_for(key(KeyCode::Char('a'))),
            Some(Intent::Type(Key::Char('a')))
        );
        assert_eq!(
            intent_for(key(KeyCode::Enter)),
            Some(Intent::Type(Key::Enter))
        );
        assert_eq!(
            intent_for(key(KeyCode::Backspace)),
            Some(Intent::Type(Key::Backspace))
        );
        assert_eq!(
            intent_for(key(KeyCode::Left)),
            Some(Intent::Type(Key::Unrecognized))
        );
        assert_eq!(intent_for(key(KeyCode::Esc)), Some(Intent::Quit));
    }

    #[test]
    fn test_intent_for_shifted_char_is_typed() {
        let key = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(intent_for(key), Some(Intent::Type(Key::Char('A'))));
    }

    #[test]
    fn test_intent_for_ctrl() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert_eq!(intent_for(ctrl('c')), Some(Intent::Quit));
        assert_eq!(intent_for(ctrl('a')), None);
    }

    #[test]
    fn test_intent_for_release_is_ignored() {
        let key = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(intent_for(key), None);
    }

    #[test]
    fn test_app_types_and_completes() {
        let mut app = App::new("hi".to_string(), Config::default());

        type_str(&mut app, "hi");

        assert!(app.state().is_complete());
        assert_eq!(app.state().accuracy(), Some(100));
        assert!(app.elapsed().is_some());
    }

    #[test]
    fn test_app_quit_on_esc() {
        let mut app = App::new("hi".to_string(), Config::default());

        let redraw = app.on_event(press(KeyCode::Esc));

        assert!(app.should_quit);
        assert!(!redraw);
    }

    #[test]
    fn test_app_retry_and_new_after_completion() {
        let mut app = App::new("hi".to_string(), Config::default());
        type_str(&mut app, "hi");

        app.on_event(press(KeyCode::Char('r')));
        assert_eq!(app.state().text(), "hi");
        assert_eq!(app.state().cursor(), 0);
        assert!(!app.state().is_complete());

        type_str(&mut app, "hi");
        app.on_event(press(KeyCode::Char('n')));
        assert!(app.state().is_empty());
    }

    #[test]
    fn test_app_ignores_keys_while_awaiting_text() {
        let mut app = App::new(String::new(), Config::default());

        let redraw = app.on_event(press(KeyCode::Char('x')));

        assert!(!redraw);
        assert!(!app.state().is_complete());
        assert_eq!(app.view().notifications(), 0);
    }

    #[test]
    fn test_app_paste_sets_normalized_text() {
        let mut app = App::new(String::new(), Config::default());

        app.on_event(TermEvent::Paste("line one\r\n\tline two\n".to_string()));

        assert_eq!(app.state().text(), "line one\n    line two");
        assert_eq!(app.view().notifications(), 1);
    }

    #[test]
    fn test_flash_on_end_with_errors() {
        let config = Config {
            error_flash_ms: 60_000,
            ..Config::default()
        };
        let mut app = App::new("ab".to_string(), config);

        type_str(&mut app, "ax");

        assert!(app.view().is_flashing(Instant::now()));
        assert!(!app.state().is_complete());
    }

    #[test]
    fn test_flash_expires_on_tick() {
        let config = Config {
            error_flash_ms: 0,
            ..Config::default()
        };
        let mut app = App::new("a".to_string(), config);
        type_str(&mut app, "x");

        assert!(!app.view().is_flashing(Instant::now()));
        let redraw = app.on_event(TermEvent::Tick);

        assert!(redraw);
        assert!(app.dispatcher.observer().flash_until.is_none());
    }

    #[test]
    fn test_no_flash_on_clean_completion() {
        let mut app = App::new("ab".to_string(), Config::default());

        type_str(&mut app, "ab");

        assert!(!app.view().is_flashing(Instant::now()));
    }

    #[test]
    fn test_tick_redraws_only_while_running() {
        let mut app = App::new("abc".to_string(), Config::default());
        assert!(!app.on_event(TermEvent::Tick));

        type_str(&mut app, "a");
        assert!(app.on_event(TermEvent::Tick));
    }

    #[test]
    fn test_resize_redraws() {
        let mut app = App::new("abc".to_string(), Config::default());
        assert!(app.on_event(TermEvent::Resize));
    }
}
