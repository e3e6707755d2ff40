use std::time::{Duration, Instant};

use tracing::trace;

use crate::event::{Command, Event, Key};

/// Number of characters that make up one "standard word" for wpm.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Scores character-producing keystrokes as they happen.
///
/// A stroke is judged once, at the moment it is typed; correcting it later
/// with backspace does not change the score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccuracyTracker {
    pub good_strokes: u32,
    pub total_strokes: u32,
}

impl AccuracyTracker {
    pub fn record(&mut self, matched: bool) {
        if matched {
            self.good_strokes += 1;
        }
        self.total_strokes += 1;
    }

    /// Percentage of good strokes, rounded. `None` until a stroke is recorded.
    pub fn accuracy(&self) -> Option<u32> {
        if self.total_strokes == 0 {
            return None;
        }
        Some((100.0 * self.good_strokes as f64 / self.total_strokes as f64).round() as u32)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    pub running: bool,
    pub start: Option<Instant>,
    /// only set once the session completes
    pub elapsed: Option<Duration>,
}

/// All progress of one typing session.
///
/// `cursor` counts characters, not bytes, and always equals the number of
/// characters in `input`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    text: String,
    text_chars: Vec<char>,
    input: String,
    cursor: usize,
    is_complete: bool,
    timer: Timer,
    accuracy_tracker: AccuracyTracker,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl SessionState {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let text_chars = text.chars().collect();
        Self {
            text,
            text_chars,
            input: String::new(),
            cursor: 0,
            is_complete: false,
            timer: Timer::default(),
            accuracy_tracker: AccuracyTracker::default(),
        }
    }

    /// Reinitialise every field from scratch around `text`.
    pub fn reset(&mut self, text: impl Into<String>) {
        *self = Self::new(text);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_chars(&self) -> &[char] {
        &self.text_chars
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn accuracy_tracker(&self) -> &AccuracyTracker {
        &self.accuracy_tracker
    }

    /// Length of the target text in characters.
    pub fn len(&self) -> usize {
        self.text_chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text_chars.is_empty()
    }

    /// True when the typed history has diverged from the target text,
    /// regardless of where the divergence happened.
    pub fn has_errors(&self) -> bool {
        !self.text.starts_with(&self.input)
    }

    pub fn is_at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor == self.text_chars.len()
    }

    pub fn expected_char(&self, idx: usize) -> Option<char> {
        self.text_chars.get(idx).copied()
    }

    pub fn accuracy(&self) -> Option<u32> {
        self.accuracy_tracker.accuracy()
    }

    /// Words per minute over the whole text, using five characters per word.
    ///
    /// `None` until the session has completed with a non-zero elapsed time.
    pub fn wpm(&self) -> Option<u32> {
        let elapsed = self.timer.elapsed?;
        if elapsed.is_zero() {
            return None;
        }
        let minutes = elapsed.as_secs_f64() / 60.0;
        let standard_words = self.text_chars.len() as f64 / CHARS_PER_WORD;
        Some((standard_words / minutes).round() as u32)
    }

    /// Apply one keystroke. Must not be called on a complete session.
    pub fn apply_keystroke(&mut self, key: &Key) -> Vec<Event> {
        match key {
            Key::Char(c) if !self.is_at_end() => {
                self.type_scored(*c);
            }
            Key::Enter if !self.is_at_end() => {
                self.type_scored('\n');
                self.skip_spaces();
            }
            Key::Backspace if !self.is_at_start() => {
                self.input.pop();
                self.cursor -= 1;
            }
            _ => {
                trace!(?key, cursor = self.cursor, "keystroke ignored");
            }
        }

        let mut follow_ups = Vec::new();
        if !self.timer.running && !self.is_at_start() {
            follow_ups.push(Event::StartTimer);
        }
        if self.is_at_end() {
            follow_ups.push(Event::End);
        }
        follow_ups
    }

    pub fn apply_start_timer(&mut self, now: Instant) -> Vec<Event> {
        self.timer.running = true;
        self.timer.start = Some(now);
        trace!("timer started");
        vec![]
    }

    /// Finalise the session if, and only if, the input matches the text.
    pub fn apply_end(&mut self, now: Instant) -> Vec<Event> {
        if self.input == self.text {
            self.is_complete = true;
            self.timer.running = false;
            self.timer.elapsed = self
                .timer
                .start
                .map(|start| now.saturating_duration_since(start));
            trace!(elapsed = ?self.timer.elapsed, "session complete");
        }
        vec![]
    }

    pub fn apply_command(&mut self, command: Command) -> Vec<Event> {
        match command {
            Command::Retry => {
                let text = std::mem::take(&mut self.text);
                self.reset(text);
            }
            Command::New => self.reset(String::new()),
        }
        vec![Event::Replaced]
    }

    pub fn apply_set_text(&mut self, text: String) -> Vec<Event> {
        self.reset(text);
        vec![]
    }

    fn type_scored(&mut self, c: char) {
        let matched = self.text_chars[self.cursor] == c;
        self.input.push(c);
        self.accuracy_tracker.record(matched);
        self.cursor += 1;
    }

    // Leading spaces after a line break are typed for the user, unscored.
    fn skip_spaces(&mut self) {
        while !self.is_at_end() && self.text_chars[self.cursor] == ' ' {
            self.input.push(' ');
            self.cursor += 1;
        }
    }
}
