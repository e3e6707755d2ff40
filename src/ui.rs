use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{app::App, dispatcher::Clock, session::SessionState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// shown in place of a newline that is under the cursor or mistyped
const NEWLINE_MARK: &str = "\u{ac}";
/// shown in place of mistyped whitespace
const SPACE_MARK: &str = "\u{b7}";

pub const AWAITING_TEXT: &str = "[paste a text in to the terminal]";
pub const RESULTS_HINT: &str = "[hit r to retry, or n for a new text]";

#[derive(Clone, Copy, Debug)]
pub struct PaperStyles {
    pub typed: Style,
    pub error: Style,
    pub cursor: Style,
    pub cursor_error: Style,
    pub untyped: Style,
}

impl Default for PaperStyles {
    fn default() -> Self {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        Self {
            typed: Style::default().patch(bold_style).fg(Color::Green),
            error: Style::default().patch(bold_style).fg(Color::Red),
            cursor: Style::default()
                .patch(dim_bold_style)
                .add_modifier(Modifier::UNDERLINED),
            cursor_error: Style::default()
                .patch(bold_style)
                .fg(Color::Red)
                .add_modifier(Modifier::UNDERLINED | Modifier::REVERSED),
            untyped: dim_bold_style,
        }
    }
}

/// Accumulates spans, starting a new line on every `"\n"`.
#[derive(Default)]
struct PaperLines {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
}

impl PaperLines {
    fn push(&mut self, content: impl Into<String>, style: Style) {
        let content = content.into();
        if content == "\n" {
            let spans = std::mem::take(&mut self.current);
            self.lines.push(Line::from(spans));
        } else {
            self.current.push(Span::styled(content, style));
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.current.is_empty() || self.lines.is_empty() {
            self.lines.push(Line::from(self.current));
        }
        self.lines
    }
}

/// Lay out the target text with typed, mistyped, cursor and pending parts.
pub fn paper_lines(state: &SessionState, styles: &PaperStyles) -> Vec<Line<'static>> {
    let input: Vec<char> = state.input().chars().collect();
    let cursor = state.cursor();
    let cursor_style = if state.has_errors() {
        styles.cursor_error
    } else {
        styles.cursor
    };
    let mut paper = PaperLines::default();

    for (idx, &expected) in state.text_chars().iter().enumerate() {
        if idx < cursor {
            let typed = input[idx];
            if typed == expected {
                paper.push(typed, styles.typed);
            } else if typed == '\n' {
                paper.push(NEWLINE_MARK, styles.error);
                paper.push(typed, styles.error);
            } else if typed.is_whitespace() {
                paper.push(SPACE_MARK, styles.error);
            } else {
                paper.push(typed, styles.error);
            }
        } else if idx == cursor && expected == '\n' {
            paper.push(NEWLINE_MARK, cursor_style);
            paper.push(expected, styles.untyped);
        } else if idx == cursor {
            paper.push(expected, cursor_style);
        } else {
            paper.push(expected, styles.untyped);
        }
    }

    // nowhere left to put the cursor, so show the trailing error past the end
    if state.is_at_end() && state.has_errors() {
        paper.push(" ", styles.cursor_error);
    }

    paper.finish()
}

/// The results block, once the session is complete.
pub fn results_text(state: &SessionState) -> Option<String> {
    if !state.is_complete() {
        return None;
    }
    let show = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    Some(format!(
        "Accuracy: {}%\n   Speed: {}wpm\n\n{}",
        show(state.accuracy()),
        show(state.wpm()),
        RESULTS_HINT
    ))
}

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.state();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        if state.is_empty() {
            let prompt = Paragraph::new(vec![
                Line::from(Span::styled(AWAITING_TEXT, bold_style)),
                Line::from(Span::styled("(esc to quit)", dim_bold_style)),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Percentage(45),
                    Constraint::Length(2),
                    Constraint::Min(0),
                ])
                .split(area);
            prompt.render(chunks[1], buf);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // timer
                Constraint::Length(1), // padding
                Constraint::Min(1),    // paper
                Constraint::Length(4), // results
            ])
            .split(area);

        if let Some(elapsed) = self.elapsed() {
            let timer = Paragraph::new(Span::styled(
                format!("{:.1}", elapsed.as_secs_f64()),
                dim_bold_style,
            ))
            .alignment(Alignment::Center);

            timer.render(chunks[0], buf);
        }

        let fits_one_line =
            !state.text().contains('\n') && state.text().width() < chunks[2].width as usize;
        let mut paper = Paragraph::new(paper_lines(state, &PaperStyles::default()))
            .alignment(if fits_one_line {
                // when the text is small enough to fit on one line
                // centering it gives a nice zen feeling
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: false });
        if self.view().is_flashing(Instant::now()) {
            paper = paper.style(Style::default().bg(Color::Red));
        }
        paper.render(chunks[2], buf);

        if let Some(results) = results_text(state) {
            Paragraph::new(results)
                .style(bold_style)
                .render(chunks[3], buf);
        }
    }
}
