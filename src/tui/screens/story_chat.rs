//! Story transcript and "what happens next" input

use super::{is_ctrl, rejection_message, KeyHints, Outcome};
use crate::runtime::DispatchError;
use crate::state_machine::{validation, Event, SessionState};
use crate::tui::widgets::{Card, CardStack, Loader, TextField};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

const ACCENT: Color = Color::Magenta;
const SCROLL_STEP: u16 = 5;

pub const QUICK_IDEAS: [&str; 5] = [
    "The character meets a new friend",
    "They discover something magical",
    "A fun adventure begins",
    "They solve a puzzle",
    "Something surprising happens",
];

#[derive(Debug)]
pub struct StoryChatScreen {
    input: TextField,
    next_idea: usize,
    scroll_back: u16,
}

impl Default for StoryChatScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryChatScreen {
    pub fn new() -> Self {
        Self {
            input: TextField::new(
                "What happens next?",
                "The character discovers a hidden door...",
            ),
            next_idea: 0,
            scroll_back: 0,
        }
    }

    pub fn input_text(&self) -> String {
        self.input.text()
    }

    pub fn input_error(&self) -> Option<&str> {
        self.input.error()
    }

    fn submit(&mut self, state: &SessionState) -> Outcome {
        if !state.can_continue() {
            return Outcome::Ignored;
        }
        let text = self.input.text();
        match validation::story_continuation(&text) {
            Ok(input) => Outcome::submit(Event::ContinueStory {
                input: input.to_string(),
            }),
            Err(e) => {
                self.input.set_error(e.to_string());
                Outcome::Handled
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &SessionState) -> Outcome {
        if is_ctrl(&key, 'n') {
            self.input.clear();
            self.scroll_back = 0;
            return Outcome::dispatch(Event::ResetSession);
        }

        match key.code {
            KeyCode::PageUp => {
                self.scroll_back = self.scroll_back.saturating_add(SCROLL_STEP);
                Outcome::Handled
            }
            KeyCode::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(SCROLL_STEP);
                Outcome::Handled
            }
            KeyCode::Enter => self.submit(state),
            KeyCode::Tab if state.can_continue() => {
                let idea = QUICK_IDEAS[self.next_idea % QUICK_IDEAS.len()];
                self.next_idea += 1;
                self.input.set_text(idea);
                Outcome::Handled
            }
            _ if state.can_continue() => {
                if self.input.handle_key(key) {
                    Outcome::Handled
                } else {
                    Outcome::Ignored
                }
            }
            _ => Outcome::Ignored,
        }
    }

    pub fn submitted(&mut self, result: &Result<(), DispatchError>) {
        match rejection_message(result) {
            Some(message) => self.input.set_error(message),
            None if result.is_ok() => {
                self.input.clear();
                self.scroll_back = 0;
            }
            None => {}
        }
    }

    pub fn key_hints(&self, state: &SessionState) -> KeyHints {
        if state.is_complete {
            &[("Ctrl-N", "new story"), ("PgUp/PgDn", "scroll"), ("Esc", "modes")]
        } else {
            &[
                ("Enter", "continue"),
                ("Tab", "quick idea"),
                ("PgUp/PgDn", "scroll"),
                ("Ctrl-N", "new story"),
                ("Esc", "modes"),
            ]
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &SessionState, tick: usize) {
        let bottom_height = if state.is_complete { 3 } else { 5 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),             // Stats
                Constraint::Min(3),                // Transcript
                Constraint::Length(1),             // Loader
                Constraint::Length(bottom_height), // Input or ending
            ])
            .split(area);

        self.render_stats(frame, rows[0], state);

        // Narrator part first, then what the child asked for next
        let titles: Vec<String> = (1..=state.story_segments.len())
            .map(|part| format!("Story Narrator · Part {part}"))
            .collect();
        let mut cards = Vec::with_capacity(state.story_segments.len() * 2);
        for (i, segment) in state.story_segments.iter().enumerate() {
            if i > 0 {
                if let Some(input) = state.user_inputs.get(i - 1) {
                    cards.push(Card::new("You", input).accent(Color::Blue));
                }
            }
            cards.push(Card::new(&titles[i], segment).accent(ACCENT));
        }
        let stack = CardStack::new(cards);
        let max_scroll = stack
            .line_count(rows[1].width)
            .saturating_sub(usize::from(rows[1].height));
        self.scroll_back = self
            .scroll_back
            .min(u16::try_from(max_scroll).unwrap_or(u16::MAX));
        frame.render_widget(stack.scroll_back(self.scroll_back), rows[1]);

        if state.is_generating {
            frame.render_widget(
                Loader::new("The story is unfolding...", tick).color(ACCENT),
                rows[2],
            );
        }

        if state.is_complete {
            let ending = Paragraph::new(vec![
                Line::styled(
                    "The End!",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Line::raw("What an amazing adventure! Want to create another story?"),
                Line::styled("Press Ctrl-N to start a new adventure", Style::default().fg(Color::Gray)),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(ending, rows[3]);
            return;
        }

        let input_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(2)])
            .split(rows[3]);
        self.input
            .render(frame, input_rows[0], state.can_continue(), ACCENT);

        let highlighted = (self.next_idea + QUICK_IDEAS.len() - 1) % QUICK_IDEAS.len();
        let mut spans = vec![Span::styled("Quick ideas: ", Style::default().fg(Color::Gray))];
        for (i, idea) in QUICK_IDEAS.iter().enumerate() {
            let style = if self.next_idea > 0 && i == highlighted {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!("[{idea}] "), style));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).wrap(ratatui::widgets::Wrap { trim: true }),
            input_rows[1],
        );
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect, state: &SessionState) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(20)])
            .split(area);

        let stats = format!(
            "Your Story Adventure · {} words · {} exchanges · {} · {}",
            state.total_word_count(),
            state.message_count,
            state.config.age_group.label(),
            state.config.content_filter.label(),
        );
        frame.render_widget(
            Paragraph::new(stats).style(Style::default().add_modifier(Modifier::BOLD)),
            columns[0],
        );
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(ACCENT))
                .percent(u16::from(state.story_progress())),
            columns[1],
        );
    }
}
