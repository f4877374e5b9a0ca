//! Tutor conversation with follow-up suggestions

use super::{is_ctrl, rejection_message, KeyHints, Outcome};
use crate::api::subject_display_name;
use crate::runtime::DispatchError;
use crate::state_machine::{validation, Event, SessionState};
use crate::tui::widgets::{Card, CardStack, Loader, TextField};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

const ACCENT: Color = Color::Cyan;
const SCROLL_STEP: u16 = 5;

/// Offered when the tutor has not suggested anything yet
pub const QUICK_EXAMPLES: [&str; 5] = [
    "How do plants grow?",
    "What is 10 ÷ 2?",
    "Why do we sleep?",
    "How do I write a story?",
    "What makes music?",
];

fn suggestions(state: &SessionState) -> Vec<&str> {
    if state.follow_up_suggestions.is_empty() {
        QUICK_EXAMPLES.to_vec()
    } else {
        state.follow_up_suggestions.iter().map(String::as_str).collect()
    }
}

#[derive(Debug)]
pub struct TutorChatScreen {
    input: TextField,
    selected: Option<usize>,
    scroll_back: u16,
}

impl Default for TutorChatScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TutorChatScreen {
    pub fn new() -> Self {
        Self {
            input: TextField::new("Ask another question", "What else would you like to know?"),
            selected: None,
            scroll_back: 0,
        }
    }

    pub fn input_error(&self) -> Option<&str> {
        self.input.error()
    }

    /// The highlighted suggestion, if it still exists
    pub fn selected_suggestion<'s>(&self, state: &'s SessionState) -> Option<&'s str> {
        self.selected.and_then(|i| suggestions(state).get(i).copied())
    }

    fn ask(&mut self, question: &str, state: &SessionState) -> Outcome {
        match validation::tutor_question(question) {
            Ok(question) => Outcome::submit(Event::AskQuestion {
                question: question.to_string(),
                subject: state.current_subject.clone(),
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
            self.selected = None;
            self.scroll_back = 0;
            return Outcome::dispatch(Event::ResetSession);
        }
        if is_ctrl(&key, 's') {
            if !state.can_ask() {
                return Outcome::Ignored;
            }
            return match self.selected_suggestion(state) {
                Some(suggestion) => {
                    let suggestion = suggestion.to_string();
                    self.ask(&suggestion, state)
                }
                None => Outcome::Ignored,
            };
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
            KeyCode::Tab | KeyCode::BackTab if state.can_ask() => {
                let count = suggestions(state).len();
                self.selected = match (self.selected, key.code) {
                    (None, KeyCode::Tab) => Some(0),
                    (None, _) => Some(count - 1),
                    (Some(i), KeyCode::Tab) => Some((i + 1) % count),
                    (Some(i), _) => Some((i + count - 1) % count),
                };
                Outcome::Handled
            }
            KeyCode::Enter if state.can_ask() => {
                let text = self.input.text();
                self.ask(&text, state)
            }
            _ if state.can_ask() => {
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
                self.selected = None;
                self.scroll_back = 0;
            }
            None => {}
        }
    }

    pub fn key_hints(&self) -> KeyHints {
        &[
            ("Enter", "ask"),
            ("Tab", "pick suggestion"),
            ("Ctrl-S", "ask suggestion"),
            ("Ctrl-N", "new session"),
            ("Esc", "modes"),
        ]
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &SessionState, tick: usize) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Session info
                Constraint::Min(3),    // Transcript
                Constraint::Length(1), // Loader
                Constraint::Length(5), // Suggestions
                Constraint::Length(3), // Input
            ])
            .split(area);

        let subject = state
            .current_subject
            .as_deref()
            .map_or("Any Subject", subject_display_name);
        let asked = state.tutor_questions.len();
        let info = format!(
            "Learning Session · {subject} · {} · You've asked {asked} question{}",
            state.config.age_group.label(),
            if asked == 1 { "" } else { "s" },
        );
        frame.render_widget(
            Paragraph::new(info).style(Style::default().add_modifier(Modifier::BOLD)),
            rows[0],
        );

        let tutor_title = format!("Your Tutor · {subject}");
        let answer_titles: Vec<String> = (1..=state.tutor_answers.len())
            .map(|n| format!("{tutor_title} · Answer {n}"))
            .collect();
        let mut cards = Vec::new();
        if let Some(welcome) = &state.tutor_welcome {
            cards.push(Card::new(&tutor_title, welcome).accent(ACCENT));
        }
        for (i, answer) in state.tutor_answers.iter().enumerate() {
            if let Some(question) = state.tutor_questions.get(i) {
                cards.push(Card::new("You", question).accent(Color::Blue));
            }
            cards.push(Card::new(&answer_titles[i], answer).accent(ACCENT));
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
                Loader::new("Your tutor is thinking...", tick).color(ACCENT),
                rows[2],
            );
        }

        self.render_suggestions(frame, rows[3], state);
        self.input.render(frame, rows[4], state.can_ask(), ACCENT);
    }

    fn render_suggestions(&self, frame: &mut Frame, area: Rect, state: &SessionState) {
        let title = if state.follow_up_suggestions.is_empty() {
            "Quick examples"
        } else {
            "Follow-up Questions"
        };
        let selected = self.selected_suggestion(state);
        let lines: Vec<Line> = suggestions(state)
            .into_iter()
            .map(|s| {
                if Some(s) == selected {
                    Line::from(vec![
                        Span::styled("▸ ", Style::default().fg(Color::Yellow)),
                        Span::styled(
                            s,
                            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                        ),
                    ])
                } else {
                    Line::from(vec![Span::raw("  "), Span::raw(s)])
                }
            })
            .collect();
        let style = if state.can_ask() {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(
            Paragraph::new(lines).style(style).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(title),
            ),
            area,
        );
    }
}
