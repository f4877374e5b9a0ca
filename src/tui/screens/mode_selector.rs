//! Pick story or tutor mode

use super::{KeyHints, Outcome};
use crate::state_machine::{Event, Mode, SessionState};
use crate::tui::layout::mode_color;
use crate::tui::widgets::Card;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

fn highlights(mode: Mode) -> &'static str {
    match mode {
        Mode::Story => {
            "Create magical stories together\n\n\
             • Tell us your idea and watch it come to life\n\
             • Decide what happens next\n\
             • Pick the length and the hero's name"
        }
        Mode::Tutor => {
            "Ask questions and learn new things\n\n\
             • Math, science, language and more\n\
             • Friendly answers for your age\n\
             • Follow-up questions to keep exploring"
        }
    }
}

#[derive(Debug, Default)]
pub struct ModeSelectorScreen {
    cursor: usize,
}

impl ModeSelectorScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> Mode {
        Mode::ALL[self.cursor % Mode::ALL.len()]
    }

    /// Start the cursor on the current mode when the selector opens
    pub fn sync(&mut self, state: &SessionState) {
        if let Some(i) = state.mode.and_then(|m| Mode::ALL.iter().position(|x| *x == m)) {
            self.cursor = i;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &SessionState) -> Outcome {
        match key.code {
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab => {
                self.cursor = self.cursor.saturating_sub(1);
                Outcome::Handled
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                self.cursor = (self.cursor + 1).min(Mode::ALL.len() - 1);
                Outcome::Handled
            }
            KeyCode::Char('1') => Outcome::dispatch(Event::SelectMode(Mode::Story)),
            KeyCode::Char('2') => Outcome::dispatch(Event::SelectMode(Mode::Tutor)),
            KeyCode::Enter => Outcome::dispatch(Event::SelectMode(self.highlighted())),
            KeyCode::Esc if state.mode.is_some() => Outcome::dispatch(Event::DismissModeSelector),
            _ => Outcome::Ignored,
        }
    }

    pub fn key_hints(&self, state: &SessionState) -> KeyHints {
        if state.mode.is_some() {
            &[("←/→", "choose"), ("Enter", "start"), ("Esc", "back"), ("Ctrl-C", "quit")]
        } else {
            &[("←/→", "choose"), ("Enter", "start"), ("Ctrl-C", "quit")]
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(9),
                Constraint::Min(0),
            ])
            .split(area);

        let title = Paragraph::new("Choose Your Adventure!\nWhat would you like to do today?")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(title, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        for (i, mode) in Mode::ALL.into_iter().enumerate() {
            let accent = if i == self.cursor {
                mode_color(Some(mode))
            } else {
                Color::DarkGray
            };
            let card = Card::new(mode.name(), highlights(mode)).accent(accent);
            frame.render_widget(card, columns[i]);
        }
    }
}
