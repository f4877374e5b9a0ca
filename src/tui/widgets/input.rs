//! Text field built on `tui-textarea`

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders},
    Frame,
};
use tui_textarea::TextArea;

/// Editable field with a title, placeholder and an inline error line.
///
/// Enter and Tab are never consumed so screens can use them for submit
/// and focus changes.
#[derive(Debug)]
pub struct TextField {
    textarea: TextArea<'static>,
    title: String,
    placeholder: String,
    max_chars: Option<usize>,
    error: Option<String>,
}

impl TextField {
    pub fn new(title: impl Into<String>, placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        Self {
            textarea: Self::fresh_textarea(&placeholder, Vec::new()),
            title: title.into(),
            placeholder,
            max_chars: None,
            error: None,
        }
    }

    /// Refuse input past this many characters
    pub fn max_chars(mut self, max: usize) -> Self {
        self.max_chars = Some(max);
        self
    }

    fn fresh_textarea(placeholder: &str, lines: Vec<String>) -> TextArea<'static> {
        let mut textarea = if lines.is_empty() {
            TextArea::default()
        } else {
            TextArea::new(lines)
        };
        textarea.set_placeholder_text(placeholder.to_string());
        textarea.set_cursor_line_style(Style::default());
        textarea.move_cursor(tui_textarea::CursorMove::End);
        textarea
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(|l| l.is_empty())
    }

    pub fn set_text(&mut self, text: &str) {
        self.textarea = Self::fresh_textarea(&self.placeholder, vec![text.to_string()]);
        self.error = None;
    }

    pub fn clear(&mut self) {
        self.textarea = Self::fresh_textarea(&self.placeholder, Vec::new());
        self.error = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// Feed a key to the field. Returns true when the text changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => return false,
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
            KeyCode::Char(_) => {
                if let Some(max) = self.max_chars {
                    if self.text().chars().count() >= max {
                        return false;
                    }
                }
            }
            _ => {}
        }

        let changed = self.textarea.input(key);
        if changed {
            self.error = None;
        }
        changed
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, accent: Color) {
        let border = match (&self.error, focused) {
            (Some(_), _) => Style::default().fg(Color::Red),
            (None, true) => Style::default().fg(accent),
            (None, false) => Style::default().fg(Color::Gray),
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(self.title.clone());
        if let Some(error) = &self.error {
            block = block.title_bottom(Line::styled(
                format!(" {error} "),
                Style::default().fg(Color::Red),
            ));
        } else if let Some(max) = self.max_chars {
            let count = self.text().chars().count();
            block = block.title_bottom(
                Line::styled(format!(" {count}/{max} "), Style::default().fg(Color::DarkGray))
                    .right_aligned(),
            );
        }

        let cursor = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(cursor);
        self.textarea.set_block(block);
        frame.render_widget(&self.textarea, area);
    }
}
