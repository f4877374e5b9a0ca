//! Option picker cycled with Left/Right

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

/// Next (or previous) option after `current`, wrapping at both ends.
/// An unknown `current` starts from the first option.
pub fn step<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|o| *o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    Some(options[next])
}

/// Labelled field showing one chosen option and its description
#[derive(Debug, Clone)]
pub struct Select<'a> {
    title: &'a str,
    value: &'a str,
    description: Option<&'a str>,
    accent: Color,
    focused: bool,
}

impl<'a> Select<'a> {
    pub fn new(title: &'a str, value: &'a str) -> Self {
        Self {
            title,
            value,
            description: None,
            accent: Color::Magenta,
            focused: false,
        }
    }

    pub fn description(mut self, description: &'a str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn accent(mut self, color: Color) -> Self {
        self.accent = color;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for Select<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(Color::Gray)
        };
        let arrows = if self.focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let mut lines = vec![Line::from(vec![
            Span::styled("◀ ", arrows),
            Span::styled(self.value, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(" ▶", arrows),
        ])];
        if let Some(description) = self.description {
            lines.push(Line::styled(description, Style::default().fg(Color::Gray)));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border)
                    .title(self.title),
            )
            .render(area, buf);
    }
}
