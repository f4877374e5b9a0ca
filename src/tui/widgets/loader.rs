//! Spinner shown while the service is working

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone)]
pub struct Loader<'a> {
    message: &'a str,
    tick: usize,
    color: Color,
}

impl<'a> Loader<'a> {
    pub fn new(message: &'a str, tick: usize) -> Self {
        Self {
            message,
            tick,
            color: Color::Magenta,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn frame(tick: usize) -> &'static str {
        FRAMES[tick % FRAMES.len()]
    }
}

impl Widget for Loader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Line::from(vec![
            Span::styled(
                format!("{} ", Self::frame(self.tick)),
                Style::default().fg(self.color),
            ),
            Span::styled(
                self.message,
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ])
        .render(area, buf);
    }
}
