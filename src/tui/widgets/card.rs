//! Cards for transcripts and menus

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

/// Greedy word wrap by character count. Words longer than `width` are
/// split; explicit newlines start a new line.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            let needed = if current_len == 0 { chars.len() } else { current_len + 1 + chars.len() };
            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(chars.iter());
                current_len += chars.len();
                continue;
            }

            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
            }
            while chars.len() > width {
                let rest = chars.split_off(width);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            current_len = chars.len();
            current = chars.into_iter().collect();
        }
        lines.push(current);
    }

    lines
}

/// A titled block of text with a colored accent
#[derive(Debug, Clone)]
pub struct Card<'a> {
    title: &'a str,
    body: &'a str,
    accent: Color,
}

impl<'a> Card<'a> {
    pub fn new(title: &'a str, body: &'a str) -> Self {
        Self {
            title,
            body,
            accent: Color::Magenta,
        }
    }

    pub fn accent(mut self, color: Color) -> Self {
        self.accent = color;
        self
    }

    /// Flattened lines for stacking in a scrolling transcript
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let bar = Span::styled("▌ ", Style::default().fg(self.accent));
        let mut lines = vec![Line::from(vec![
            bar.clone(),
            Span::styled(
                self.title.to_string(),
                Style::default().fg(self.accent).add_modifier(Modifier::BOLD),
            ),
        ])];
        let text_width = usize::from(width.saturating_sub(2));
        for line in wrap_text(self.body, text_width) {
            lines.push(Line::from(vec![bar.clone(), Span::raw(line)]));
        }
        lines.push(Line::default());
        lines
    }
}

impl Widget for Card<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.body)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.accent))
                    .title(Span::styled(
                        self.title,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
            )
            .render(area, buf);
    }
}

/// Cards stacked top to bottom, pinned to the newest entry.
///
/// `scroll_back` moves the view up by that many lines from the bottom.
#[derive(Debug, Clone)]
pub struct CardStack<'a> {
    cards: Vec<Card<'a>>,
    scroll_back: u16,
}

impl<'a> CardStack<'a> {
    pub fn new(cards: Vec<Card<'a>>) -> Self {
        Self {
            cards,
            scroll_back: 0,
        }
    }

    pub fn scroll_back(mut self, lines: u16) -> Self {
        self.scroll_back = lines;
        self
    }

    pub fn line_count(&self, width: u16) -> usize {
        self.cards.iter().map(|c| c.lines(width).len()).sum()
    }
}

impl Widget for CardStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line<'static>> = self
            .cards
            .iter()
            .flat_map(|c| c.lines(area.width))
            .collect();
        let overflow = lines.len().saturating_sub(usize::from(area.height));
        let top = overflow.saturating_sub(usize::from(self.scroll_back));
        let top = u16::try_from(top).unwrap_or(u16::MAX);
        Paragraph::new(lines).scroll((top, 0)).render(area, buf);
    }
}
