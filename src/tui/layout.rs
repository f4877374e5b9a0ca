//! Screen frame: header, body and footer
//!
//! Every screen draws into `body`; the header and footer come from the
//! shared session state.

use crate::state_machine::{Mode, SessionState, View};
use crate::tui::widgets::Loader;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const PRODUCT_NAME: &str = "StoryBot";

/// Computed layout areas for the UI
pub struct AppLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn compute(size: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(1),    // Screen
                Constraint::Length(2), // Status + key hints
            ])
            .split(size);

        Self {
            header: chunks[0],
            body: chunks[1],
            footer: chunks[2],
        }
    }
}

pub fn mode_color(mode: Option<Mode>) -> Color {
    match mode {
        Some(Mode::Story) => Color::Magenta,
        Some(Mode::Tutor) => Color::Cyan,
        None => Color::Yellow,
    }
}

/// Product name, or the mode's name and description during a session
pub fn render_header(frame: &mut Frame, area: Rect, state: &SessionState) {
    let view = state.view();
    let accent = mode_color(view.mode());

    let (title, subtitle) = match (view, state.mode) {
        (View::StoryChat | View::TutorChat, Some(mode)) => (mode.name(), mode.description()),
        _ => (PRODUCT_NAME, "Stories and answers made for curious kids"),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {title} "),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(subtitle, Style::default().fg(Color::Gray)),
    ];
    if let Some(mode) = state.mode {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" {} · {} ", mode.name(), state.config.age_group.label()),
            Style::default().fg(Color::Black).bg(mode_color(Some(mode))),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(accent)),
    );
    frame.render_widget(header, area);
}

/// Error banner (or generation status) above the key hints
pub fn render_footer(
    frame: &mut Frame,
    area: Rect,
    state: &SessionState,
    hints: &[(&str, &str)],
    tick: usize,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    if let Some(error) = &state.error {
        let banner = Line::from(vec![
            Span::styled(
                " Oops! ",
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {error} "), Style::default().fg(Color::Red)),
            Span::styled("(Ctrl-E to dismiss)", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(banner, rows[0]);
    } else if state.is_generating {
        let message = match state.mode {
            Some(Mode::Tutor) => "Thinking...",
            _ => "Creating your story...",
        };
        frame.render_widget(
            Loader::new(message, tick).color(mode_color(state.mode)),
            rows[0],
        );
    }

    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default().fg(Color::Black).bg(Color::Gray),
        ));
        spans.push(Span::styled(
            format!(" {action}  "),
            Style::default().fg(Color::Gray),
        ));
    }
    frame.render_widget(Line::from(spans), rows[1]);
}
