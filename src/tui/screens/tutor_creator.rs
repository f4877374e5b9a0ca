//! Tutor session setup

use super::{
    filter_description, filter_options, is_ctrl, rejection_message, retry_catalogs, KeyHints,
    Outcome,
};
use crate::api::{subject_display_name, AgeGroup};
use crate::runtime::DispatchError;
use crate::state_machine::{validation, ConfigPatch, Event, SessionState, TutorSetup};
use crate::tui::widgets::{step, Button, Loader, Select, TextField};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

const ACCENT: Color = Color::Cyan;
const EXAMPLES_SHOWN: usize = 3;

/// Offered until the subject catalog arrives
const DEFAULT_SUBJECTS: [&str; 6] = ["math", "science", "language", "social_studies", "art", "general"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Subject,
    Question,
    Filter,
    Age,
    Start,
}

impl Field {
    const ORDER: [Field; 5] = [
        Field::Subject,
        Field::Question,
        Field::Filter,
        Field::Age,
        Field::Start,
    ];
}

fn age_explanation(age_group: AgeGroup) -> &'static str {
    match age_group {
        AgeGroup::Preschool => "Very simple explanations with basic concepts",
        AgeGroup::EarlyReader => "Clear explanations with practical examples",
        AgeGroup::Preteen => "Detailed explanations with deeper concepts",
    }
}

#[derive(Debug)]
pub struct TutorCreatorScreen {
    /// Index into `subject_options`; 0 is "any subject"
    subject: usize,
    question: TextField,
    focus: Field,
    next_example: usize,
}

impl Default for TutorCreatorScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TutorCreatorScreen {
    pub fn new() -> Self {
        Self {
            subject: 0,
            question: TextField::new(
                "What would you like to learn about? (Optional)",
                "How do plants grow? What is 5 + 3? Why is the sky blue?",
            ),
            focus: Field::Subject,
            next_example: 0,
        }
    }

    /// `None` first, then the subjects the service offers
    fn subject_options(state: &SessionState) -> Vec<Option<String>> {
        let subjects: Vec<String> = match &state.subjects {
            Some(catalog) if !catalog.available_subjects.is_empty() => {
                catalog.available_subjects.clone()
            }
            _ => DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
        };
        std::iter::once(None)
            .chain(subjects.into_iter().map(Some))
            .collect()
    }

    pub fn selected_subject(&self, state: &SessionState) -> Option<String> {
        Self::subject_options(state)
            .into_iter()
            .nth(self.subject)
            .flatten()
    }

    pub fn question_error(&self) -> Option<&str> {
        self.question.error()
    }

    fn examples<'s>(&self, state: &'s SessionState) -> &'s [String] {
        match (&state.subjects, self.selected_subject(state)) {
            (Some(catalog), Some(subject)) => catalog.examples(&subject, EXAMPLES_SHOWN),
            _ => &[],
        }
    }

    fn submit(&mut self, state: &SessionState) -> Outcome {
        let text = self.question.text();
        let initial_question = match validation::initial_question(Some(&text)) {
            Ok(q) => q.map(str::to_string),
            Err(e) => {
                self.question.set_error(e.to_string());
                self.focus = Field::Question;
                return Outcome::Handled;
            }
        };

        Outcome::submit(Event::StartTutor(TutorSetup {
            subject: self.selected_subject(state),
            age_group: state.config.age_group,
            content_filter: state.config.content_filter,
            initial_question,
        }))
    }

    fn change_select(&mut self, state: &SessionState, forward: bool) -> Outcome {
        let config = &state.config;
        match self.focus {
            Field::Subject => {
                let count = Self::subject_options(state).len();
                let indices: Vec<usize> = (0..count).collect();
                let next = step(&indices, self.subject, forward).unwrap_or(0);
                if next != self.subject {
                    // A question about the old subject would be confusing
                    self.question.clear();
                    self.next_example = 0;
                }
                self.subject = next;
                Outcome::Handled
            }
            Field::Filter => step(&filter_options(state), config.content_filter, forward)
                .map_or(Outcome::Ignored, |f| {
                    Outcome::dispatch(Event::SetConfig(ConfigPatch::content_filter(f)))
                }),
            Field::Age => step(&AgeGroup::ALL, config.age_group, forward)
                .map_or(Outcome::Ignored, |a| {
                    Outcome::dispatch(Event::SetConfig(ConfigPatch::age_group(a)))
                }),
            _ => Outcome::Ignored,
        }
    }

    fn move_focus(&mut self, forward: bool) {
        self.focus = step(&Field::ORDER, self.focus, forward).unwrap_or(Field::Subject);
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &SessionState) -> Outcome {
        if state.is_generating {
            return Outcome::Ignored;
        }
        if is_ctrl(&key, 'g') {
            let examples = self.examples(state);
            if examples.is_empty() {
                return Outcome::Ignored;
            }
            let example = examples[self.next_example % examples.len()].clone();
            self.next_example += 1;
            self.question.set_text(&example);
            self.focus = Field::Question;
            return Outcome::Handled;
        }
        if is_ctrl(&key, 'r') {
            return retry_catalogs(state, true);
        }

        match key.code {
            KeyCode::Tab => {
                self.move_focus(true);
                Outcome::Handled
            }
            KeyCode::BackTab => {
                self.move_focus(false);
                Outcome::Handled
            }
            KeyCode::Enter => match self.focus {
                Field::Question | Field::Start => self.submit(state),
                _ => {
                    self.move_focus(true);
                    Outcome::Handled
                }
            },
            KeyCode::Left | KeyCode::Right
                if matches!(self.focus, Field::Subject | Field::Filter | Field::Age) =>
            {
                self.change_select(state, key.code == KeyCode::Right)
            }
            _ if self.focus == Field::Question => {
                if self.question.handle_key(key) {
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
            Some(message) => self.question.set_error(message),
            None if result.is_ok() => {
                self.question.clear();
                self.focus = Field::Subject;
            }
            None => {}
        }
    }

    pub fn key_hints(&self) -> KeyHints {
        &[
            ("Tab", "next field"),
            ("←/→", "change setting"),
            ("Enter", "start"),
            ("Ctrl-G", "example"),
            ("Ctrl-R", "reload lists"),
            ("Esc", "modes"),
        ]
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &SessionState, tick: usize) {
        if state.is_generating {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(45), Constraint::Length(1), Constraint::Min(0)])
                .split(area);
            frame.render_widget(
                Loader::new("Preparing your learning session...", tick).color(ACCENT),
                rows[1],
            );
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Length(4), // Subject
                Constraint::Length(5), // Question
                Constraint::Length(4), // Settings
                Constraint::Length(2), // Tip
                Constraint::Length(3), // Button
                Constraint::Min(0),    // Examples
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new("Learning Assistant")
                .alignment(Alignment::Center)
                .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            rows[0],
        );

        let subject = self.selected_subject(state);
        let (subject_label, subject_description) = match &subject {
            Some(s) => (
                subject_display_name(s),
                state
                    .subjects
                    .as_ref()
                    .and_then(|c| c.subject_descriptions.get(s))
                    .map_or("", String::as_str),
            ),
            None => ("Any Subject", "Ask about anything!"),
        };
        frame.render_widget(
            Select::new("Subject Area (Optional)", subject_label)
                .description(subject_description)
                .accent(ACCENT)
                .focused(self.focus == Field::Subject),
            rows[1],
        );

        self.question
            .render(frame, rows[2], self.focus == Field::Question, ACCENT);

        let config = &state.config;
        let settings = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[3]);
        frame.render_widget(
            Select::new("Learning Style", config.content_filter.label())
                .description(filter_description(state, config.content_filter))
                .accent(ACCENT)
                .focused(self.focus == Field::Filter),
            settings[0],
        );
        frame.render_widget(
            Select::new("Age Group", config.age_group.label())
                .description(age_explanation(config.age_group))
                .accent(ACCENT)
                .focused(self.focus == Field::Age),
            settings[1],
        );

        frame.render_widget(
            Paragraph::new(format!(
                "Learning Tip: I'll adapt my explanations for {} with a {} approach!",
                config.age_group.label().to_lowercase(),
                config.content_filter.label().to_lowercase(),
            ))
            .style(Style::default().fg(Color::Gray)),
            rows[4],
        );

        let label = if self.question.is_empty() {
            "Start Learning Session"
        } else {
            "Ask Question"
        };
        frame.render_widget(
            Button::new(label)
                .accent(ACCENT)
                .focused(self.focus == Field::Start),
            rows[5],
        );

        let examples = self.examples(state);
        if let (Some(subject), false) = (&subject, examples.is_empty()) {
            let mut lines = vec![Line::styled(
                format!("{} Examples (Ctrl-G)", subject_display_name(subject)),
                Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            )];
            lines.extend(
                examples
                    .iter()
                    .map(|e| Line::styled(format!("  • {e}"), Style::default().fg(Color::Gray))),
            );
            frame.render_widget(Paragraph::new(lines), rows[6]);
        }
    }
}
