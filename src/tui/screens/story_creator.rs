//! Story idea form and settings

use super::{
    filter_description, filter_options, is_ctrl, rejection_message, retry_catalogs, KeyHints,
    Outcome,
};
use crate::api::{AgeGroup, StoryLength};
use crate::runtime::DispatchError;
use crate::state_machine::{validation, ConfigPatch, Event, SessionState};
use crate::tui::widgets::{step, Button, Loader, Select, TextField};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const ACCENT: Color = Color::Magenta;
const CHARACTER_NAME_MAX_CHARS: usize = 40;

pub const STORY_IDEAS: [&str; 6] = [
    "A magical library where books come to life",
    "A friendly monster who loves to garden",
    "A space adventure with talking planets",
    "An underwater city made of coral and pearls",
    "A time-traveling treehouse",
    "A superhero who saves the day with kindness",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Prompt,
    Character,
    Filter,
    Age,
    Length,
    Create,
}

impl Field {
    const ORDER: [Field; 6] = [
        Field::Prompt,
        Field::Character,
        Field::Filter,
        Field::Age,
        Field::Length,
        Field::Create,
    ];
}

#[derive(Debug)]
pub struct StoryCreatorScreen {
    prompt: TextField,
    character: TextField,
    focus: Field,
    next_idea: usize,
}

impl Default for StoryCreatorScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryCreatorScreen {
    pub fn new() -> Self {
        Self {
            prompt: TextField::new(
                "What should your story be about?",
                "A brave dragon who loves to bake cookies...",
            ),
            character: TextField::new(
                "Main Character Name (Optional)",
                "Give your main character a special name!",
            )
            .max_chars(CHARACTER_NAME_MAX_CHARS),
            focus: Field::Prompt,
            next_idea: 0,
        }
    }

    pub fn prompt_error(&self) -> Option<&str> {
        self.prompt.error()
    }

    fn submit(&mut self) -> Outcome {
        let text = self.prompt.text();
        let prompt = match validation::story_prompt(&text) {
            Ok(prompt) => prompt.to_string(),
            Err(e) => {
                self.prompt.set_error(e.to_string());
                self.focus = Field::Prompt;
                return Outcome::Handled;
            }
        };
        let name = self.character.text().trim().to_string();
        let name = (!name.is_empty()).then_some(name);

        Outcome::Submit(vec![
            Event::SetConfig(ConfigPatch::character_name(name)),
            Event::StartStory { prompt },
        ])
    }

    /// Left/Right on a select field
    fn change_select(&self, state: &SessionState, forward: bool) -> Outcome {
        let config = &state.config;
        let patch = match self.focus {
            Field::Filter => {
                step(&filter_options(state), config.content_filter, forward)
                    .map(ConfigPatch::content_filter)
            }
            Field::Age => step(&AgeGroup::ALL, config.age_group, forward).map(ConfigPatch::age_group),
            Field::Length => {
                step(&StoryLength::ALL, config.story_length, forward).map(ConfigPatch::story_length)
            }
            _ => None,
        };
        patch.map_or(Outcome::Ignored, |p| Outcome::dispatch(Event::SetConfig(p)))
    }

    fn move_focus(&mut self, forward: bool) {
        self.focus = step(&Field::ORDER, self.focus, forward).unwrap_or(Field::Prompt);
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &SessionState) -> Outcome {
        if state.is_generating {
            return Outcome::Ignored;
        }
        if is_ctrl(&key, 'g') {
            let idea = STORY_IDEAS[self.next_idea % STORY_IDEAS.len()];
            self.next_idea += 1;
            self.prompt.set_text(idea);
            self.focus = Field::Prompt;
            return Outcome::Handled;
        }
        if is_ctrl(&key, 'r') {
            return retry_catalogs(state, false);
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
                Field::Prompt | Field::Character | Field::Create => self.submit(),
                _ => {
                    self.move_focus(true);
                    Outcome::Handled
                }
            },
            KeyCode::Left | KeyCode::Right
                if matches!(self.focus, Field::Filter | Field::Age | Field::Length) =>
            {
                self.change_select(state, key.code == KeyCode::Right)
            }
            _ => {
                let field = match self.focus {
                    Field::Prompt => &mut self.prompt,
                    Field::Character => &mut self.character,
                    _ => return Outcome::Ignored,
                };
                if field.handle_key(key) {
                    Outcome::Handled
                } else {
                    Outcome::Ignored
                }
            }
        }
    }

    pub fn submitted(&mut self, result: &Result<(), DispatchError>) {
        match rejection_message(result) {
            Some(message) => self.prompt.set_error(message),
            None if result.is_ok() => {
                self.prompt.clear();
                self.focus = Field::Prompt;
            }
            None => {}
        }
    }

    pub fn key_hints(&self) -> KeyHints {
        &[
            ("Tab", "next field"),
            ("←/→", "change setting"),
            ("Enter", "create story"),
            ("Ctrl-G", "idea"),
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
                Loader::new("Creating your magical story...", tick).color(ACCENT),
                rows[1],
            );
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Length(5), // Prompt
                Constraint::Length(3), // Character
                Constraint::Length(4), // Settings
                Constraint::Length(2), // Summary
                Constraint::Length(3), // Button
                Constraint::Min(0),    // Ideas
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new("Let's Create a Story!")
                .alignment(Alignment::Center)
                .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            rows[0],
        );

        self.prompt
            .render(frame, rows[1], self.focus == Field::Prompt, ACCENT);
        self.character
            .render(frame, rows[2], self.focus == Field::Character, ACCENT);

        let config = &state.config;
        let settings = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(rows[3]);
        frame.render_widget(
            Select::new("Story Type", config.content_filter.label())
                .description(filter_description(state, config.content_filter))
                .accent(ACCENT)
                .focused(self.focus == Field::Filter),
            settings[0],
        );
        frame.render_widget(
            Select::new("Age Group", config.age_group.label())
                .description(config.age_group.description())
                .accent(ACCENT)
                .focused(self.focus == Field::Age),
            settings[1],
        );
        frame.render_widget(
            Select::new("Story Length", config.story_length.label())
                .description(config.story_length.description())
                .accent(ACCENT)
                .focused(self.focus == Field::Length),
            settings[2],
        );

        let summary = format!(
            "We'll create a {} perfect for {} with a {} theme!",
            config.story_length.label().to_lowercase(),
            config.age_group.label().to_lowercase(),
            config.content_filter.label().to_lowercase(),
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Did you know? ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(summary),
            ])),
            rows[4],
        );

        frame.render_widget(
            Button::new("Create Story")
                .accent(ACCENT)
                .focused(self.focus == Field::Create)
                .disabled(self.prompt.is_empty()),
            rows[5],
        );

        let mut ideas = vec![Line::styled(
            "Need some ideas? (Ctrl-G)",
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )];
        ideas.extend(
            STORY_IDEAS
                .iter()
                .map(|idea| Line::styled(format!("  • {idea}"), Style::default().fg(Color::Gray))),
        );
        frame.render_widget(Paragraph::new(ideas), rows[6]);
    }
}
