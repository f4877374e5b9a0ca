//! Session state types

use crate::api::{AgeGroup, ContentFilter, FilterCatalog, StoryLength, SubjectCatalog};
use serde::{Deserialize, Serialize};

/// Which kind of session the child picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Story,
    Tutor,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Story, Mode::Tutor];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Story => "Story Mode",
            Mode::Tutor => "Tutor Mode",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Mode::Story => "Create magical stories together",
            Mode::Tutor => "Ask questions and learn new things",
        }
    }
}

/// The screen the dispatcher mounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    ModeSelector,
    StoryCreator,
    StoryChat,
    TutorCreator,
    TutorChat,
}

impl View {
    /// Select the screen for a state. First matching rule wins.
    pub fn of(state: &SessionState) -> Self {
        if state.show_mode_selector {
            return View::ModeSelector;
        }
        let active = state.has_active_session();
        match (state.mode, active) {
            (Some(Mode::Story), true) => View::StoryChat,
            (Some(Mode::Tutor), true) => View::TutorChat,
            (Some(Mode::Story), false) => View::StoryCreator,
            (Some(Mode::Tutor), false) => View::TutorCreator,
            (None, _) => View::ModeSelector,
        }
    }

    pub fn mode(self) -> Option<Mode> {
        match self {
            View::ModeSelector => None,
            View::StoryCreator | View::StoryChat => Some(Mode::Story),
            View::TutorCreator | View::TutorChat => Some(Mode::Tutor),
        }
    }
}

/// User-adjustable generation settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub content_filter: ContentFilter,
    pub age_group: AgeGroup,
    pub story_length: StoryLength,
    pub character_name: Option<String>,
}

/// Partial update for `SessionConfig`. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigPatch {
    pub content_filter: Option<ContentFilter>,
    pub age_group: Option<AgeGroup>,
    pub story_length: Option<StoryLength>,
    /// `Some(None)` clears the character name
    pub character_name: Option<Option<String>>,
}

impl ConfigPatch {
    pub fn content_filter(filter: ContentFilter) -> Self {
        Self {
            content_filter: Some(filter),
            ..Self::default()
        }
    }

    pub fn age_group(age_group: AgeGroup) -> Self {
        Self {
            age_group: Some(age_group),
            ..Self::default()
        }
    }

    pub fn story_length(length: StoryLength) -> Self {
        Self {
            story_length: Some(length),
            ..Self::default()
        }
    }

    pub fn character_name(name: Option<String>) -> Self {
        Self {
            character_name: Some(name),
            ..Self::default()
        }
    }

    pub fn apply(&self, config: &mut SessionConfig) {
        if let Some(filter) = self.content_filter {
            config.content_filter = filter;
        }
        if let Some(age_group) = self.age_group {
            config.age_group = age_group;
        }
        if let Some(length) = self.story_length {
            config.story_length = length;
        }
        if let Some(name) = &self.character_name {
            config.character_name.clone_from(name);
        }
    }
}

/// Settings for opening a tutor session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorSetup {
    pub subject: Option<String>,
    pub age_group: AgeGroup,
    pub content_filter: ContentFilter,
    pub initial_question: Option<String>,
}

/// Everything the screens show, owned by the session runtime
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub mode: Option<Mode>,
    pub show_mode_selector: bool,
    pub is_generating: bool,
    pub error: Option<String>,
    pub config: SessionConfig,

    /// Remote session reference
    pub session_id: Option<String>,
    /// Bumped whenever the session is discarded; responses tagged with an
    /// older generation are ignored.
    pub generation: u64,

    pub story_segments: Vec<String>,
    pub user_inputs: Vec<String>,
    pub is_complete: bool,
    /// Exchanges the service has recorded for the story
    pub message_count: usize,

    pub tutor_questions: Vec<String>,
    pub tutor_answers: Vec<String>,
    /// Greeting shown when a tutor session opens without a question
    pub tutor_welcome: Option<String>,
    pub current_subject: Option<String>,
    pub follow_up_suggestions: Vec<String>,

    pub filters: Option<FilterCatalog>,
    pub subjects: Option<SubjectCatalog>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        View::of(self)
    }

    /// True once the transcript holds anything
    pub fn has_active_session(&self) -> bool {
        !self.story_segments.is_empty()
            || !self.tutor_answers.is_empty()
            || self.tutor_welcome.is_some()
    }

    pub fn has_story_session(&self) -> bool {
        self.session_id.is_some() && !self.story_segments.is_empty()
    }

    pub fn has_tutor_session(&self) -> bool {
        self.session_id.is_some()
            && (self.tutor_welcome.is_some() || !self.tutor_answers.is_empty())
    }

    pub fn can_continue(&self) -> bool {
        self.has_story_session() && !self.is_generating && !self.is_complete
    }

    pub fn can_ask(&self) -> bool {
        self.has_tutor_session() && !self.is_generating
    }

    pub fn total_word_count(&self) -> usize {
        self.story_segments
            .iter()
            .map(|segment| segment.split_whitespace().count())
            .sum()
    }

    /// Percent of the expected story told so far
    pub fn story_progress(&self) -> u8 {
        if self.is_complete {
            return 100;
        }
        let target = self.config.story_length.target_segments();
        let percent = (self.story_segments.len() * 100 / target).min(100);
        u8::try_from(percent).unwrap_or(100)
    }

    /// Drop the transcript and every per-session flag, keeping mode and config
    pub(crate) fn clear_session(&mut self) {
        self.session_id = None;
        self.generation += 1;
        self.is_generating = false;
        self.error = None;
        self.story_segments.clear();
        self.user_inputs.clear();
        self.is_complete = false;
        self.message_count = 0;
        self.tutor_questions.clear();
        self.tutor_answers.clear();
        self.tutor_welcome = None;
        self.current_subject = None;
        self.follow_up_suggestions.clear();
    }
}
