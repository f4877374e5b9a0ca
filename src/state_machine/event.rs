//! Events that drive the session state machine

use super::state::{ConfigPatch, Mode, TutorSetup};
use crate::api::{ApiError, FilterCatalog, StoryResponse, SubjectCatalog, TutorResponse};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User actions
    SelectMode(Mode),
    ShowModeSelector,
    DismissModeSelector,
    SetConfig(ConfigPatch),
    ClearError,
    ResetSession,
    StartStory {
        prompt: String,
    },
    ContinueStory {
        input: String,
    },
    StartTutor(TutorSetup),
    AskQuestion {
        question: String,
        subject: Option<String>,
    },
    LoadFilters,
    LoadSubjects,

    // Service responses, tagged with the session generation they belong to
    StoryStarted {
        generation: u64,
        response: StoryResponse,
    },
    StoryContinued {
        generation: u64,
        user_input: String,
        response: StoryResponse,
    },
    TutorStarted {
        generation: u64,
        subject: Option<String>,
        question: Option<String>,
        response: TutorResponse,
    },
    QuestionAnswered {
        generation: u64,
        question: String,
        response: TutorResponse,
    },
    RequestFailed {
        generation: u64,
        error: ApiError,
    },
    FiltersLoaded(FilterCatalog),
    SubjectsLoaded(SubjectCatalog),
    CatalogFailed(ApiError),
}

impl Event {
    /// Generation a service response was requested under
    pub fn response_generation(&self) -> Option<u64> {
        match self {
            Event::StoryStarted { generation, .. }
            | Event::StoryContinued { generation, .. }
            | Event::TutorStarted { generation, .. }
            | Event::QuestionAnswered { generation, .. }
            | Event::RequestFailed { generation, .. } => Some(*generation),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::SelectMode(_) => "select_mode",
            Event::ShowModeSelector => "show_mode_selector",
            Event::DismissModeSelector => "dismiss_mode_selector",
            Event::SetConfig(_) => "set_config",
            Event::ClearError => "clear_error",
            Event::ResetSession => "reset_session",
            Event::StartStory { .. } => "start_story",
            Event::ContinueStory { .. } => "continue_story",
            Event::StartTutor(_) => "start_tutor",
            Event::AskQuestion { .. } => "ask_question",
            Event::LoadFilters => "load_filters",
            Event::LoadSubjects => "load_subjects",
            Event::StoryStarted { .. } => "story_started",
            Event::StoryContinued { .. } => "story_continued",
            Event::TutorStarted { .. } => "tutor_started",
            Event::QuestionAnswered { .. } => "question_answered",
            Event::RequestFailed { .. } => "request_failed",
            Event::FiltersLoaded(_) => "filters_loaded",
            Event::SubjectsLoaded(_) => "subjects_loaded",
            Event::CatalogFailed(_) => "catalog_failed",
        }
    }
}
