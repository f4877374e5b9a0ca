//! Effects produced by state transitions

use crate::api::{StoryContinueRequest, StoryStartRequest, TutorAskRequest, TutorStartRequest};

/// Service calls to run after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartStory {
        generation: u64,
        request: StoryStartRequest,
    },
    ContinueStory {
        generation: u64,
        request: StoryContinueRequest,
    },
    StartTutor {
        generation: u64,
        request: TutorStartRequest,
    },
    AskQuestion {
        generation: u64,
        request: TutorAskRequest,
    },
    LoadFilters,
    LoadSubjects,
}

impl Effect {
    /// Story and tutor requests hold the generating flag; catalog loads do not
    pub fn holds_generating_flag(&self) -> bool {
        !matches!(self, Effect::LoadFilters | Effect::LoadSubjects)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Effect::StartStory { .. } => "start_story",
            Effect::ContinueStory { .. } => "continue_story",
            Effect::StartTutor { .. } => "start_tutor",
            Effect::AskQuestion { .. } => "ask_question",
            Effect::LoadFilters => "load_filters",
            Effect::LoadSubjects => "load_subjects",
        }
    }
}
