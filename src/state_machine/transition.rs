//! Pure state transition function
//!
//! Every change to the session goes through `transition`. It performs no
//! I/O: service calls come back as `Effect`s for the runtime to run, and
//! their results re-enter as response events.

use super::state::{Mode, SessionState, TutorSetup};
use super::validation::{self, ValidationError};
use super::{Effect, Event};
use crate::api::{
    StoryContinueRequest, StoryResponse, StoryStartRequest, TutorAskRequest, TutorResponse,
    TutorStartRequest,
};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Still working on the last request, please wait")]
    Busy,
    #[error("There is no session to continue, start a new one first")]
    NoActiveSession,
    #[error("This story has reached its ending")]
    StoryComplete,
    #[error("Response for session generation {response} arrived after generation {current} began")]
    StaleResponse { response: u64, current: u64 },
}

/// Pure transition function
pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    if let Some(response) = event.response_generation() {
        if response != state.generation {
            return Err(TransitionError::StaleResponse {
                response,
                current: state.generation,
            });
        }
    }

    let mut next = state.clone();

    match event {
        // ============================================================
        // Navigation and configuration
        // ============================================================
        Event::SelectMode(mode) => {
            if state.mode != Some(mode) {
                next.clear_session();
                next.mode = Some(mode);
            }
            next.show_mode_selector = false;
            Ok(TransitionResult::new(next).with_effects(catalog_loads(state, mode)))
        }

        Event::ShowModeSelector => {
            next.show_mode_selector = true;
            Ok(TransitionResult::new(next))
        }

        Event::DismissModeSelector => {
            next.show_mode_selector = false;
            Ok(TransitionResult::new(next))
        }

        Event::SetConfig(patch) => {
            patch.apply(&mut next.config);
            Ok(TransitionResult::new(next))
        }

        Event::ClearError => {
            next.error = None;
            Ok(TransitionResult::new(next))
        }

        Event::ResetSession => {
            next.clear_session();
            next.show_mode_selector = false;
            Ok(TransitionResult::new(next))
        }

        Event::LoadFilters => Ok(TransitionResult::new(next).with_effect(Effect::LoadFilters)),

        Event::LoadSubjects => Ok(TransitionResult::new(next).with_effect(Effect::LoadSubjects)),

        // ============================================================
        // Story submissions
        // ============================================================
        Event::StartStory { prompt } => {
            let prompt = validation::story_prompt(&prompt)?;
            ensure_idle(state)?;

            let request = StoryStartRequest {
                prompt: prompt.to_string(),
                character_name: state
                    .config
                    .character_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
                age_group: state.config.age_group,
                story_length: state.config.story_length,
                content_filter: state.config.content_filter,
            };
            begin_request(&mut next, Mode::Story);
            let generation = next.generation;
            Ok(TransitionResult::new(next).with_effect(Effect::StartStory {
                generation,
                request,
            }))
        }

        Event::ContinueStory { input } => {
            let input = validation::story_continuation(&input)?;
            ensure_idle(state)?;
            if !state.has_story_session() {
                return Err(TransitionError::NoActiveSession);
            }
            if state.is_complete {
                return Err(TransitionError::StoryComplete);
            }

            let request = StoryContinueRequest {
                session_id: state.session_id.clone().unwrap_or_default(),
                user_input: input.to_string(),
            };
            begin_request(&mut next, Mode::Story);
            let generation = next.generation;
            Ok(TransitionResult::new(next).with_effect(Effect::ContinueStory {
                generation,
                request,
            }))
        }

        // ============================================================
        // Tutor submissions
        // ============================================================
        Event::StartTutor(TutorSetup {
            subject,
            age_group,
            content_filter,
            initial_question,
        }) => {
            let question = validation::initial_question(initial_question.as_deref())?;
            ensure_idle(state)?;

            let request = TutorStartRequest {
                subject: subject.filter(|s| !s.trim().is_empty()),
                age_group,
                content_filter,
                initial_question: question.map(str::to_string),
            };
            begin_request(&mut next, Mode::Tutor);
            let generation = next.generation;
            Ok(TransitionResult::new(next).with_effect(Effect::StartTutor {
                generation,
                request,
            }))
        }

        Event::AskQuestion { question, subject } => {
            let question = validation::tutor_question(&question)?;
            ensure_idle(state)?;
            if !state.has_tutor_session() {
                return Err(TransitionError::NoActiveSession);
            }

            let request = TutorAskRequest {
                session_id: state.session_id.clone().unwrap_or_default(),
                question: question.to_string(),
                subject_hint: subject.or_else(|| state.current_subject.clone()),
            };
            begin_request(&mut next, Mode::Tutor);
            let generation = next.generation;
            Ok(TransitionResult::new(next).with_effect(Effect::AskQuestion {
                generation,
                request,
            }))
        }

        // ============================================================
        // Service responses
        // ============================================================
        Event::StoryStarted { response, .. } => {
            let StoryResponse {
                session_id,
                story_content,
                is_complete,
                message_count,
                ..
            } = response;
            next.session_id = Some(session_id);
            next.story_segments = vec![story_content];
            next.user_inputs.clear();
            next.is_complete = is_complete;
            next.message_count = message_count;
            finish_request(&mut next);
            Ok(TransitionResult::new(next))
        }

        Event::StoryContinued {
            user_input,
            response,
            ..
        } => {
            next.user_inputs.push(user_input);
            next.story_segments.push(response.story_content);
            next.is_complete = next.is_complete || response.is_complete;
            next.message_count = response.message_count;
            finish_request(&mut next);
            Ok(TransitionResult::new(next))
        }

        Event::TutorStarted {
            subject,
            question,
            response,
            ..
        } => {
            let TutorResponse {
                session_id,
                answer,
                subject_detected,
                follow_up_suggestions,
                ..
            } = response;
            next.session_id = Some(session_id);
            next.tutor_questions.clear();
            next.tutor_answers.clear();
            next.tutor_welcome = None;
            match question {
                Some(question) => {
                    next.tutor_questions.push(question);
                    next.tutor_answers.push(answer);
                }
                None => next.tutor_welcome = Some(answer),
            }
            next.current_subject = subject.or(subject_detected);
            next.follow_up_suggestions = follow_up_suggestions.unwrap_or_default();
            finish_request(&mut next);
            Ok(TransitionResult::new(next))
        }

        Event::QuestionAnswered {
            question, response, ..
        } => {
            next.tutor_questions.push(question);
            next.tutor_answers.push(response.answer);
            next.follow_up_suggestions = response.follow_up_suggestions.unwrap_or_default();
            if next.current_subject.is_none() {
                next.current_subject = response.subject_detected;
            }
            finish_request(&mut next);
            Ok(TransitionResult::new(next))
        }

        Event::RequestFailed { error, .. } => {
            next.error = Some(error.user_message());
            next.is_generating = false;
            Ok(TransitionResult::new(next))
        }

        Event::FiltersLoaded(catalog) => {
            next.filters = Some(catalog);
            Ok(TransitionResult::new(next))
        }

        Event::SubjectsLoaded(catalog) => {
            next.subjects = Some(catalog);
            Ok(TransitionResult::new(next))
        }

        Event::CatalogFailed(error) => {
            next.error = Some(error.user_message());
            Ok(TransitionResult::new(next))
        }
    }
}

fn ensure_idle(state: &SessionState) -> Result<(), TransitionError> {
    if state.is_generating {
        Err(TransitionError::Busy)
    } else {
        Ok(())
    }
}

/// Raise the generating flag; switching modes first drops the other transcript
fn begin_request(state: &mut SessionState, mode: Mode) {
    if state.mode != Some(mode) {
        state.clear_session();
        state.mode = Some(mode);
    }
    state.is_generating = true;
    state.error = None;
}

fn finish_request(state: &mut SessionState) {
    state.is_generating = false;
    state.error = None;
}

/// Catalogs a creator screen needs that haven't been fetched yet
fn catalog_loads(state: &SessionState, mode: Mode) -> Vec<Effect> {
    let mut effects = Vec::new();
    if state.filters.is_none() {
        effects.push(Effect::LoadFilters);
    }
    if mode == Mode::Tutor && state.subjects.is_none() {
        effects.push(Effect::LoadSubjects);
    }
    effects
}
