//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::api::{AgeGroup, ApiError, ContentFilter, StoryLength, StoryResponse, TutorResponse};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_mode() -> impl Strategy<Value = Option<Mode>> {
    prop_oneof![Just(None), Just(Some(Mode::Story)), Just(Some(Mode::Tutor))]
}

fn arb_age_group() -> impl Strategy<Value = AgeGroup> {
    prop_oneof![
        Just(AgeGroup::Preschool),
        Just(AgeGroup::EarlyReader),
        Just(AgeGroup::Preteen),
    ]
}

fn arb_content_filter() -> impl Strategy<Value = ContentFilter> {
    prop_oneof![
        Just(ContentFilter::Educational),
        Just(ContentFilter::MoralValues),
        Just(ContentFilter::FunOnly),
    ]
}

fn arb_story_length() -> impl Strategy<Value = StoryLength> {
    prop_oneof![
        Just(StoryLength::Short),
        Just(StoryLength::Medium),
        Just(StoryLength::Long),
    ]
}

fn arb_config() -> impl Strategy<Value = SessionConfig> {
    (
        arb_content_filter(),
        arb_age_group(),
        arb_story_length(),
        proptest::option::of("[A-Za-z]{1,10}"),
    )
        .prop_map(
            |(content_filter, age_group, story_length, character_name)| SessionConfig {
                content_filter,
                age_group,
                story_length,
                character_name,
            },
        )
}

fn arb_lines(max: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-zA-Z ]{1,30}", 0..max)
}

fn arb_state() -> impl Strategy<Value = SessionState> {
    (
        (arb_mode(), any::<bool>(), any::<bool>(), proptest::option::of("[a-z ]{1,20}")),
        (arb_config(), proptest::option::of("[a-z0-9]{8}"), 0u64..10),
        (arb_lines(4), arb_lines(4), any::<bool>()),
        (arb_lines(4), arb_lines(4), proptest::option::of("[a-zA-Z ]{1,20}")),
        (proptest::option::of("[a-z]{3,8}"), arb_lines(3)),
    )
        .prop_map(
            |(
                (mode, show_mode_selector, is_generating, error),
                (config, session_id, generation),
                (story_segments, user_inputs, is_complete),
                (tutor_questions, tutor_answers, tutor_welcome),
                (current_subject, follow_up_suggestions),
            )| SessionState {
                mode,
                show_mode_selector,
                is_generating,
                error,
                config,
                session_id,
                generation,
                story_segments,
                user_inputs,
                is_complete,
                message_count: 0,
                tutor_questions,
                tutor_answers,
                tutor_welcome,
                current_subject,
                follow_up_suggestions,
                filters: None,
                subjects: None,
            },
        )
}

fn story_response(content: String, is_complete: bool) -> StoryResponse {
    StoryResponse {
        session_id: "story-1".to_string(),
        story_content: content,
        choices: None,
        is_complete,
        word_count: 0,
        content_filter_applied: None,
        message_count: 0,
    }
}

fn tutor_response(answer: String, suggestions: Vec<String>) -> TutorResponse {
    TutorResponse {
        session_id: "tutor-1".to_string(),
        answer,
        subject_detected: Some("general".to_string()),
        follow_up_suggestions: Some(suggestions),
        educational_level: None,
        content_filter_applied: None,
        message_count: 0,
        is_appropriate: true,
    }
}

/// User actions plus responses tagged with a small generation so that
/// both current and stale responses show up in sequences
fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        prop_oneof![Just(Mode::Story), Just(Mode::Tutor)].prop_map(Event::SelectMode),
        Just(Event::ShowModeSelector),
        Just(Event::DismissModeSelector),
        arb_age_group().prop_map(|a| Event::SetConfig(ConfigPatch::age_group(a))),
        Just(Event::ClearError),
        Just(Event::ResetSession),
        "[a-zA-Z ]{0,30}".prop_map(|prompt| Event::StartStory { prompt }),
        "[a-zA-Z ]{0,12}".prop_map(|input| Event::ContinueStory { input }),
        (proptest::option::of("[a-z]{3,8}"), proptest::option::of("[a-zA-Z ]{0,12}")).prop_map(
            |(subject, initial_question)| Event::StartTutor(TutorSetup {
                subject,
                age_group: AgeGroup::EarlyReader,
                content_filter: ContentFilter::Educational,
                initial_question,
            })
        ),
        "[a-zA-Z ]{0,12}".prop_map(|question| Event::AskQuestion {
            question,
            subject: None
        }),
        (0u64..3, "[a-z ]{1,20}", any::<bool>()).prop_map(|(generation, content, done)| {
            Event::StoryStarted {
                generation,
                response: story_response(content, done),
            }
        }),
        (0u64..3, "[a-z ]{3,10}", "[a-z ]{1,20}", any::<bool>()).prop_map(
            |(generation, user_input, content, done)| Event::StoryContinued {
                generation,
                user_input,
                response: story_response(content, done),
            }
        ),
        (0u64..3, "[a-z ]{5,20}", arb_lines(3)).prop_map(|(generation, answer, suggestions)| {
            Event::QuestionAnswered {
                generation,
                question: "why is that".to_string(),
                response: tutor_response(answer, suggestions),
            }
        }),
        (0u64..3).prop_map(|generation| Event::RequestFailed {
            generation,
            error: ApiError::network("connection refused"),
        }),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Dispatcher: without a session the creator for the current mode is shown
    #[test]
    fn prop_inactive_session_shows_creator(mut state in arb_state()) {
        state.show_mode_selector = false;
        state.story_segments.clear();
        state.tutor_answers.clear();
        state.tutor_welcome = None;

        let expected = match state.mode {
            Some(Mode::Story) => View::StoryCreator,
            Some(Mode::Tutor) => View::TutorCreator,
            None => View::ModeSelector,
        };
        prop_assert_eq!(View::of(&state), expected);
    }

    // Dispatcher: exactly one screen, and the selector exactly when forced or modeless
    #[test]
    fn prop_selector_iff_forced_or_no_mode(state in arb_state()) {
        let view = View::of(&state);
        let selector = view == View::ModeSelector;
        prop_assert_eq!(selector, state.show_mode_selector || state.mode.is_none());
        if let Some(mode) = view.mode() {
            prop_assert_eq!(Some(mode), state.mode);
        }
    }

    // Short prompts never reach the service
    #[test]
    fn prop_short_prompt_never_requests(state in arb_state(), prompt in "[a-zA-Z ]{0,9}") {
        let result = transition(&state, Event::StartStory { prompt });
        prop_assert!(
            matches!(result, Err(TransitionError::Validation(_))),
            "expected validation error, got {:?}",
            result
        );
    }

    // Reset always clears the transcript
    #[test]
    fn prop_reset_clears_transcript(state in arb_state()) {
        let next = transition(&state, Event::ResetSession).unwrap().new_state;
        prop_assert!(next.story_segments.is_empty());
        prop_assert!(next.user_inputs.is_empty());
        prop_assert!(next.tutor_questions.is_empty());
        prop_assert!(next.tutor_answers.is_empty());
        prop_assert!(next.tutor_welcome.is_none());
        prop_assert!(!next.is_complete);
        prop_assert!(!next.is_generating);
        prop_assert_eq!(next.mode, state.mode);
        prop_assert_eq!(next.config, state.config);
    }

    // Setting one config field changes nothing else
    #[test]
    fn prop_set_age_group_changes_only_age_group(state in arb_state(), age in arb_age_group()) {
        let next = transition(&state, Event::SetConfig(ConfigPatch::age_group(age)))
            .unwrap()
            .new_state;
        let mut expected = state.clone();
        expected.config.age_group = age;
        prop_assert_eq!(next, expected);
    }

    // Responses from an older generation never change state
    #[test]
    fn prop_stale_responses_are_rejected(state in arb_state(), content in "[a-z ]{1,20}") {
        let stale = state.generation + 1;
        let result = transition(&state, Event::StoryStarted {
            generation: stale,
            response: story_response(content, false),
        });
        prop_assert!(
            matches!(result, Err(TransitionError::StaleResponse { .. })),
            "expected stale rejection, got {:?}",
            result
        );
    }

    // Failures keep the transcript and always clear the generating flag
    #[test]
    fn prop_failure_keeps_transcript(mut state in arb_state()) {
        state.is_generating = true;
        let next = transition(&state, Event::RequestFailed {
            generation: state.generation,
            error: ApiError::server_error("boom"),
        })
        .unwrap()
        .new_state;
        prop_assert!(!next.is_generating);
        prop_assert!(next.error.is_some());
        prop_assert_eq!(&next.story_segments, &state.story_segments);
        prop_assert_eq!(&next.tutor_answers, &state.tutor_answers);
        prop_assert_eq!(next.session_id, state.session_id);
    }

    // Starting a tutor session never inherits a story transcript
    #[test]
    fn prop_start_tutor_drops_story(mut state in arb_state(), subject in proptest::option::of("[a-z]{3,8}")) {
        state.mode = Some(Mode::Story);
        state.is_generating = false;
        let result = transition(&state, Event::StartTutor(TutorSetup {
            subject,
            age_group: state.config.age_group,
            content_filter: state.config.content_filter,
            initial_question: None,
        }))
        .unwrap();

        let next = &result.new_state;
        prop_assert_eq!(next.mode, Some(Mode::Tutor));
        prop_assert!(next.story_segments.is_empty());
        prop_assert!(next.user_inputs.is_empty());
        prop_assert!(next.session_id.is_none());
        prop_assert!(!next.has_story_session());
        prop_assert_eq!(next.generation, state.generation + 1);
        prop_assert!(matches!(
            &result.effects[..],
            [Effect::StartTutor { generation, .. }] if *generation == next.generation
        ), "expected a single StartTutor effect carrying the new generation");
    }

    // Starting a story never inherits a tutor transcript
    #[test]
    fn prop_start_story_drops_tutor(mut state in arb_state(), prompt in "[a-zA-Z]{10,30}") {
        state.mode = Some(Mode::Tutor);
        state.is_generating = false;
        let result = transition(&state, Event::StartStory { prompt }).unwrap();

        let next = &result.new_state;
        prop_assert_eq!(next.mode, Some(Mode::Story));
        prop_assert!(next.tutor_questions.is_empty());
        prop_assert!(next.tutor_answers.is_empty());
        prop_assert!(next.tutor_welcome.is_none());
        prop_assert!(next.session_id.is_none());
        prop_assert!(!next.has_tutor_session());
        prop_assert_eq!(next.generation, state.generation + 1);
    }

    // Invariants over event sequences starting from a fresh state
    #[test]
    fn prop_sequences_preserve_invariants(events in proptest::collection::vec(arb_event(), 0..25)) {
        let mut state = SessionState::new();

        for event in events {
            let Ok(result) = transition(&state, event) else {
                continue;
            };
            let previous = std::mem::replace(&mut state, result.new_state);

            prop_assert!(state.generation >= previous.generation);
            prop_assert!(state.user_inputs.len() <= state.story_segments.len());
            prop_assert!(state.tutor_questions.len() <= state.tutor_answers.len());

            // Requests carry the generation their response must match
            for effect in &result.effects {
                if let Effect::StartStory { generation, .. }
                | Effect::ContinueStory { generation, .. }
                | Effect::StartTutor { generation, .. }
                | Effect::AskQuestion { generation, .. } = effect
                {
                    prop_assert_eq!(*generation, state.generation);
                }
            }

            // Generation requests always raise the flag they will later clear
            let requests = result.effects.iter().filter(|e| e.holds_generating_flag()).count();
            prop_assert!(requests <= 1);
            if requests == 1 {
                prop_assert!(state.is_generating);
                prop_assert!(!previous.is_generating);
            }
        }
    }
}
