//! Mock implementations for testing
//!
//! These mocks enable runtime tests without a running generation service.

use crate::api::{
    ApiError, FilterCatalog, GenerationService, HealthResponse, StoryContinueRequest,
    StoryResponse, StoryStartRequest, SubjectCatalog, TutorAskRequest, TutorResponse,
    TutorStartRequest,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

// ============================================================================
// Mock Generation Service
// ============================================================================

/// A request the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    StartStory(StoryStartRequest),
    ContinueStory(StoryContinueRequest),
    StartTutor(TutorStartRequest),
    AskQuestion(TutorAskRequest),
    ListFilters,
    ListSubjects,
    Health,
}

/// Mock service that returns queued responses
#[derive(Default)]
pub struct MockGenerationService {
    story_responses: Mutex<VecDeque<Result<StoryResponse, ApiError>>>,
    tutor_responses: Mutex<VecDeque<Result<TutorResponse, ApiError>>>,
    filters: Mutex<Option<Result<FilterCatalog, ApiError>>>,
    subjects: Mutex<Option<Result<SubjectCatalog, ApiError>>>,
    /// Record of all calls made
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl MockGenerationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a story segment for the next start or continue call
    pub fn queue_story(&self, response: StoryResponse) {
        self.story_responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a tutor answer for the next start or ask call
    pub fn queue_tutor(&self, response: TutorResponse) {
        self.tutor_responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a failure for the next story call
    pub fn queue_story_error(&self, error: ApiError) {
        self.story_responses.lock().unwrap().push_back(Err(error));
    }

    /// Queue a failure for the next tutor call
    pub fn queue_tutor_error(&self, error: ApiError) {
        self.tutor_responses.lock().unwrap().push_back(Err(error));
    }

    pub fn set_filters(&self, result: Result<FilterCatalog, ApiError>) {
        *self.filters.lock().unwrap() = Some(result);
    }

    pub fn set_subjects(&self, result: Result<SubjectCatalog, ApiError>) {
        *self.subjects.lock().unwrap() = Some(result);
    }

    /// Get recorded calls
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_story(&self) -> Result<StoryResponse, ApiError> {
        self.story_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("No mock story queued")))
    }

    fn next_tutor(&self) -> Result<TutorResponse, ApiError> {
        self.tutor_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("No mock answer queued")))
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    async fn start_story(&self, request: &StoryStartRequest) -> Result<StoryResponse, ApiError> {
        self.record(RecordedCall::StartStory(request.clone()));
        self.next_story()
    }

    async fn continue_story(
        &self,
        request: &StoryContinueRequest,
    ) -> Result<StoryResponse, ApiError> {
        self.record(RecordedCall::ContinueStory(request.clone()));
        self.next_story()
    }

    async fn start_tutor(&self, request: &TutorStartRequest) -> Result<TutorResponse, ApiError> {
        self.record(RecordedCall::StartTutor(request.clone()));
        self.next_tutor()
    }

    async fn ask_question(&self, request: &TutorAskRequest) -> Result<TutorResponse, ApiError> {
        self.record(RecordedCall::AskQuestion(request.clone()));
        self.next_tutor()
    }

    async fn list_filters(&self) -> Result<FilterCatalog, ApiError> {
        self.record(RecordedCall::ListFilters);
        self.filters
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(FilterCatalog::default()))
    }

    async fn list_subjects(&self) -> Result<SubjectCatalog, ApiError> {
        self.record(RecordedCall::ListSubjects);
        self.subjects
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(SubjectCatalog::default()))
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.record(RecordedCall::Health);
        Ok(HealthResponse {
            status: "healthy".to_string(),
            version: None,
            llm_provider: None,
            session_backend: None,
        })
    }
}

// ============================================================================
// Gated Mock Service (for late response testing)
// ============================================================================

/// Mock whose story calls block until the test releases them
pub struct GatedMockService {
    inner: MockGenerationService,
    gate: Arc<Semaphore>,
}

impl GatedMockService {
    pub fn new() -> Self {
        Self {
            inner: MockGenerationService::new(),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    pub fn queue_story(&self, response: StoryResponse) {
        self.inner.queue_story(response);
    }

    /// Let one held story call return
    pub fn release_one(&self) {
        self.gate.add_permits(1);
    }

    /// Number of calls that reached the service
    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationService for GatedMockService {
    async fn start_story(&self, request: &StoryStartRequest) -> Result<StoryResponse, ApiError> {
        self.inner.record(RecordedCall::StartStory(request.clone()));
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| ApiError::network("gate closed"))?;
        self.inner.next_story()
    }

    async fn continue_story(
        &self,
        request: &StoryContinueRequest,
    ) -> Result<StoryResponse, ApiError> {
        self.inner.continue_story(request).await
    }

    async fn start_tutor(&self, request: &TutorStartRequest) -> Result<TutorResponse, ApiError> {
        self.inner.start_tutor(request).await
    }

    async fn ask_question(&self, request: &TutorAskRequest) -> Result<TutorResponse, ApiError> {
        self.inner.ask_question(request).await
    }

    async fn list_filters(&self) -> Result<FilterCatalog, ApiError> {
        self.inner.list_filters().await
    }

    async fn list_subjects(&self) -> Result<SubjectCatalog, ApiError> {
        self.inner.list_subjects().await
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.inner.health().await
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn story(session_id: &str, content: &str, is_complete: bool) -> StoryResponse {
    StoryResponse {
        session_id: session_id.to_string(),
        story_content: content.to_string(),
        choices: None,
        is_complete,
        word_count: content.split_whitespace().count(),
        content_filter_applied: None,
        message_count: 1,
    }
}

pub fn tutor(session_id: &str, answer: &str, subject: &str, suggestions: &[&str]) -> TutorResponse {
    TutorResponse {
        session_id: session_id.to_string(),
        answer: answer.to_string(),
        subject_detected: Some(subject.to_string()),
        follow_up_suggestions: Some(suggestions.iter().map(|s| s.to_string()).collect()),
        educational_level: None,
        content_filter_applied: None,
        message_count: 1,
        is_appropriate: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AgeGroup, ContentFilter};
    use crate::runtime::{spawn_session, DispatchError, SessionHandle};
    use crate::state_machine::{
        ConfigPatch, Mode, SessionState, TransitionError, TutorSetup, ValidationError, View,
    };
    use std::time::Duration;

    async fn settled(handle: &SessionHandle) -> SessionState {
        tokio::time::timeout(Duration::from_secs(2), handle.settled())
            .await
            .expect("runtime did not settle")
            .unwrap()
    }

    fn tutor_setup(subject: Option<&str>, question: Option<&str>) -> TutorSetup {
        TutorSetup {
            subject: subject.map(str::to_string),
            age_group: AgeGroup::EarlyReader,
            content_filter: ContentFilter::Educational,
            initial_question: question.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_mock_service_queue() {
        let mock = MockGenerationService::new();
        mock.queue_story(story("s1", "Once upon a time", false));

        let request = StoryStartRequest {
            prompt: "a brave little dragon".to_string(),
            character_name: None,
            age_group: AgeGroup::EarlyReader,
            story_length: Default::default(),
            content_filter: ContentFilter::Educational,
        };
        assert!(mock.start_story(&request).await.is_ok());
        // Nothing left queued
        assert!(mock.start_story(&request).await.is_err());
        assert_eq!(mock.recorded_calls().len(), 2);
    }

    /// Integration test: starting a story shows the first segment
    #[tokio::test]
    async fn test_start_story() {
        let mock = Arc::new(MockGenerationService::new());
        mock.queue_story(story("story-1", "Once upon a time there was a dragon.", false));

        let (handle, _task) = spawn_session(mock.clone());
        handle.select_mode(Mode::Story).await.unwrap();
        handle
            .set_config(ConfigPatch::character_name(Some("Luna".to_string())))
            .await
            .unwrap();
        handle
            .start_story("A dragon who loves to bake")
            .await
            .unwrap();

        let state = settled(&handle).await;
        assert_eq!(state.story_segments.len(), 1);
        assert_eq!(state.session_id.as_deref(), Some("story-1"));
        assert!(!state.is_generating);
        assert_eq!(state.view(), View::StoryChat);

        let started = mock.recorded_calls().into_iter().find_map(|call| match call {
            RecordedCall::StartStory(request) => Some(request),
            _ => None,
        });
        let request = started.expect("start_story was not called");
        assert_eq!(request.prompt, "A dragon who loves to bake");
        assert_eq!(request.character_name.as_deref(), Some("Luna"));
    }

    /// Integration test: a short prompt never reaches the service
    #[tokio::test]
    async fn test_short_prompt_is_rejected_locally() {
        let mock = Arc::new(MockGenerationService::new());
        let (handle, _task) = spawn_session(mock.clone());

        let result = handle.start_story("a dog").await;
        assert_eq!(
            result,
            Err(DispatchError::Rejected(TransitionError::Validation(
                ValidationError::PromptTooShort
            )))
        );
        assert!(mock.recorded_calls().is_empty());
        assert!(handle.state().story_segments.is_empty());
    }

    /// Integration test: continuations append in order
    #[tokio::test]
    async fn test_continue_story_twice() {
        let mock = Arc::new(MockGenerationService::new());
        mock.queue_story(story("story-1", "The dragon woke up.", false));
        mock.queue_story(story("story-1", "She found a cake.", false));
        mock.queue_story(story("story-1", "And everyone shared it.", true));

        let (handle, _task) = spawn_session(mock.clone());
        handle.start_story("A sleepy dragon story").await.unwrap();
        settled(&handle).await;

        handle.continue_story("look for food").await.unwrap();
        settled(&handle).await;
        handle.continue_story("share the cake").await.unwrap();
        let state = settled(&handle).await;

        assert_eq!(
            state.story_segments,
            vec![
                "The dragon woke up.",
                "She found a cake.",
                "And everyone shared it.",
            ]
        );
        assert_eq!(state.user_inputs, vec!["look for food", "share the cake"]);
        assert!(state.is_complete);
        assert!(!state.can_continue());

        let continued: Vec<_> = mock
            .recorded_calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::ContinueStory(request) => Some(request),
                _ => None,
            })
            .collect();
        assert_eq!(continued.len(), 2);
        assert!(continued.iter().all(|r| r.session_id == "story-1"));
    }

    /// Integration test: a second submission while generating is refused
    #[tokio::test]
    async fn test_busy_guard() {
        let mock = Arc::new(GatedMockService::new());
        mock.queue_story(story("story-1", "Once upon a time.", false));

        let (handle, _task) = spawn_session(mock.clone());
        handle.start_story("A story about a kind robot").await.unwrap();
        assert!(handle.state().is_generating);

        let second = handle.start_story("A story about a kind robot").await;
        assert_eq!(second, Err(DispatchError::Rejected(TransitionError::Busy)));

        mock.release_one();
        let state = settled(&handle).await;
        assert_eq!(state.story_segments.len(), 1);
        assert_eq!(mock.call_count(), 1);
    }

    /// Integration test: tutor without an opening question
    #[tokio::test]
    async fn test_start_tutor_without_question() {
        let mock = Arc::new(MockGenerationService::new());
        mock.queue_tutor(tutor(
            "tutor-1",
            "Hi! What would you like to learn about numbers?",
            "general",
            &["How do I add?"],
        ));

        let (handle, _task) = spawn_session(mock.clone());
        handle.select_mode(Mode::Tutor).await.unwrap();
        handle
            .start_tutor(tutor_setup(Some("math"), None))
            .await
            .unwrap();

        let state = settled(&handle).await;
        assert_eq!(state.current_subject.as_deref(), Some("math"));
        assert!(state.tutor_questions.is_empty());
        assert!(state.tutor_welcome.is_some());
        assert_eq!(state.follow_up_suggestions, vec!["How do I add?"]);
        assert_eq!(state.view(), View::TutorChat);
    }

    /// Integration test: asking follow-up questions
    #[tokio::test]
    async fn test_tutor_question_cycle() {
        let mock = Arc::new(MockGenerationService::new());
        mock.queue_tutor(tutor("tutor-1", "Plants use sunlight!", "science", &[]));
        mock.queue_tutor(tutor(
            "tutor-1",
            "Leaves are green because of chlorophyll.",
            "science",
            &["What is chlorophyll?"],
        ));

        let (handle, _task) = spawn_session(mock.clone());
        handle
            .start_tutor(tutor_setup(None, Some("How do plants eat?")))
            .await
            .unwrap();
        settled(&handle).await;
        handle
            .ask_question("Why are leaves green?", None)
            .await
            .unwrap();

        let state = settled(&handle).await;
        assert_eq!(
            state.tutor_questions,
            vec!["How do plants eat?", "Why are leaves green?"]
        );
        assert_eq!(state.tutor_answers.len(), 2);
        assert_eq!(state.current_subject.as_deref(), Some("science"));
        assert_eq!(state.follow_up_suggestions, vec!["What is chlorophyll?"]);
    }

    /// Integration test: a failed request keeps the transcript
    #[tokio::test]
    async fn test_failure_keeps_transcript() {
        let mock = Arc::new(MockGenerationService::new());
        mock.queue_story(story("story-1", "The ship set sail.", false));
        mock.queue_story_error(
            ApiError::server_error("Failed to continue story").with_detail("Failed to continue story"),
        );

        let (handle, _task) = spawn_session(mock.clone());
        handle.start_story("Pirates looking for treasure").await.unwrap();
        settled(&handle).await;
        handle.continue_story("dig on the island").await.unwrap();

        let state = settled(&handle).await;
        assert_eq!(state.story_segments, vec!["The ship set sail."]);
        assert!(state.user_inputs.is_empty());
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to continue story. Please try again.")
        );

        handle.clear_error().await.unwrap();
        assert!(handle.state().error.is_none());
    }

    /// Integration test: resetting while a request is in flight discards its answer
    #[tokio::test]
    async fn test_reset_discards_late_response() {
        let mock = Arc::new(GatedMockService::new());
        mock.queue_story(story("story-1", "This should never be shown.", false));

        let (handle, _task) = spawn_session(mock.clone());
        handle.start_story("A story about a lost kitten").await.unwrap();
        let requested = handle.state().generation;
        handle.reset_session().await.unwrap();

        let state = handle.state();
        assert!(!state.is_generating);
        assert_eq!(state.generation, requested + 1);

        mock.release_one();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let state = handle.state();
        assert!(state.story_segments.is_empty());
        assert!(state.session_id.is_none());
        assert_eq!(state.view(), View::StoryCreator);
    }

    /// Integration test: choosing a mode loads its catalogs once
    #[tokio::test]
    async fn test_select_mode_loads_catalogs() {
        let mock = Arc::new(MockGenerationService::new());
        mock.set_subjects(Ok(SubjectCatalog {
            available_subjects: vec!["math".to_string(), "science".to_string()],
            ..Default::default()
        }));

        let (handle, _task) = spawn_session(mock.clone());
        handle.select_mode(Mode::Tutor).await.unwrap();

        let mut rx = handle.subscribe();
        let state = tokio::time::timeout(
            Duration::from_secs(2),
            rx.wait_for(|s| s.filters.is_some() && s.subjects.is_some()),
        )
        .await
        .expect("catalogs did not load")
        .unwrap()
        .clone();
        assert_eq!(
            state.subjects.map(|s| s.available_subjects.len()),
            Some(2)
        );

        // Already loaded, so switching back does not fetch again
        handle.select_mode(Mode::Tutor).await.unwrap();
        let calls = mock.recorded_calls();
        assert_eq!(
            calls.iter().filter(|c| **c == RecordedCall::ListSubjects).count(),
            1
        );
        assert_eq!(
            calls.iter().filter(|c| **c == RecordedCall::ListFilters).count(),
            1
        );
    }

    /// Integration test: a catalog failure surfaces as an error message
    #[tokio::test]
    async fn test_catalog_failure_sets_error() {
        let mock = Arc::new(MockGenerationService::new());
        mock.set_filters(Err(ApiError::network("connection refused")));

        let (handle, _task) = spawn_session(mock.clone());
        handle.load_filters().await.unwrap();

        let mut rx = handle.subscribe();
        let state = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| s.error.is_some()))
            .await
            .expect("error was not reported")
            .unwrap()
            .clone();
        assert!(state.filters.is_none());
    }

    /// Integration test: a failed subject load can be retried
    #[tokio::test]
    async fn test_subject_load_retry() {
        let mock = Arc::new(MockGenerationService::new());
        mock.set_subjects(Err(ApiError::network("connection refused")));

        let (handle, _task) = spawn_session(mock.clone());
        handle.select_mode(Mode::Tutor).await.unwrap();
        let mut rx = handle.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| s.error.is_some()))
            .await
            .expect("error was not reported")
            .unwrap();

        mock.set_subjects(Ok(SubjectCatalog {
            available_subjects: vec!["art".to_string()],
            ..Default::default()
        }));
        handle.load_subjects().await.unwrap();
        let state = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| s.subjects.is_some()))
            .await
            .expect("subjects were not loaded")
            .unwrap()
            .clone();
        assert_eq!(
            state.subjects.map(|s| s.available_subjects),
            Some(vec!["art".to_string()])
        );
        assert_eq!(
            mock.recorded_calls()
                .iter()
                .filter(|c| **c == RecordedCall::ListSubjects)
                .count(),
            2
        );
    }

    /// Integration test: starting a tutor session ends the story session
    #[tokio::test]
    async fn test_start_tutor_replaces_story_session() {
        let mock = Arc::new(MockGenerationService::new());
        mock.queue_story(story("story-1", "Once upon a time", false));
        mock.queue_tutor(tutor("tutor-1", "Let's learn!", "math", &[]));

        let (handle, _task) = spawn_session(mock.clone());
        handle.start_story("A story about a lost kitten").await.unwrap();
        settled(&handle).await;
        handle
            .start_tutor(tutor_setup(Some("math"), None))
            .await
            .unwrap();

        let state = settled(&handle).await;
        assert_eq!(state.view(), View::TutorChat);
        assert!(state.story_segments.is_empty());
        assert_eq!(state.session_id.as_deref(), Some("tutor-1"));

        let result = handle.continue_story("and then").await;
        assert_eq!(
            result,
            Err(DispatchError::Rejected(TransitionError::NoActiveSession))
        );
        assert!(!mock
            .recorded_calls()
            .iter()
            .any(|c| matches!(c, RecordedCall::ContinueStory(_))));
    }

    /// Integration test: dropping every handle stops the runtime
    #[tokio::test]
    async fn test_runtime_stops_when_handles_drop() {
        let (handle, task) = spawn_session(MockGenerationService::new());
        handle.show_mode_selector().await.unwrap();
        handle.dismiss_mode_selector().await.unwrap();
        drop(handle);

        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("runtime did not stop")
            .unwrap();
    }
}
