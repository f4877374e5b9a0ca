//! Content-generation service client
//!
//! The remote service owns story and tutor generation; this module only
//! describes its operations and talks to it over HTTP.

mod error;
mod http;
mod types;

pub use error::{ApiError, ApiErrorKind};
pub use http::{ClientConfig, HttpGenerationService};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Operations offered by the content-generation service
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Create a story and return its first segment
    async fn start_story(&self, request: &StoryStartRequest) -> Result<StoryResponse, ApiError>;

    /// Continue a story with the child's input
    async fn continue_story(&self, request: &StoryContinueRequest)
        -> Result<StoryResponse, ApiError>;

    /// Open a tutor session, optionally answering a first question
    async fn start_tutor(&self, request: &TutorStartRequest) -> Result<TutorResponse, ApiError>;

    /// Ask a question in an open tutor session
    async fn ask_question(&self, request: &TutorAskRequest) -> Result<TutorResponse, ApiError>;

    /// Content filters the service supports
    async fn list_filters(&self) -> Result<FilterCatalog, ApiError>;

    /// Tutor subjects with descriptions and example questions
    async fn list_subjects(&self) -> Result<SubjectCatalog, ApiError>;

    /// Service health
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}

#[async_trait]
impl<T: GenerationService + ?Sized> GenerationService for Arc<T> {
    async fn start_story(&self, request: &StoryStartRequest) -> Result<StoryResponse, ApiError> {
        (**self).start_story(request).await
    }

    async fn continue_story(
        &self,
        request: &StoryContinueRequest,
    ) -> Result<StoryResponse, ApiError> {
        (**self).continue_story(request).await
    }

    async fn start_tutor(&self, request: &TutorStartRequest) -> Result<TutorResponse, ApiError> {
        (**self).start_tutor(request).await
    }

    async fn ask_question(&self, request: &TutorAskRequest) -> Result<TutorResponse, ApiError> {
        (**self).ask_question(request).await
    }

    async fn list_filters(&self) -> Result<FilterCatalog, ApiError> {
        (**self).list_filters().await
    }

    async fn list_subjects(&self) -> Result<SubjectCatalog, ApiError> {
        (**self).list_subjects().await
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        (**self).health().await
    }
}

/// Logging wrapper for generation services
pub struct LoggingService<S> {
    inner: S,
}

impl<S: GenerationService> LoggingService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    fn record<T>(operation: &'static str, started: Instant, result: &Result<T, ApiError>) {
        let duration_ms = started.elapsed().as_millis();
        match result {
            Ok(_) => {
                tracing::info!(operation, duration_ms = %duration_ms, "Generation request completed");
            }
            Err(e) => {
                tracing::error!(
                    operation,
                    duration_ms = %duration_ms,
                    error = %e.message,
                    kind = ?e.kind,
                    retryable = e.kind.is_retryable(),
                    "Generation request failed"
                );
            }
        }
    }
}

#[async_trait]
impl<S: GenerationService> GenerationService for LoggingService<S> {
    async fn start_story(&self, request: &StoryStartRequest) -> Result<StoryResponse, ApiError> {
        let started = Instant::now();
        let result = self.inner.start_story(request).await;
        Self::record("start_story", started, &result);
        result
    }

    async fn continue_story(
        &self,
        request: &StoryContinueRequest,
    ) -> Result<StoryResponse, ApiError> {
        let started = Instant::now();
        let result = self.inner.continue_story(request).await;
        Self::record("continue_story", started, &result);
        result
    }

    async fn start_tutor(&self, request: &TutorStartRequest) -> Result<TutorResponse, ApiError> {
        let started = Instant::now();
        let result = self.inner.start_tutor(request).await;
        Self::record("start_tutor", started, &result);
        result
    }

    async fn ask_question(&self, request: &TutorAskRequest) -> Result<TutorResponse, ApiError> {
        let started = Instant::now();
        let result = self.inner.ask_question(request).await;
        Self::record("ask_question", started, &result);
        result
    }

    async fn list_filters(&self) -> Result<FilterCatalog, ApiError> {
        let started = Instant::now();
        let result = self.inner.list_filters().await;
        Self::record("list_filters", started, &result);
        result
    }

    async fn list_subjects(&self) -> Result<SubjectCatalog, ApiError> {
        let started = Instant::now();
        let result = self.inner.list_subjects().await;
        Self::record("list_subjects", started, &result);
        result
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let started = Instant::now();
        let result = self.inner.health().await;
        Self::record("health", started, &result);
        result
    }
}
