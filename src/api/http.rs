//! HTTP implementation of the generation service

use super::types::{
    FilterCatalog, HealthResponse, StoryContinueRequest, StoryResponse, StoryStartRequest,
    SubjectCatalog, TutorAskRequest, TutorResponse, TutorStartRequest,
};
use super::{ApiError, GenerationService};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for the generation service
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("STORYBOT_API_URL").ok(),
            api_key: std::env::var("STORYBOT_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            request_timeout: std::env::var("STORYBOT_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}

/// Generation service reached over HTTP/JSON
pub struct HttpGenerationService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpGenerationService {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("api_key", key)]),
            None => request,
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let request = self.authorize(self.client.post(self.url(path))).json(body);
        Self::execute(request).await
    }

    async fn get_json<R>(&self, path: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let request = self.authorize(self.client.get(self.url(path)));
        Self::execute(request).await
    }

    async fn execute<R>(request: reqwest::RequestBuilder) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::timeout(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                ApiError::network(format!("Connection failed: {e}"))
            } else {
                ApiError::network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::decode(format!("Failed to parse response: {e} - body: {body}")))
    }
}

/// Map a non-success HTTP response to an `ApiError`
fn classify_error(status: reqwest::StatusCode, body: &str) -> ApiError {
    let detail = extract_detail(body);
    let message = format!("HTTP {status}: {}", detail.as_deref().unwrap_or(body));
    let err = match status.as_u16() {
        401 | 403 => ApiError::auth(message),
        404 => ApiError::not_found(message),
        400 | 422 => ApiError::invalid_request(message),
        500..=599 => ApiError::server_error(message),
        _ => ApiError::invalid_request(message),
    };
    match detail {
        Some(detail) => err.with_detail(detail),
        None => err,
    }
}

/// Pull the human-readable part out of an error body.
///
/// The service reports `{"detail": "..."}` for handled errors,
/// `{"detail": [{"msg": "..."}, ...]}` for rejected payloads and
/// `{"error": "...", "detail": "..."}` from its catch-all handler.
fn extract_detail(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    match parsed.get("detail") {
        Some(serde_json::Value::String(detail)) => return Some(detail.clone()),
        Some(serde_json::Value::Array(entries)) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }
    parsed
        .get("error")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn start_story(&self, request: &StoryStartRequest) -> Result<StoryResponse, ApiError> {
        self.post_json("/story/start", request).await
    }

    async fn continue_story(
        &self,
        request: &StoryContinueRequest,
    ) -> Result<StoryResponse, ApiError> {
        self.post_json("/story/continue", request).await
    }

    async fn start_tutor(&self, request: &TutorStartRequest) -> Result<TutorResponse, ApiError> {
        self.post_json("/tutor/start", request).await
    }

    async fn ask_question(&self, request: &TutorAskRequest) -> Result<TutorResponse, ApiError> {
        self.post_json("/tutor/ask", request).await
    }

    async fn list_filters(&self) -> Result<FilterCatalog, ApiError> {
        self.get_json("/config/filters").await
    }

    async fn list_subjects(&self) -> Result<SubjectCatalog, ApiError> {
        self.get_json("/tutor/subjects").await
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json("/health").await
    }
}
