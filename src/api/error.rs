//! Generation service error types

use thiserror::Error;

/// Error from the content-generation service with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    /// Detail string reported by the service, if any
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Timeout, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Auth, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidRequest, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::ServerError, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    /// Text suitable for the session error banner
    pub fn user_message(&self) -> String {
        match self.kind {
            ApiErrorKind::Network | ApiErrorKind::Timeout => {
                "We couldn't reach the story helper. Please check your connection and try again."
                    .to_string()
            }
            ApiErrorKind::Auth => "The story helper rejected our access key.".to_string(),
            ApiErrorKind::NotFound => {
                "This session has expired. Please start a new one.".to_string()
            }
            ApiErrorKind::InvalidRequest => match &self.detail {
                Some(detail) => detail.clone(),
                None => "Something about that request wasn't quite right. Please try again."
                    .to_string(),
            },
            ApiErrorKind::ServerError => match &self.detail {
                Some(detail) => format!("{detail}. Please try again."),
                None => "The story helper had a problem. Please try again.".to_string(),
            },
            ApiErrorKind::Decode => {
                "The story helper sent something unexpected. Please try again.".to_string()
            }
        }
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Connection failures
    Network,
    /// Request exceeded the configured timeout
    Timeout,
    /// Missing or rejected API key (401, 403)
    Auth,
    /// Session expired or unknown (404)
    NotFound,
    /// Rejected input (400, 422)
    InvalidRequest,
    /// Server error (5xx)
    ServerError,
    /// Response body could not be parsed
    Decode,
}

impl ApiErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::ServerError)
    }
}
