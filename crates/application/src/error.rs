//! Application-level errors

use domain::DomainError;
use thiserror::Error;

use crate::services::PipelineError;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Speech pipeline failure
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Article could not be fetched or extracted
    #[error("Article error: {0}")]
    Article(String),

    /// Inference/AI error
    #[error("Inference error: {0}")]
    Inference(String),

    /// Model output could not be turned into a discussion
    #[error("Discussion error: {0}")]
    Discussion(String),

    /// Speech synthesis error
    #[error("Speech error: {0}")]
    Speech(String),

    /// Local playback error
    #[error("Playback error: {0}")]
    Playback(String),

    /// Concatenation or streaming error
    #[error("Muxing error: {0}")]
    Muxing(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ExternalService(_))
    }
}
