//! Inference errors

use thiserror::Error;

/// Errors that can occur during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Failed to connect to inference server
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to inference server failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Model not found or not loaded
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Response parsing failed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during inference
    #[error("Inference timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(120_000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

impl InferenceError {
    /// Returns true if repeating the request may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Timeout(_) | Self::ConnectionFailed(_) | Self::ServerError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(InferenceError::RateLimited.is_retryable());
        assert!(InferenceError::Timeout(10).is_retryable());
        assert!(InferenceError::ServerError("502".to_string()).is_retryable());
        assert!(!InferenceError::InvalidResponse("{".to_string()).is_retryable());
        assert!(!InferenceError::Configuration("key".to_string()).is_retryable());
    }

    #[test]
    fn timeout_error_message() {
        let err = InferenceError::Timeout(120_000);
        assert_eq!(err.to_string(), "Inference timeout after 120000ms");
    }

    #[test]
    fn rate_limited_error_message() {
        assert_eq!(InferenceError::RateLimited.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn server_error_message() {
        let err = InferenceError::ServerError("Status 500: boom".to_string());
        assert_eq!(err.to_string(), "Server error: Status 500: boom");
    }

    #[test]
    fn configuration_error_message() {
        let err = InferenceError::Configuration("missing key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing key");
    }
}
