//! Article fetching error types

use thiserror::Error;

/// Errors that can occur while fetching an article
#[derive(Debug, Error)]
pub enum ArticleError {
    /// URL could not be parsed or uses an unsupported scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection to the server failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Server answered with a status other than 200
    #[error("Failed to fetch article: status code {status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
    },

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Extracted body is too short to discuss
    #[error("Extracted content too short ({chars} chars, minimum {min})")]
    ContentTooShort {
        /// Characters extracted
        chars: usize,
        /// Required minimum
        min: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ArticleError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } => true,
            Self::HttpStatus { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_names_code() {
        let err = ArticleError::HttpStatus { status: 404 };
        assert_eq!(err.to_string(), "Failed to fetch article: status code 404");
    }

    #[test]
    fn too_short_message() {
        let err = ArticleError::ContentTooShort { chars: 12, min: 100 };
        assert_eq!(
            err.to_string(),
            "Extracted content too short (12 chars, minimum 100)"
        );
    }

    #[test]
    fn retryable_classification() {
        assert!(ArticleError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(ArticleError::HttpStatus { status: 503 }.is_retryable());
        assert!(!ArticleError::HttpStatus { status: 404 }.is_retryable());
        assert!(!ArticleError::InvalidUrl("x".to_string()).is_retryable());
        assert!(!ArticleError::ContentTooShort { chars: 1, min: 2 }.is_retryable());
    }
}
