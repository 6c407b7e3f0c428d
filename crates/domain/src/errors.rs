//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Host definition is incomplete or inconsistent
    #[error("Invalid host: {0}")]
    InvalidHost(String),

    /// Unknown voice gender
    #[error("Invalid gender: {0}")]
    InvalidGender(String),

    /// Discussion has nothing to say
    #[error("Discussion is empty: {0}")]
    EmptyDiscussion(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_host_error_message() {
        let err = DomainError::InvalidHost("name is empty".to_string());
        assert_eq!(err.to_string(), "Invalid host: name is empty");
    }

    #[test]
    fn invalid_gender_error_message() {
        let err = DomainError::InvalidGender("robot".to_string());
        assert_eq!(err.to_string(), "Invalid gender: robot");
    }

    #[test]
    fn empty_discussion_error_message() {
        let err = DomainError::EmptyDiscussion("no messages".to_string());
        assert_eq!(err.to_string(), "Discussion is empty: no messages");
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("bad".to_string());
        assert_eq!(err.to_string(), "Validation failed: bad");
    }
}
