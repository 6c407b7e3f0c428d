//! Discussion entities

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A single utterance in the discussion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Speaker identifier (host name)
    #[serde(alias = "host")]
    pub speaker: String,
    /// What the speaker says
    #[serde(alias = "content")]
    pub text: String,
}

impl DialogueLine {
    /// Create a new dialogue line
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// A complete scripted discussion
///
/// Line order is the playback order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    /// Title of the discussed article
    pub title: String,
    /// Dialogue lines in playback order
    pub lines: Vec<DialogueLine>,
}

impl Discussion {
    /// Create a discussion
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyDiscussion` if there are no lines.
    pub fn new(title: impl Into<String>, lines: Vec<DialogueLine>) -> Result<Self, DomainError> {
        let title = title.into();
        if lines.is_empty() {
            return Err(DomainError::EmptyDiscussion(format!(
                "no dialogue lines for '{title}'"
            )));
        }
        Ok(Self { title, lines })
    }

    /// Number of lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the discussion has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Distinct speakers in order of first appearance
    #[must_use]
    pub fn speakers(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for line in &self.lines {
            if !seen.contains(&line.speaker.as_str()) {
                seen.push(&line.speaker);
            }
        }
        seen
    }
}
