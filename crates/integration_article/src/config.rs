//! Article fetcher configuration

use serde::{Deserialize, Serialize};

/// Configuration for fetching and trimming articles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum body length in characters
    #[serde(default = "default_min_content_chars")]
    pub min_content_chars: usize,

    /// Body length in characters after which the text is truncated
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Minimum length of a paragraph picked up outside `<article>`/`<main>`
    #[serde(default = "default_min_paragraph_chars")]
    pub min_paragraph_chars: usize,
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "AI-Podcast/1.0".to_string()
}

const fn default_min_content_chars() -> usize {
    100
}

const fn default_max_content_chars() -> usize {
    8000
}

const fn default_min_paragraph_chars() -> usize {
    50
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            min_content_chars: default_min_content_chars(),
            max_content_chars: default_max_content_chars(),
            min_paragraph_chars: default_min_paragraph_chars(),
        }
    }
}

impl ArticleConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("User agent must not be empty".to_string());
        }
        if self.max_content_chars < self.min_content_chars {
            return Err(format!(
                "max_content_chars ({}) must not be below min_content_chars ({})",
                self.max_content_chars, self.min_content_chars
            ));
        }
        Ok(())
    }
}
