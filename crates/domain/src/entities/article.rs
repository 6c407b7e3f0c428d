//! Article entity

use serde::{Deserialize, Serialize};

/// Readable text extracted from a web page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Source URL
    pub url: String,
    /// Page title
    pub title: String,
    /// Extracted body text
    pub content: String,
}

impl Article {
    /// Create a new article
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Length of the body in characters
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_count_counts_unicode_scalars() {
        let article = Article::new("https://example.com", "T", "Привет");
        assert_eq!(article.char_count(), 6);
    }
}
