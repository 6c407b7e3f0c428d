//! Article provider trait

use async_trait::async_trait;
use domain::Article;

use crate::ArticleError;

/// Trait for article sources
#[async_trait]
pub trait ArticleProvider: Send + Sync {
    /// Fetch the article at `url` and extract its text
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or holds too little text.
    async fn fetch(&self, url: &str) -> Result<Article, ArticleError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
