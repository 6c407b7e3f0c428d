//! Article port - Interface for fetching source articles

use async_trait::async_trait;
use domain::Article;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for article sources
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArticlePort: Send + Sync {
    /// Fetch the article at `url` and return its title and readable text
    async fn fetch_article(&self, url: &str) -> Result<Article, ApplicationError>;
}
