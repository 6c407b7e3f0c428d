//! Article adapter - Implements ArticlePort using integration_article

use application::{error::ApplicationError, ports::ArticlePort};
use async_trait::async_trait;
use domain::Article;
use integration_article::{ArticleConfig, ArticleError, ArticleProvider, HttpArticleFetcher};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Adapter fetching articles over HTTP
#[derive(Debug)]
pub struct ArticleAdapter {
    fetcher: HttpArticleFetcher,
    retry: RetryConfig,
}

impl ArticleAdapter {
    /// Create a new article adapter
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the fetcher cannot be built.
    pub fn new(config: ArticleConfig) -> Result<Self, ApplicationError> {
        let fetcher = HttpArticleFetcher::new(config).map_err(Self::map_error)?;
        Ok(Self {
            fetcher,
            retry: RetryConfig::default(),
        })
    }

    /// Use a custom retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn map_error(err: ArticleError) -> ApplicationError {
        match err {
            ArticleError::HttpStatus { status: 429 } => ApplicationError::RateLimited,
            ArticleError::ConfigurationError(msg) => ApplicationError::Configuration(msg),
            e if e.is_retryable() => ApplicationError::ExternalService(e.to_string()),
            e => ApplicationError::Article(e.to_string()),
        }
    }
}

#[async_trait]
impl ArticlePort for ArticleAdapter {
    #[instrument(skip(self))]
    async fn fetch_article(&self, url: &str) -> Result<Article, ApplicationError> {
        let article = retry(&self.retry, "fetch_article", || async move {
            self.fetcher.fetch(url).await.map_err(Self::map_error)
        })
        .await?;

        debug!(title = %article.title, chars = article.char_count(), "Article fetched");
        Ok(article)
    }
}
