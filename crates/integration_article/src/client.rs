//! HTTP article fetcher

use std::time::Duration;

use async_trait::async_trait;
use domain::Article;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::{ArticleConfig, ArticleError, ArticleProvider, extractor};

/// Fetches articles over HTTP(S)
#[derive(Debug)]
pub struct HttpArticleFetcher {
    client: Client,
    config: ArticleConfig,
}

impl HttpArticleFetcher {
    /// Create a new fetcher
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: ArticleConfig) -> Result<Self, ArticleError> {
        config
            .validate()
            .map_err(ArticleError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ArticleError::ConfigurationError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn parse_url(raw: &str) -> Result<Url, ArticleError> {
        let url = Url::parse(raw.trim()).map_err(|e| ArticleError::InvalidUrl(format!("{raw}: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ArticleError::InvalidUrl(format!(
                "unsupported scheme '{other}' in {raw}"
            ))),
        }
    }

    /// Turn a downloaded page into an article, applying the length limits
    fn build_article(&self, url: &str, html: &str) -> Result<Article, ArticleError> {
        let page = extractor::extract(html, self.config.min_paragraph_chars);
        let body = page.body();

        let chars = body.chars().count();
        if chars < self.config.min_content_chars {
            return Err(ArticleError::ContentTooShort {
                chars,
                min: self.config.min_content_chars,
            });
        }

        let content = if chars > self.config.max_content_chars {
            debug!(chars, limit = self.config.max_content_chars, "Truncating article");
            extractor::truncate_chars(&body, self.config.max_content_chars)
        } else {
            body
        };

        Ok(Article::new(url, page.title, content))
    }
}

#[async_trait]
impl ArticleProvider for HttpArticleFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Article, ArticleError> {
        let parsed = Self::parse_url(url)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| ArticleError::from_reqwest(&e, self.config.timeout_secs))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = %status, "Article request failed");
            return Err(ArticleError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| ArticleError::from_reqwest(&e, self.config.timeout_secs))?;

        let article = self.build_article(url, &html)?;
        info!(
            title = %article.title,
            chars = article.char_count(),
            "Fetched article"
        );
        Ok(article)
    }

    fn provider_name(&self) -> &'static str {
        "http"
    }
}
