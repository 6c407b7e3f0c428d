#![forbid(unsafe_code)]
//! Article fetching for the podcast generator
//!
//! Downloads a web page and reduces it to a title and readable body text that
//! can be handed to the language model.
//!
//! # Architecture
//!
//! [`ArticleProvider`] is the trait implemented by article sources.
//! [`HttpArticleFetcher`] fetches pages over HTTP and delegates text
//! extraction to the functions in [`extractor`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_article::{ArticleConfig, ArticleProvider, HttpArticleFetcher};
//!
//! let fetcher = HttpArticleFetcher::new(ArticleConfig::default())?;
//! let article = fetcher.fetch("https://example.com/post").await?;
//! println!("{}: {} chars", article.title, article.char_count());
//! ```

mod client;
mod config;
mod error;
pub mod extractor;
mod provider;

pub use client::HttpArticleFetcher;
pub use config::ArticleConfig;
pub use error::ArticleError;
pub use provider::ArticleProvider;
