//! Application configuration
//!
//! Values are layered, later sources winning:
//! 1. built-in defaults (`#[serde(default)]` on every struct)
//! 2. a TOML file (`ai-podcast.toml` in the working directory, or an explicit path)
//! 3. environment variables prefixed with `AI_PODCAST`, nested with `__`,
//!    e.g. `AI_PODCAST__PODCAST__DURATION_MINUTES=5`
//!
//! CLI flags are applied on top by the binary.
//!
//! Split into sub-modules:
//! - `media`: Icecast target and external programs

mod media;

use std::path::Path;

use ai_core::InferenceConfig;
use ai_speech::SpeechConfig;
use application::{DiscussionConfig, PodcastConfig};
use integration_article::ArticleConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

pub use media::{IcecastConfig, MediaConfig, PlayerConfig};

use crate::{retry::RetryConfig, telemetry::LoggingConfig};

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_NAME: &str = "ai-podcast";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "AI_PODCAST";

/// Separator between prefix and nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Complete application configuration
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// OpenAI API key shared by the chat and speech clients
    #[serde(default)]
    pub openai_api_key: Option<SecretString>,

    /// Chat completion settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Speech synthesis settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Article fetching settings
    #[serde(default)]
    pub article: ArticleConfig,

    /// Podcast length, host panel and pipeline tuning
    #[serde(default)]
    pub podcast: PodcastConfig,

    /// Discussion prompt settings
    #[serde(default)]
    pub discussion: DiscussionConfig,

    /// Icecast streaming target
    #[serde(default)]
    pub icecast: IcecastConfig,

    /// FFmpeg and player programs
    #[serde(default)]
    pub media: MediaConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Backoff for remote calls
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// With `path` set the file must exist; otherwise `ai-podcast.toml` is
    /// read from the working directory if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed, or if the
    /// result does not validate.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with(path, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
    }

    fn load_with(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!(
            duration_minutes = config.podcast.duration_minutes,
            hosts = config.podcast.hosts.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate everything that does not depend on credentials
    ///
    /// The API key is checked when the clients are built, so commands that
    /// never call the API work without one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` describing the first problem.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.podcast
            .validate()
            .map_err(|e| e.to_string())
            .and_then(|()| self.podcast.pipeline.validate())
            .and_then(|()| self.article.validate())
            .and_then(|()| self.icecast.validate())
            .and_then(|()| self.logging.validate())
            .and_then(|()| self.retry.validate())
            .map_err(config::ConfigError::Message)
    }

    /// Replace the shared API key
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.openai_api_key = Some(SecretString::from(key.into()));
    }

    fn shared_key(&self) -> Option<String> {
        self.openai_api_key
            .as_ref()
            .map(|key| key.expose_secret().to_string())
    }

    /// Chat settings with the shared key filled in
    ///
    /// A key set directly under `[inference]` is kept.
    #[must_use]
    pub fn inference_config(&self) -> InferenceConfig {
        let mut config = self.inference.clone();
        if config.api_key.is_none() {
            config.api_key = self.shared_key();
        }
        config
    }

    /// Speech settings with the shared key filled in
    ///
    /// A key set directly under `[speech]` is kept.
    #[must_use]
    pub fn speech_config(&self) -> SpeechConfig {
        let mut config = self.speech.clone();
        if config.openai_api_key.is_none() {
            config.openai_api_key = self.shared_key();
        }
        config
    }
}
