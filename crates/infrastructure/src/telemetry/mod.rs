//! Logging initialisation
//!
//! Installs a `tracing` subscriber writing to stderr so that anything the CLI
//! prints on stdout stays machine-readable.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info,application=debug`
    ///
    /// Takes precedence over the CLI verbosity; `RUST_LOG` takes precedence
    /// over both.
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit one JSON object per event instead of human-readable lines
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Validate the filter directive
    ///
    /// # Errors
    ///
    /// Returns the parser's message if the directive is malformed.
    pub fn validate(&self) -> Result<(), String> {
        match &self.filter {
            Some(filter) => EnvFilter::try_new(filter)
                .map(|_| ())
                .map_err(|e| format!("logging.filter is invalid: {e}")),
            None => Ok(()),
        }
    }

    /// Directive used when `RUST_LOG` is not set
    #[must_use]
    pub fn effective_filter<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.filter.as_deref().unwrap_or(fallback)
    }
}

/// Error type for logging initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to initialize tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Install the global subscriber
///
/// `fallback_filter` is usually derived from the `-v` count.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig, fallback_filter: &str) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.effective_filter(fallback_filter)));

    let json_layer = config
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!config.json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))
}
