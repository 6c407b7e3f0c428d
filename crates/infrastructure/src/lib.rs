//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the application layer on top of the
//! OpenAI, speech, article and FFmpeg crates, and provides configuration
//! loading, logging setup and the retry policy they share.

pub mod adapters;
pub mod config;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, IcecastConfig, MediaConfig, PlayerConfig};
pub use retry::{RetryConfig, Retryable, retry};
pub use telemetry::{LoggingConfig, TelemetryError, init_logging};
