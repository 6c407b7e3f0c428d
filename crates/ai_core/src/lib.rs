//! AI Core - Chat-completion inference
//!
//! Provides the `InferenceEngine` port and an adapter for OpenAI-compatible
//! `/chat/completions` endpoints. The podcast generator uses it to turn an
//! article into a scripted multi-host discussion.

pub mod config;
pub mod error;
pub mod openai;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use openai::OpenAIChatEngine;
pub use ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage};
