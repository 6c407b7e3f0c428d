//! OpenAI inference adapter - Implements InferencePort using ai_core
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. Transient
//! failures (rate limits, dropped connections, 5xx) are retried with backoff.

use std::time::Instant;

use ai_core::{InferenceConfig, InferenceEngine, InferenceError, InferenceRequest, OpenAIChatEngine};
use application::{
    error::ApplicationError,
    ports::{InferencePort, InferenceResult},
};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Adapter for OpenAI-compatible chat completion servers
#[derive(Debug)]
pub struct OpenAIInferenceAdapter {
    engine: OpenAIChatEngine,
    retry: RetryConfig,
}

impl OpenAIInferenceAdapter {
    /// Create a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the engine cannot be built.
    pub fn new(config: InferenceConfig) -> Result<Self, ApplicationError> {
        let engine = OpenAIChatEngine::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

        Ok(Self {
            engine,
            retry: RetryConfig::default(),
        })
    }

    /// Use a custom retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::RateLimited => ApplicationError::RateLimited,
            InferenceError::ConnectionFailed(msg) => {
                ApplicationError::ExternalService(format!("Inference connection failed: {msg}"))
            },
            InferenceError::Timeout(ms) => {
                ApplicationError::ExternalService(format!("Inference timeout after {ms}ms"))
            },
            InferenceError::ServerError(msg) => {
                ApplicationError::ExternalService(format!("Inference server error: {msg}"))
            },
            InferenceError::Configuration(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::Inference(other.to_string()),
        }
    }
}

#[async_trait]
impl InferencePort for OpenAIInferenceAdapter {
    #[instrument(skip(self, system_prompt, message), fields(system_len = system_prompt.len(), message_len = message.len()))]
    async fn generate_with_system(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<InferenceResult, ApplicationError> {
        let start = Instant::now();
        let request = InferenceRequest::with_system(system_prompt, message);

        let request = &request;
        let response = retry(&self.retry, "chat_completion", || async move {
            self.engine
                .generate(request.clone())
                .await
                .map_err(Self::map_error)
        })
        .await?;

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;

        debug!(
            model = %response.model,
            latency_ms,
            finish_reason = ?response.finish_reason,
            "Chat completion finished"
        );

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            tokens_used: response.usage.map(|u| u.total_tokens),
            latency_ms,
        })
    }

    async fn is_healthy(&self) -> bool {
        self.engine.health_check().await.unwrap_or(false)
    }

    fn current_model(&self) -> String {
        self.engine.default_model().to_string()
    }
}
