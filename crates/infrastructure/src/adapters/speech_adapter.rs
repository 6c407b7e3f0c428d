//! Speech adapter - Implements SpeechPort using ai_speech crate

use ai_speech::{OpenAISpeechProvider, SpeechConfig, SpeechError, SynthesisOptions, TextToSpeech};
use application::error::ApplicationError;
use application::ports::{SpeechPort, SynthesisResult, VoiceConfig, VoiceInfo};
use async_trait::async_trait;
use domain::AudioFormat;
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Adapter for speech synthesis using the OpenAI speech provider
pub struct SpeechAdapter {
    provider: OpenAISpeechProvider,
    format: AudioFormat,
    retry: RetryConfig,
}

impl std::fmt::Debug for SpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAdapter")
            .field("model", &self.provider.model_name())
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl SpeechAdapter {
    /// Create a new speech adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to initialize.
    pub fn new(config: SpeechConfig) -> Result<Self, ApplicationError> {
        let format = config.output_format;
        let provider = OpenAISpeechProvider::new(config).map_err(Self::map_error)?;

        Ok(Self {
            provider,
            format,
            retry: RetryConfig::default(),
        })
    }

    /// Use a custom retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Map speech error to application error
    fn map_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::RateLimited => ApplicationError::RateLimited,
            SpeechError::ConnectionFailed(e) => {
                ApplicationError::ExternalService(format!("Speech connection failed: {e}"))
            },
            SpeechError::Timeout(ms) => {
                ApplicationError::ExternalService(format!("Speech service timeout after {ms}ms"))
            },
            SpeechError::Configuration(e) => ApplicationError::Configuration(e),
            other => ApplicationError::Speech(other.to_string()),
        }
    }
}

#[async_trait]
impl SpeechPort for SpeechAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len(), voice = %voice.voice_id, speed = voice.speed))]
    async fn synthesize(
        &self,
        text: String,
        voice: VoiceConfig,
    ) -> Result<SynthesisResult, ApplicationError> {
        let options = SynthesisOptions::new()
            .with_voice(voice.voice_id)
            .with_speed(voice.speed);

        let (text, options) = (text.as_str(), &options);
        let audio = retry(&self.retry, "speech_synthesis", || async move {
            self.provider
                .synthesize(text, options)
                .await
                .map_err(Self::map_error)
        })
        .await?;

        debug!(bytes = audio.size_bytes(), "Segment synthesized");

        Ok(SynthesisResult {
            format: audio.format(),
            audio_data: audio.into_data(),
        })
    }

    async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, ApplicationError> {
        let voices = self.provider.list_voices().await.map_err(Self::map_error)?;

        Ok(voices
            .into_iter()
            .map(|v| VoiceInfo {
                description: v
                    .description
                    .or_else(|| v.gender.map(|g| g.to_string())),
                id: v.id,
                name: v.name,
            })
            .collect())
    }

    fn output_format(&self) -> AudioFormat {
        self.format
    }
}
