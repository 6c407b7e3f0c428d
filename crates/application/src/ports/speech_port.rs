//! Speech port - Interface for text-to-speech synthesis

use async_trait::async_trait;
use domain::AudioFormat;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of a speech synthesis operation
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Generated audio data
    pub audio_data: Vec<u8>,
    /// Format of the audio
    pub format: AudioFormat,
}

/// Voice configuration for synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConfig {
    /// Voice identifier (e.g., "nova", "alloy")
    pub voice_id: String,
    /// Speech speed (0.25 - 4.0, default 1.0)
    pub speed: f32,
}

impl VoiceConfig {
    /// Create a voice configuration
    pub fn new(voice_id: impl Into<String>, speed: f32) -> Self {
        Self {
            voice_id: voice_id.into(),
            speed,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            voice_id: "nova".to_string(),
            speed: 1.0,
        }
    }
}

/// Information about an available voice
#[derive(Debug, Clone)]
pub struct VoiceInfo {
    /// Voice identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// Port for speech synthesis
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Synthesize speech from text
    ///
    /// The credential is owned by the adapter; callers only choose the voice
    /// and speed.
    async fn synthesize(
        &self,
        text: String,
        voice: VoiceConfig,
    ) -> Result<SynthesisResult, ApplicationError>;

    /// Check if the speech service is available
    async fn is_available(&self) -> bool;

    /// List available voices for synthesis
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, ApplicationError>;

    /// Format of the audio returned by `synthesize`
    fn output_format(&self) -> AudioFormat;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_config_default() {
        let config = VoiceConfig::default();
        assert_eq!(config.voice_id, "nova");
        assert!((config.speed - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn mock_speech_port_synthesize() {
        let mut mock = MockSpeechPort::new();
        mock.expect_synthesize()
            .withf(|text, voice| text == "Hello" && voice.voice_id == "onyx")
            .returning(|_, _| {
                Ok(SynthesisResult {
                    audio_data: vec![1, 2, 3, 4],
                    format: AudioFormat::Mp3,
                })
            });

        let result = mock
            .synthesize("Hello".to_string(), VoiceConfig::new("onyx", 1.1))
            .await
            .unwrap();
        assert_eq!(result.audio_data.len(), 4);
        assert_eq!(result.format, AudioFormat::Mp3);
    }

    #[tokio::test]
    async fn mock_speech_port_list_voices() {
        let mut mock = MockSpeechPort::new();
        mock.expect_list_voices().returning(|| {
            Ok(vec![VoiceInfo {
                id: "nova".to_string(),
                name: "Nova".to_string(),
                description: None,
            }])
        });

        let voices = mock.list_voices().await.unwrap();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].id, "nova");
    }

    #[test]
    fn mock_speech_port_output_format() {
        let mut mock = MockSpeechPort::new();
        mock.expect_output_format().returning(|| AudioFormat::Opus);
        assert_eq!(mock.output_format(), AudioFormat::Opus);
    }
}
