//! Configuration for speech synthesis

use serde::{Deserialize, Serialize};

use crate::types::AudioFormat;

/// Configuration for the speech synthesis provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Which OpenAI endpoint produces the audio
    #[serde(default)]
    pub api_mode: SpeechApiMode,

    /// OpenAI API key
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL (for custom endpoints)
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Model for the `/audio/speech` endpoint
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// Model for the chat-completions audio modality
    #[serde(default = "default_chat_audio_model")]
    pub chat_audio_model: String,

    /// Voice used when a request names none
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Output audio format
    #[serde(default)]
    pub output_format: AudioFormat,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Speaking speed used when a request names none (0.25 to 4.0)
    #[serde(default = "default_speed")]
    pub speed: f32,
}

/// Endpoint used to synthesize speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeechApiMode {
    /// Dedicated `/audio/speech` endpoint returning raw audio
    #[default]
    Speech,
    /// `/chat/completions` with the audio modality, returning base64 audio
    ChatAudio,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_chat_audio_model() -> String {
    "gpt-4o-audio-preview".to_string()
}

fn default_voice() -> String {
    "nova".to_string()
}

const fn default_timeout_ms() -> u64 {
    60_000
}

const fn default_speed() -> f32 {
    1.0
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_mode: SpeechApiMode::default(),
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            tts_model: default_tts_model(),
            chat_audio_model: default_chat_audio_model(),
            default_voice: default_voice(),
            output_format: AudioFormat::default(),
            timeout_ms: default_timeout_ms(),
            speed: default_speed(),
        }
    }
}

impl SpeechConfig {
    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            openai_api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    /// Model name for the configured API mode
    #[must_use]
    pub fn active_model(&self) -> &str {
        match self.api_mode {
            SpeechApiMode::Speech => &self.tts_model,
            SpeechApiMode::ChatAudio => &self.chat_audio_model,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.openai_api_key.as_deref().is_none_or(str::is_empty) {
            return Err("OpenAI API key is required for speech synthesis".to_string());
        }

        if !(0.25..=4.0).contains(&self.speed) {
            return Err(format!(
                "Speed must be between 0.25 and 4.0, got {}",
                self.speed
            ));
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = SpeechConfig::default();

        assert_eq!(config.api_mode, SpeechApiMode::Speech);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.tts_model, "tts-1");
        assert_eq!(config.chat_audio_model, "gpt-4o-audio-preview");
        assert_eq!(config.default_voice, "nova");
        assert_eq!(config.output_format, AudioFormat::Mp3);
        assert_eq!(config.timeout_ms, 60_000);
        assert!((config.speed - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn active_model_follows_api_mode() {
        let mut config = SpeechConfig::test();
        assert_eq!(config.active_model(), "tts-1");

        config.api_mode = SpeechApiMode::ChatAudio;
        assert_eq!(config.active_model(), "gpt-4o-audio-preview");
    }

    #[test]
    fn validate_fails_without_api_key() {
        assert!(SpeechConfig::default().validate().is_err());
    }

    #[test]
    fn validate_succeeds_with_api_key() {
        assert!(SpeechConfig::test().validate().is_ok());
    }

    #[test]
    fn validate_fails_with_invalid_speed() {
        let mut config = SpeechConfig::test();
        config.speed = 0.1;
        assert!(config.validate().is_err());

        config.speed = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_fails_with_zero_timeout() {
        let mut config = SpeechConfig::test();
        config.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_mode_serializes_snake_case() {
        let speech = serde_json::to_string(&SpeechApiMode::Speech).unwrap();
        let chat = serde_json::to_string(&SpeechApiMode::ChatAudio).unwrap();

        assert_eq!(speech, "\"speech\"");
        assert_eq!(chat, "\"chat_audio\"");
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml = r#"
            api_mode = "chat_audio"
            openai_api_key = "sk-test"
            tts_model = "tts-1-hd"
            default_voice = "alloy"
            output_format = "opus"
            timeout_ms = 90000
            speed = 1.25
        "#;

        let config: SpeechConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.api_mode, SpeechApiMode::ChatAudio);
        assert_eq!(config.openai_api_key, Some("sk-test".to_string()));
        assert_eq!(config.tts_model, "tts-1-hd");
        assert_eq!(config.default_voice, "alloy");
        assert_eq!(config.output_format, AudioFormat::Opus);
        assert_eq!(config.timeout_ms, 90_000);
        assert!((config.speed - 1.25).abs() < f32::EPSILON);
    }
}
