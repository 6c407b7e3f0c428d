//! OpenAI Speech Provider
//!
//! Implements `TextToSpeech` against two OpenAI endpoints:
//!
//! ## `/audio/speech`
//! Returns the raw audio body. Honors the speed setting.
//!
//! ## `/chat/completions` with the audio modality
//! Returns base64 audio in `choices[0].message.audio.data`. The model voices
//! the line with more expression, but ignores the speed setting.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::{SpeechApiMode, SpeechConfig};
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::{AudioData, SynthesisOptions, VoiceGender, VoiceInfo};

/// Maximum input length accepted by the speech endpoints
const MAX_INPUT_CHARS: usize = 4096;

/// Instruction sent with chat-audio requests
const CHAT_AUDIO_INSTRUCTIONS: &str = "You are a host on a lively tech podcast. \
Read the user's text aloud exactly as written, in its original language, \
with a natural conversational delivery.";

/// OpenAI speech provider
#[derive(Debug, Clone)]
pub struct OpenAISpeechProvider {
    client: Client,
    config: SpeechConfig,
}

impl OpenAISpeechProvider {
    /// Create a new OpenAI speech provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Get the API key
    fn api_key(&self) -> &str {
        self.config.openai_api_key.as_deref().unwrap_or_default()
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{endpoint}",
            self.config.openai_base_url.trim_end_matches('/')
        )
    }

    fn validate_input(text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        let chars = text.chars().count();
        if chars > MAX_INPUT_CHARS {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: {chars} characters exceeds {MAX_INPUT_CHARS} limit"
            )));
        }

        Ok(())
    }

    /// Map a failed HTTP response to a speech error
    async fn map_error_response(&self, response: reqwest::Response, voice: &str) -> SpeechError {
        let status = response.status();
        let error_body = response.text().await.unwrap_or_default();
        warn!(status = %status, "Speech request failed");

        if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_body) {
            return match api_error.error.code.as_deref() {
                Some("rate_limit_exceeded") => SpeechError::RateLimited,
                Some("model_not_found") => {
                    SpeechError::ModelNotAvailable(self.config.active_model().to_string())
                },
                Some("invalid_voice") => SpeechError::VoiceNotFound(voice.to_string()),
                _ => SpeechError::SynthesisFailed(api_error.error.message),
            };
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return SpeechError::RateLimited;
        }

        SpeechError::SynthesisFailed(format!("HTTP {status}: {error_body}"))
    }

    async fn synthesize_speech(
        &self,
        text: &str,
        voice: &str,
        speed: f32,
    ) -> Result<Vec<u8>, SpeechError> {
        let request = TtsRequest {
            model: &self.config.tts_model,
            input: text,
            voice,
            response_format: self.config.output_format.extension(),
            speed: if (speed - 1.0).abs() < f32::EPSILON {
                None
            } else {
                Some(speed)
            },
        };

        let response = self
            .client
            .post(self.url("audio/speech"))
            .bearer_auth(self.api_key())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.map_error_response(response, voice).await);
        }

        let audio_bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        Ok(audio_bytes.to_vec())
    }

    async fn synthesize_chat_audio(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeechError> {
        let request = ChatAudioRequest {
            model: &self.config.chat_audio_model,
            modalities: ["text", "audio"],
            audio: ChatAudioParams {
                voice,
                format: self.config.output_format.extension(),
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: CHAT_AUDIO_INSTRUCTIONS,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
        };

        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(self.api_key())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.map_error_response(response, voice).await);
        }

        let body: ChatAudioResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        let encoded = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.audio)
            .map(|audio| audio.data)
            .ok_or_else(|| SpeechError::InvalidResponse("no audio in response".to_string()))?;

        BASE64
            .decode(encoded)
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to decode audio: {e}")))
    }
}

/// OpenAI TTS request body
#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatAudioRequest<'a> {
    model: &'a str,
    modalities: [&'a str; 2],
    audio: ChatAudioParams<'a>,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatAudioParams<'a> {
    voice: &'a str,
    format: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatAudioResponse {
    #[serde(default)]
    choices: Vec<ChatAudioChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatAudioChoice {
    message: ChatAudioMessage,
}

#[derive(Debug, Deserialize)]
struct ChatAudioMessage {
    #[serde(default)]
    audio: Option<ChatAudioPayload>,
}

#[derive(Debug, Deserialize)]
struct ChatAudioPayload {
    data: String,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[async_trait]
impl TextToSpeech for OpenAISpeechProvider {
    #[instrument(skip(self, text, options), fields(
        text_len = text.len(),
        mode = ?self.config.api_mode,
        voice = options.voice.as_deref().unwrap_or(&self.config.default_voice)
    ))]
    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<AudioData, SpeechError> {
        Self::validate_input(text)?;

        let voice = options
            .voice
            .as_deref()
            .unwrap_or(&self.config.default_voice);
        let speed = options.speed.unwrap_or(self.config.speed);

        let data = match self.config.api_mode {
            SpeechApiMode::Speech => self.synthesize_speech(text, voice, speed).await?,
            SpeechApiMode::ChatAudio => self.synthesize_chat_audio(text, voice).await?,
        };

        if data.is_empty() {
            return Err(SpeechError::InvalidResponse(
                "service returned empty audio".to_string(),
            ));
        }

        debug!(audio_size = data.len(), "Speech synthesis complete");

        Ok(AudioData::new(data, self.config.output_format))
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        // OpenAI has no voices endpoint
        Ok(vec![
            VoiceInfo::new("alloy", "Alloy")
                .with_description("Neutral and balanced voice")
                .with_gender(VoiceGender::Neutral),
            VoiceInfo::new("echo", "Echo")
                .with_description("Warm and conversational voice")
                .with_gender(VoiceGender::Male),
            VoiceInfo::new("fable", "Fable")
                .with_description("British-accented storyteller voice")
                .with_gender(VoiceGender::Male),
            VoiceInfo::new("onyx", "Onyx")
                .with_description("Deep and authoritative voice")
                .with_gender(VoiceGender::Male),
            VoiceInfo::new("nova", "Nova")
                .with_description("Friendly and upbeat voice")
                .with_gender(VoiceGender::Female),
            VoiceInfo::new("shimmer", "Shimmer")
                .with_description("Clear and expressive voice")
                .with_gender(VoiceGender::Female),
        ])
    }

    async fn is_available(&self) -> bool {
        match self
            .client
            .get(self.url("models"))
            .bearer_auth(self.api_key())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("OpenAI TTS availability check failed: {}", e);
                false
            },
        }
    }

    fn model_name(&self) -> &str {
        self.config.active_model()
    }

    fn default_voice(&self) -> &str {
        &self.config.default_voice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_provider(mock_server: &MockServer, mode: SpeechApiMode) -> OpenAISpeechProvider {
        let config = SpeechConfig {
            api_mode: mode,
            openai_api_key: Some("test-api-key".to_string()),
            openai_base_url: mock_server.uri(),
            ..Default::default()
        };
        OpenAISpeechProvider::new(config).unwrap()
    }

    fn rate_limit_body() -> serde_json::Value {
        serde_json::json!({
            "error": {
                "message": "Rate limit exceeded",
                "type": "rate_limit_error",
                "code": "rate_limit_exceeded"
            }
        })
    }

    mod speech_endpoint {
        use super::*;

        #[tokio::test]
        async fn synthesize_success() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/speech"))
                .and(header("authorization", "Bearer test-api-key"))
                .and(body_partial_json(serde_json::json!({
                    "model": "tts-1",
                    "voice": "nova",
                    "response_format": "mp3"
                })))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 1024]))
                .expect(1)
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::Speech);
            let audio = provider
                .synthesize("Hello, world!", &SynthesisOptions::default())
                .await
                .unwrap();

            assert_eq!(audio.size_bytes(), 1024);
            assert_eq!(audio.format(), crate::types::AudioFormat::Mp3);
        }

        #[tokio::test]
        async fn synthesize_sends_voice_and_speed() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/speech"))
                .and(body_partial_json(serde_json::json!({
                    "voice": "onyx",
                    "speed": 1.2
                })))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 16]))
                .expect(1)
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::Speech);
            let options = SynthesisOptions::new().with_voice("onyx").with_speed(1.2);

            assert!(provider.synthesize("Test", &options).await.is_ok());
        }

        #[tokio::test]
        async fn synthesize_maps_invalid_voice() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/speech"))
                .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                    "error": {"message": "Unknown voice", "code": "invalid_voice"}
                })))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::Speech);
            let options = SynthesisOptions::new().with_voice("robot");
            let result = provider.synthesize("Test", &options).await;

            assert!(matches!(result, Err(SpeechError::VoiceNotFound(v)) if v == "robot"));
        }

        #[tokio::test]
        async fn synthesize_rate_limited() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/speech"))
                .respond_with(ResponseTemplate::new(429).set_body_json(rate_limit_body()))
                .expect(1)
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::Speech);
            let result = provider.synthesize("Test", &SynthesisOptions::default()).await;

            assert!(matches!(result, Err(SpeechError::RateLimited)));
        }

        #[tokio::test]
        async fn synthesize_rejects_empty_body() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/speech"))
                .respond_with(ResponseTemplate::new(200))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::Speech);
            let result = provider.synthesize("Test", &SynthesisOptions::default()).await;

            assert!(matches!(result, Err(SpeechError::InvalidResponse(_))));
        }
    }

    mod chat_audio_endpoint {
        use super::*;

        #[tokio::test]
        async fn synthesize_decodes_base64_audio() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .and(body_partial_json(serde_json::json!({
                    "model": "gpt-4o-audio-preview",
                    "modalities": ["text", "audio"],
                    "audio": {"voice": "echo", "format": "mp3"}
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "choices": [{
                        "message": {
                            "role": "assistant",
                            "audio": {"id": "audio_1", "data": BASE64.encode(b"ID3-audio")}
                        }
                    }]
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::ChatAudio);
            let options = SynthesisOptions::new().with_voice("echo");
            let audio = provider.synthesize("Привет", &options).await.unwrap();

            assert_eq!(audio.data(), b"ID3-audio");
        }

        #[tokio::test]
        async fn synthesize_fails_without_audio_payload() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": "text only"}}]
                })))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::ChatAudio);
            let result = provider.synthesize("Test", &SynthesisOptions::default()).await;

            assert!(matches!(result, Err(SpeechError::InvalidResponse(_))));
        }

        #[tokio::test]
        async fn synthesize_fails_on_invalid_base64() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "choices": [{"message": {"audio": {"data": "***not base64***"}}}]
                })))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::ChatAudio);
            let result = provider.synthesize("Test", &SynthesisOptions::default()).await;

            assert!(matches!(result, Err(SpeechError::InvalidResponse(_))));
        }

        #[tokio::test]
        async fn synthesize_maps_model_not_found() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                    "error": {"message": "no such model", "code": "model_not_found"}
                })))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::ChatAudio);
            let result = provider.synthesize("Test", &SynthesisOptions::default()).await;

            assert!(
                matches!(result, Err(SpeechError::ModelNotAvailable(m)) if m == "gpt-4o-audio-preview")
            );
        }
    }

    mod validation {
        use super::*;

        #[tokio::test]
        async fn synthesize_empty_text_fails() {
            let mock_server = MockServer::start().await;
            let provider = create_test_provider(&mock_server, SpeechApiMode::Speech);

            let result = provider.synthesize("   ", &SynthesisOptions::default()).await;

            assert!(matches!(result, Err(SpeechError::SynthesisFailed(_))));
        }

        #[tokio::test]
        async fn synthesize_text_too_long_fails() {
            let mock_server = MockServer::start().await;
            let provider = create_test_provider(&mock_server, SpeechApiMode::Speech);

            let long_text = "a".repeat(5000);
            let result = provider
                .synthesize(&long_text, &SynthesisOptions::default())
                .await;

            assert!(matches!(result, Err(SpeechError::SynthesisFailed(_))));
        }

        #[tokio::test]
        async fn cyrillic_limit_counts_characters() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/speech"))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 8]))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::Speech);
            // 3000 chars but 6000 bytes
            let text = "ж".repeat(3000);

            assert!(provider.synthesize(&text, &SynthesisOptions::default()).await.is_ok());
        }

        #[test]
        fn new_fails_without_api_key() {
            let result = OpenAISpeechProvider::new(SpeechConfig::default());
            assert!(matches!(result, Err(SpeechError::Configuration(_))));
        }
    }

    mod availability {
        use super::*;

        #[tokio::test]
        async fn is_available_when_api_responds() {
            let mock_server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/models"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::Speech);
            assert!(provider.is_available().await);
        }

        #[tokio::test]
        async fn is_not_available_when_api_fails() {
            let mock_server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/models"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server, SpeechApiMode::Speech);
            assert!(!provider.is_available().await);
        }

        #[tokio::test]
        async fn list_voices_returns_all_openai_voices() {
            let mock_server = MockServer::start().await;
            let provider = create_test_provider(&mock_server, SpeechApiMode::Speech);

            let voices = provider.list_voices().await.unwrap();
            let ids: Vec<&str> = voices.iter().map(|v| v.id.as_str()).collect();

            assert_eq!(ids, ["alloy", "echo", "fable", "onyx", "nova", "shimmer"]);
        }

        #[tokio::test]
        async fn model_name_follows_mode() {
            let mock_server = MockServer::start().await;
            let speech = create_test_provider(&mock_server, SpeechApiMode::Speech);
            let chat = create_test_provider(&mock_server, SpeechApiMode::ChatAudio);

            assert_eq!(speech.model_name(), "tts-1");
            assert_eq!(chat.model_name(), "gpt-4o-audio-preview");
            assert_eq!(speech.default_voice(), "nova");
        }
    }
}
