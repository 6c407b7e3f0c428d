//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod article_port;
mod audio_muxer_port;
mod inference_port;
mod playback_port;
mod speech_port;

#[cfg(test)]
pub use article_port::MockArticlePort;
pub use article_port::ArticlePort;
#[cfg(test)]
pub use audio_muxer_port::MockAudioMuxerPort;
pub use audio_muxer_port::AudioMuxerPort;
#[cfg(test)]
pub use inference_port::MockInferencePort;
pub use inference_port::{InferencePort, InferenceResult};
#[cfg(test)]
pub use playback_port::MockAudioPlayerPort;
pub use playback_port::AudioPlayerPort;
#[cfg(test)]
pub use speech_port::MockSpeechPort;
pub use speech_port::{SpeechPort, SynthesisResult, VoiceConfig, VoiceInfo};
