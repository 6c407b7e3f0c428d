//! Adapters - Implementations of application ports
//!
//! Each adapter wraps an external crate and maps its errors to
//! [`application::ApplicationError`].

mod article_adapter;
mod ffmpeg_muxer_adapter;
mod openai_inference_adapter;
mod playback_adapter;
mod speech_adapter;

pub use article_adapter::ArticleAdapter;
pub use ffmpeg_muxer_adapter::FfmpegMuxerAdapter;
pub use openai_inference_adapter::OpenAIInferenceAdapter;
pub use playback_adapter::PlaybackAdapter;
pub use speech_adapter::SpeechAdapter;
