//! AI Speech - Text-to-Speech synthesis and audio delivery
//!
//! Provides the speech side of the podcast generator:
//! - `TextToSpeech` - Synthesize speech from text (TTS)
//! - `SystemAudioPlayer` - Play a finished segment through a local player
//! - `FfmpegMuxer` - Concatenate segments into one file or stream them to Icecast
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! # Supported Providers
//!
//! - OpenAI speech API (`/audio/speech`)
//! - OpenAI chat completions with the audio modality
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{OpenAISpeechProvider, SynthesisOptions, TextToSpeech};
//!
//! let provider = OpenAISpeechProvider::new(config)?;
//! let options = SynthesisOptions::new().with_voice("onyx").with_speed(1.1);
//! let audio = provider.synthesize("Hello, world!", &options).await?;
//! ```

pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod playback;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::{SpeechApiMode, SpeechConfig};
pub use error::SpeechError;
pub use ffmpeg::{FfmpegMuxer, IcecastTarget};
pub use playback::{PlayerCommand, SystemAudioPlayer};
pub use ports::TextToSpeech;
pub use providers::openai::OpenAISpeechProvider;
pub use types::{AudioData, AudioFormat, SynthesisOptions, VoiceGender, VoiceInfo};
