//! FFmpeg muxer adapter - Implements AudioMuxerPort using ai_speech

use std::path::Path;

use ai_speech::{FfmpegMuxer, IcecastTarget, SpeechError};
use application::{error::ApplicationError, ports::AudioMuxerPort};
use async_trait::async_trait;
use domain::AudioFormat;
use tracing::instrument;

/// Joins or streams segment playlists with FFmpeg
#[derive(Debug, Clone)]
pub struct FfmpegMuxerAdapter {
    muxer: FfmpegMuxer,
    icecast: Option<IcecastTarget>,
}

impl FfmpegMuxerAdapter {
    /// Create an adapter for segments in `format`
    #[must_use]
    pub fn new(format: AudioFormat) -> Self {
        Self {
            muxer: FfmpegMuxer::new().with_format(format),
            icecast: None,
        }
    }

    /// Use a custom FFmpeg binary
    #[must_use]
    pub fn with_ffmpeg_path(mut self, path: impl Into<String>) -> Self {
        self.muxer = self.muxer.with_ffmpeg_path(path);
        self
    }

    /// Stream to the given Icecast mount
    #[must_use]
    pub fn with_icecast(mut self, target: IcecastTarget) -> Self {
        self.icecast = Some(target);
        self
    }

    fn map_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::Configuration(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::Muxing(other.to_string()),
        }
    }
}

#[async_trait]
impl AudioMuxerPort for FfmpegMuxerAdapter {
    async fn concatenate(&self, playlist: &Path, output: &Path) -> Result<(), ApplicationError> {
        self.muxer
            .concat_to_file(playlist, output)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(playlist = %playlist.display()))]
    async fn stream(&self, playlist: &Path) -> Result<(), ApplicationError> {
        let target = self.icecast.as_ref().ok_or_else(|| {
            ApplicationError::Configuration("no Icecast server configured".to_string())
        })?;
        self.muxer
            .stream_to_icecast(playlist, target)
            .await
            .map_err(Self::map_error)
    }

    async fn is_available(&self) -> bool {
        self.muxer.is_available().await
    }
}
