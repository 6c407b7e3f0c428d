//! Playback adapter - Implements AudioPlayerPort with a system audio player

use std::path::Path;

use ai_speech::{PlayerCommand, SpeechError, SystemAudioPlayer};
use application::{error::ApplicationError, ports::AudioPlayerPort};
use async_trait::async_trait;

/// Plays segments through the platform's command-line player
#[derive(Debug, Clone, Default)]
pub struct PlaybackAdapter {
    player: SystemAudioPlayer,
}

impl PlaybackAdapter {
    /// Detect the platform player on each call
    #[must_use]
    pub const fn new() -> Self {
        Self {
            player: SystemAudioPlayer::new(),
        }
    }

    /// Always run `program`, appending `args` before the file path
    #[must_use]
    pub fn with_command(program: &str, args: &[&str]) -> Self {
        Self {
            player: SystemAudioPlayer::with_command(PlayerCommand::new(program, args)),
        }
    }

    /// Check that a player can be resolved on this system
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Playback` naming the players that were tried.
    pub fn check(&self) -> Result<(), ApplicationError> {
        self.player
            .resolve_command()
            .map(|_| ())
            .map_err(Self::map_error)
    }

    fn map_error(err: SpeechError) -> ApplicationError {
        ApplicationError::Playback(err.to_string())
    }
}

#[async_trait]
impl AudioPlayerPort for PlaybackAdapter {
    async fn play(&self, path: &Path) -> Result<(), ApplicationError> {
        self.player.play(path).await.map_err(Self::map_error)
    }
}
