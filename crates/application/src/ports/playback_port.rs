//! Playback port - Interface for local audio playback

use std::path::Path;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for playing an audio file on the local machine
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AudioPlayerPort: Send + Sync {
    /// Play the file and return once playback has finished
    async fn play(&self, path: &Path) -> Result<(), ApplicationError>;
}
