//! Audio muxer port - Interface for joining and streaming segment files

use std::path::Path;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for turning a concat playlist into a single output
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AudioMuxerPort: Send + Sync {
    /// Join the files listed in `playlist` into `output`
    async fn concatenate(&self, playlist: &Path, output: &Path) -> Result<(), ApplicationError>;

    /// Stream the files listed in `playlist` to the configured server in real time
    async fn stream(&self, playlist: &Path) -> Result<(), ApplicationError>;

    /// Whether the muxer backend can be used
    async fn is_available(&self) -> bool;
}
