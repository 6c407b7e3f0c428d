//! Segment files in the run's scratch directory

use std::io;
use std::path::{Path, PathBuf};

use domain::AudioFormat;
use tracing::debug;

/// Narrowest index field in segment file names
const MIN_INDEX_WIDTH: usize = 3;

/// Writes released segments as `segment_<index>.<ext>`
///
/// Indices are zero-padded to a width that fits every index of the run, so
/// sorting the names lexically gives playback order.
#[derive(Debug, Clone)]
pub struct SegmentStore {
    dir: PathBuf,
    width: usize,
    extension: &'static str,
}

impl SegmentStore {
    /// Create a store for a run of `total` segments
    pub fn new(dir: impl Into<PathBuf>, total: usize, format: AudioFormat) -> Self {
        Self {
            dir: dir.into(),
            width: index_width(total),
            extension: format.extension(),
        }
    }

    /// Directory the segments are written to
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for `index`
    #[must_use]
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!(
            "segment_{index:0width$}.{ext}",
            width = self.width,
            ext = self.extension
        ))
    }

    /// Write the audio of segment `index`, replacing any earlier file
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be written.
    pub async fn save(&self, index: usize, audio: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(index);
        tokio::fs::write(&path, audio).await?;
        debug!(index, path = %path.display(), bytes = audio.len(), "Saved segment");
        Ok(path)
    }
}

/// Digits needed for the largest index of a `total`-segment run
fn index_width(total: usize) -> usize {
    let largest = total.saturating_sub(1);
    let digits = largest.checked_ilog10().map_or(1, |log| log as usize + 1);
    digits.max(MIN_INDEX_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_at_least_three() {
        assert_eq!(index_width(0), 3);
        assert_eq!(index_width(1), 3);
        assert_eq!(index_width(1000), 3);
        assert_eq!(index_width(1001), 4);
        assert_eq!(index_width(100_001), 6);
    }

    #[test]
    fn file_names_are_padded() {
        let store = SegmentStore::new("/tmp/run", 12, AudioFormat::Mp3);
        assert_eq!(store.path_for(7), PathBuf::from("/tmp/run/segment_007.mp3"));

        let store = SegmentStore::new("/tmp/run", 2500, AudioFormat::Opus);
        assert_eq!(store.path_for(42), PathBuf::from("/tmp/run/segment_0042.opus"));
    }

    #[tokio::test]
    async fn saving_twice_gives_identical_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SegmentStore::new(dir.path(), 3, AudioFormat::Mp3);

        let first = store.save(1, b"audio-1").await.unwrap();
        let second = store.save(1, b"audio-1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"audio-1");
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SegmentStore::new(dir.path().join("gone"), 1, AudioFormat::Mp3);
        assert!(store.save(0, b"x").await.is_err());
    }
}
