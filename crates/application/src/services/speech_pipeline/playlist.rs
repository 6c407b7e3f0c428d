//! ffmpeg concat playlist

use std::io;
use std::path::{Path, PathBuf};

/// File name of the playlist inside the scratch directory
pub const PLAYLIST_FILE: &str = "concat.txt";

/// Render a concat-demuxer list with one `file '<path>'` line per segment
#[must_use]
pub fn render_playlist(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| {
            let escaped = path.to_string_lossy().replace('\'', r"'\''");
            format!("file '{escaped}'\n")
        })
        .collect()
}

/// Write the playlist for `paths` into `dir` and return its location
///
/// # Errors
///
/// Returns the I/O error if the file cannot be written.
pub async fn write_playlist(dir: &Path, paths: &[PathBuf]) -> io::Result<PathBuf> {
    let playlist = dir.join(PLAYLIST_FILE);
    tokio::fs::write(&playlist, render_playlist(paths)).await?;
    Ok(playlist)
}
