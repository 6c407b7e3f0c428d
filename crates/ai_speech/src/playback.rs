//! Local playback through the platform's command-line audio player

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::SpeechError;

/// Linux players in order of preference, with the flags that make them
/// play one file without a window and exit
const LINUX_PLAYERS: &[(&str, &[&str])] = &[
    ("mpv", &["--no-video", "--really-quiet"]),
    ("mplayer", &["-novideo", "-really-quiet"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("aplay", &["-q"]),
];

/// Program and flags used to play one file; the file path is appended last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlayerCommand {
    #[must_use]
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Plays audio files one at a time, returning when playback ends
#[derive(Debug, Clone, Default)]
pub struct SystemAudioPlayer {
    command: Option<PlayerCommand>,
}

impl SystemAudioPlayer {
    /// Player that detects the platform player on each call
    #[must_use]
    pub const fn new() -> Self {
        Self { command: None }
    }

    /// Player that always runs the given command
    #[must_use]
    pub const fn with_command(command: PlayerCommand) -> Self {
        Self {
            command: Some(command),
        }
    }

    /// Resolve the command for the current platform
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::NotAvailable` when no supported player is installed.
    pub fn resolve_command(&self) -> Result<PlayerCommand, SpeechError> {
        if let Some(command) = &self.command {
            return Ok(command.clone());
        }

        if cfg!(target_os = "macos") {
            Ok(PlayerCommand::new("afplay", &[]))
        } else if cfg!(target_os = "windows") {
            Ok(PlayerCommand::new("cmd", &["/C", "start", ""]))
        } else {
            LINUX_PLAYERS
                .iter()
                .find(|(program, _)| find_in_path(program).is_some())
                .map(|(program, args)| PlayerCommand::new(*program, args))
                .ok_or_else(|| {
                    SpeechError::NotAvailable(
                        "no audio player found (tried mpv, mplayer, ffplay, aplay)".to_string(),
                    )
                })
        }
    }

    /// Play a file and wait for the player to exit
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, no player is available, or the
    /// player exits unsuccessfully.
    #[instrument(skip(self), fields(file = %path.display()))]
    pub async fn play(&self, path: &Path) -> Result<(), SpeechError> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(SpeechError::PlaybackFailed(format!(
                "audio file does not exist: {}",
                path.display()
            )));
        }

        let command = self.resolve_command()?;
        debug!(player = %command.program, "Starting playback");

        let output = Command::new(&command.program)
            .args(&command.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                SpeechError::NotAvailable(format!("Failed to start {}: {e}", command.program))
            })?;

        if !output.status.success() {
            return Err(SpeechError::PlaybackFailed(format!(
                "{} exited with {}: {}",
                command.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

/// Locate an executable on `PATH`
fn find_in_path(program: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
