//! Icecast and local media tool settings

use ai_speech::IcecastTarget;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Icecast server the finished podcast is streamed to
#[derive(Debug, Clone, Deserialize)]
pub struct IcecastConfig {
    /// Server address as `host:port`
    #[serde(default = "default_address")]
    pub address: String,

    /// Mount point
    #[serde(default = "default_mount")]
    pub mount: String,

    /// Source username
    #[serde(default = "default_user")]
    pub user: String,

    /// Source password
    #[serde(default = "default_password")]
    pub password: SecretString,
}

fn default_address() -> String {
    "localhost:8000".to_string()
}

fn default_mount() -> String {
    "/podcast.mp3".to_string()
}

fn default_user() -> String {
    "source".to_string()
}

fn default_password() -> SecretString {
    SecretString::from("hackme")
}

impl Default for IcecastConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            mount: default_mount(),
            user: default_user(),
            password: default_password(),
        }
    }
}

impl IcecastConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.address.trim().is_empty() {
            return Err("icecast.address must not be empty".to_string());
        }
        if self.mount.trim().is_empty() {
            return Err("icecast.mount must not be empty".to_string());
        }
        Ok(())
    }

    /// Target handed to the muxer
    #[must_use]
    pub fn target(&self) -> IcecastTarget {
        IcecastTarget::new(
            self.address.clone(),
            self.mount.clone(),
            self.user.clone(),
            self.password.expose_secret().to_string(),
        )
    }
}

/// External programs used for delivery
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaConfig {
    /// FFmpeg binary (defaults to `ffmpeg` on `PATH`)
    #[serde(default)]
    pub ffmpeg_path: Option<String>,

    /// Player used for `--dry` runs; detected per platform when unset
    #[serde(default)]
    pub player: Option<PlayerConfig>,
}

/// Fixed player command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerConfig {
    /// Program to run
    pub program: String,

    /// Arguments placed before the file path
    #[serde(default)]
    pub args: Vec<String>,
}
