//! Podcast host entity

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{VoiceGender, VoiceProfile};

/// A podcast host with a personality and a synthesizer voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    /// Display name, also used as the speaker identifier in dialogue lines
    pub name: String,
    /// Voice gender
    pub gender: VoiceGender,
    /// Personality traits and perspective, fed to the discussion prompt
    #[serde(default)]
    pub character: String,
    /// Synthesizer voice identifier
    pub voice: String,
}

impl Host {
    /// Create a new host
    pub fn new(
        name: impl Into<String>,
        gender: VoiceGender,
        character: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            gender,
            character: character.into(),
            voice: voice.into(),
        }
    }

    /// Voice profile of this host
    #[must_use]
    pub fn voice_profile(&self) -> VoiceProfile {
        VoiceProfile::new(self.gender, self.voice.clone())
    }

    /// One-line description used in the discussion prompt
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} ({}): {}", self.name, self.gender, self.character)
    }

    /// Validate the host definition
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidHost` if the name or voice is blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidHost("name must not be empty".to_string()));
        }
        if self.voice.trim().is_empty() {
            return Err(DomainError::InvalidHost(format!(
                "host '{}' has no voice",
                self.name
            )));
        }
        Ok(())
    }

    /// The default three-host panel
    #[must_use]
    pub fn default_panel() -> Vec<Self> {
        vec![
            Self::new(
                "Алексей",
                VoiceGender::Male,
                "Young tech enthusiast who follows every trend. Speaks fast and with \
                 excitement, loves modern slang and believes in the power of innovation. \
                 Sometimes naive, always sincere.",
                "onyx",
            ),
            Self::new(
                "Мария",
                VoiceGender::Female,
                "Experienced economist with a deep understanding of technology trends. \
                 Speaks clearly, backs arguments with data, asks provocative questions \
                 and can be ironic and witty.",
                "nova",
            ),
            Self::new(
                "Дмитрий",
                VoiceGender::Male,
                "Skeptical technologist with long industry experience. Speaks in a measured \
                 way with healthy cynicism, brings up historical examples and warns about \
                 risks. Dry humor, but admits when wrong.",
                "echo",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_panel_has_three_valid_hosts() {
        let panel = Host::default_panel();
        assert_eq!(panel.len(), 3);
        assert!(panel.iter().all(|h| h.validate().is_ok()));
        assert_eq!(panel[0].voice, "onyx");
        assert_eq!(panel[1].gender, VoiceGender::Female);
    }

    #[test]
    fn describe_includes_name_gender_and_character() {
        let host = Host::new("Anna", VoiceGender::Female, "curious", "shimmer");
        assert_eq!(host.describe(), "Anna (female): curious");
    }

    #[test]
    fn validate_rejects_blank_name() {
        let host = Host::new("  ", VoiceGender::Male, "", "echo");
        assert!(matches!(host.validate(), Err(DomainError::InvalidHost(_))));
    }

    #[test]
    fn validate_rejects_blank_voice() {
        let host = Host::new("Bob", VoiceGender::Male, "", "");
        assert!(matches!(host.validate(), Err(DomainError::InvalidHost(_))));
    }

    #[test]
    fn host_deserializes_without_character() {
        let host: Host =
            serde_json::from_str(r#"{"name":"Bob","gender":"male","voice":"echo"}"#).unwrap();
        assert_eq!(host.name, "Bob");
        assert!(host.character.is_empty());
    }
}
