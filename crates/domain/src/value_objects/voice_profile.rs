//! Voice profile value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Gender of a host voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Male,
    Female,
}

impl VoiceGender {
    /// Lowercase label used in prompts and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceGender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            other => Err(DomainError::InvalidGender(other.to_string())),
        }
    }
}

/// The voice a speaker is rendered with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// Voice gender
    pub gender: VoiceGender,
    /// Synthesizer voice identifier (e.g. "nova", "onyx")
    pub voice: String,
}

impl VoiceProfile {
    /// Create a new voice profile
    pub fn new(gender: VoiceGender, voice: impl Into<String>) -> Self {
        Self {
            gender,
            voice: voice.into(),
        }
    }

    /// Profile used for speakers that are not part of the panel
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(VoiceGender::Female, "nova")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_case_insensitive() {
        assert_eq!("Male".parse::<VoiceGender>().unwrap(), VoiceGender::Male);
        assert_eq!(" female ".parse::<VoiceGender>().unwrap(), VoiceGender::Female);
        assert_eq!("f".parse::<VoiceGender>().unwrap(), VoiceGender::Female);
    }

    #[test]
    fn gender_rejects_unknown() {
        assert!(matches!(
            "robot".parse::<VoiceGender>(),
            Err(DomainError::InvalidGender(_))
        ));
    }

    #[test]
    fn gender_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&VoiceGender::Female).unwrap(),
            "\"female\""
        );
    }

    #[test]
    fn fallback_profile_is_female_nova() {
        let profile = VoiceProfile::fallback();
        assert_eq!(profile.gender, VoiceGender::Female);
        assert_eq!(profile.voice, "nova");
    }
}
