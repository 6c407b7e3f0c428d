//! Immutable speaker → voice mapping

use std::collections::HashMap;

use crate::entities::Host;
use crate::value_objects::VoiceProfile;

/// Lookup table from speaker name to voice profile
///
/// Built once per podcast run from the configured hosts and shared
/// read-only with the speech pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostRoster {
    profiles: HashMap<String, VoiceProfile>,
    fallback: Option<VoiceProfile>,
}

impl HostRoster {
    /// Build a roster from a host panel
    ///
    /// Later hosts with a duplicate name replace earlier ones.
    #[must_use]
    pub fn from_hosts(hosts: &[Host]) -> Self {
        let profiles = hosts
            .iter()
            .map(|host| (host.name.clone(), host.voice_profile()))
            .collect();
        Self {
            profiles,
            fallback: None,
        }
    }

    /// Override the profile used for unknown speakers
    #[must_use]
    pub fn with_fallback(mut self, profile: VoiceProfile) -> Self {
        self.fallback = Some(profile);
        self
    }

    /// Resolve the voice for a speaker, falling back for unknown names
    #[must_use]
    pub fn resolve(&self, speaker: &str) -> VoiceProfile {
        self.profiles
            .get(speaker)
            .cloned()
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(VoiceProfile::fallback)
    }

    /// Whether the speaker is a panel member
    #[must_use]
    pub fn contains(&self, speaker: &str) -> bool {
        self.profiles.contains_key(speaker)
    }

    /// Number of known speakers
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the roster knows no speakers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
