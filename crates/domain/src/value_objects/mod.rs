//! Value Objects - Immutable, identity-less domain primitives

mod host_roster;
mod voice_profile;

pub use host_roster::HostRoster;
pub use voice_profile::{VoiceGender, VoiceProfile};
