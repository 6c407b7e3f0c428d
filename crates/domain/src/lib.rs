//! Domain layer for the AI podcast generator
//!
//! Contains the podcast vocabulary: hosts and their voices, articles,
//! dialogue lines and discussions, plus domain errors.
//! This layer has no I/O and no knowledge of the providers used to
//! fetch articles or synthesize speech.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
