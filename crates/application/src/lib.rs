//! Application layer - Use cases and orchestration
//!
//! Contains the podcast use cases and the port definitions they depend on.
//! The speech pipeline lives here: it turns dialogue lines into audio
//! segments on disk, in order, with bounded lookahead.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
