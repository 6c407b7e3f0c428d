//! Domain entities

mod article;
mod audio_format;
mod discussion;
mod host;

pub use article::Article;
pub use audio_format::AudioFormat;
pub use discussion::{DialogueLine, Discussion};
pub use host::Host;
