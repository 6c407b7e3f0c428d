//! Application services - Use case implementations

mod discussion_service;
mod podcast_service;
pub mod speech_pipeline;
pub mod speech_timing;

pub use discussion_service::{DiscussionConfig, DiscussionService};
pub use podcast_service::{Delivery, PodcastConfig, PodcastReport, PodcastService};
pub use speech_pipeline::{
    OrderedSegmentBuffer, PipelineConfig, PipelineError, RunConfig, Segment, SegmentStore,
    SpeechPipeline, SynthesisRequest,
};
