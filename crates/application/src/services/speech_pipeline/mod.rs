//! Ordered, pipelined speech generation
//!
//! The coordinator hands dialogue lines to a pool of workers, at most
//! `lookahead` lines ahead of the release cursor. Finished segments may come
//! back in any order; they are parked in an [`OrderedSegmentBuffer`] and
//! released strictly by index: written to disk, optionally played, and
//! appended to the output list.
//!
//! Any failure stops the workers and aborts the run. A run either yields one
//! file per line, in order, or an error naming the line it failed on.

mod buffer;
mod playlist;
mod segment_store;
mod worker;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use domain::{DialogueLine, HostRoster, VoiceGender};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

pub use buffer::{OrderedSegmentBuffer, Rejection};
pub use playlist::{PLAYLIST_FILE, render_playlist, write_playlist};
pub use segment_store::SegmentStore;

use crate::error::ApplicationError;
use crate::ports::{AudioPlayerPort, SpeechPort, VoiceConfig};
use crate::services::speech_timing::truncate_for_display;
use worker::SpeechWorker;

/// Default number of lines synthesized ahead of playback
pub const DEFAULT_LOOKAHEAD: usize = 2;
/// Default wait for the next finished segment, in seconds
pub const DEFAULT_SEGMENT_TIMEOUT_SECS: u64 = 30;
/// Default size of the worker pool
pub const DEFAULT_WORKERS: usize = 1;

/// Failures that abort a pipeline run
///
/// Every variant names the sequence index it happened at.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No segment arrived within the wait limit
    #[error("Timed out after {waited:?} waiting for segment {index}")]
    Timeout {
        /// Release cursor at the time of the timeout
        index: usize,
        /// How long the coordinator waited
        waited: Duration,
    },

    /// Synthesis of a line failed
    #[error("Speech synthesis failed for segment {index}: {source}")]
    Synthesis {
        /// Index of the failed line
        index: usize,
        /// Error reported by the synthesizer
        source: Box<ApplicationError>,
    },

    /// A segment could not be written to disk
    #[error("Failed to write segment {index} to {}: {source}", path.display())]
    Write {
        /// Index of the segment
        index: usize,
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Playing a released segment failed
    #[error("Playback failed for segment {index}: {source}")]
    Playback {
        /// Index of the segment
        index: usize,
        /// Error reported by the player
        source: Box<ApplicationError>,
    },

    /// All workers exited before every segment was released
    #[error("Speech workers exited before segment {index} was produced")]
    WorkersExited {
        /// Release cursor at the time
        index: usize,
    },

    /// A worker reported an index that was not expected
    #[error("Unexpected segment {index}")]
    UnexpectedSegment {
        /// The reported index
        index: usize,
    },
}

impl PipelineError {
    /// Sequence index the failure refers to
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Timeout { index, .. }
            | Self::Synthesis { index, .. }
            | Self::Write { index, .. }
            | Self::Playback { index, .. }
            | Self::WorkersExited { index }
            | Self::UnexpectedSegment { index } => *index,
        }
    }
}

/// Work item for a speech worker
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Position of the line in the dialogue
    pub index: usize,
    /// The line to speak
    pub line: DialogueLine,
    /// Synthesizer voice
    pub voice: String,
    /// Voice gender
    pub gender: VoiceGender,
    /// Speed factor
    pub speed: f32,
}

impl SynthesisRequest {
    /// Build the request for line `index`, resolving its voice via the roster
    #[must_use]
    pub fn new(index: usize, line: &DialogueLine, roster: &HostRoster, speed: f32) -> Self {
        let profile = roster.resolve(&line.speaker);
        Self {
            index,
            line: line.clone(),
            voice: profile.voice,
            gender: profile.gender,
            speed,
        }
    }

    /// Voice settings passed to the synthesizer
    #[must_use]
    pub fn voice_config(&self) -> VoiceConfig {
        VoiceConfig::new(self.voice.clone(), self.speed)
    }
}

/// Outcome of one synthesis request
#[derive(Debug)]
pub struct Segment {
    /// Position of the line in the dialogue
    pub index: usize,
    /// Speaker of the line
    pub speaker: String,
    /// Encoded audio, empty when synthesis failed
    pub audio: Vec<u8>,
    /// The line this segment was made from
    pub line: DialogueLine,
    /// Synthesis failure, if any
    pub error: Option<ApplicationError>,
}

impl Segment {
    /// Segment holding synthesized audio
    #[must_use]
    pub fn synthesized(index: usize, line: DialogueLine, audio: Vec<u8>) -> Self {
        Self {
            index,
            speaker: line.speaker.clone(),
            audio,
            line,
            error: None,
        }
    }

    /// Segment reporting a failed synthesis
    #[must_use]
    pub fn failed(index: usize, line: DialogueLine, error: ApplicationError) -> Self {
        Self {
            index,
            speaker: line.speaker.clone(),
            audio: Vec::new(),
            line,
            error: Some(error),
        }
    }
}

/// Tuning of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Lines synthesized ahead of the release cursor (at least 1)
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,

    /// Seconds to wait for the next finished segment
    #[serde(default = "default_segment_timeout_secs")]
    pub segment_timeout_secs: u64,

    /// Number of concurrent speech workers (at least 1)
    #[serde(default = "default_workers")]
    pub workers: usize,
}

const fn default_lookahead() -> usize {
    DEFAULT_LOOKAHEAD
}

const fn default_segment_timeout_secs() -> u64 {
    DEFAULT_SEGMENT_TIMEOUT_SECS
}

const fn default_workers() -> usize {
    DEFAULT_WORKERS
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookahead: default_lookahead(),
            segment_timeout_secs: default_segment_timeout_secs(),
            workers: default_workers(),
        }
    }
}

impl PipelineConfig {
    /// Wait limit for one segment
    #[must_use]
    pub const fn segment_timeout(&self) -> Duration {
        Duration::from_secs(self.segment_timeout_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.lookahead == 0 {
            return Err("pipeline.lookahead must be at least 1".to_string());
        }
        if self.workers == 0 {
            return Err("pipeline.workers must be at least 1".to_string());
        }
        if self.segment_timeout_secs == 0 {
            return Err("pipeline.segment_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Per-run inputs of the pipeline
#[derive(Clone)]
pub struct RunConfig {
    /// Speaker to voice mapping for this run
    pub roster: HostRoster,
    /// Speed factor applied to every line
    pub speed: f32,
    /// Player for interactive runs; each segment is played as it is released
    pub player: Option<Arc<dyn AudioPlayerPort>>,
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("roster", &self.roster)
            .field("speed", &self.speed)
            .field("interactive", &self.player.is_some())
            .finish()
    }
}

impl RunConfig {
    /// Non-interactive run at `speed`
    #[must_use]
    pub const fn new(roster: HostRoster, speed: f32) -> Self {
        Self {
            roster,
            speed,
            player: None,
        }
    }

    /// Play every segment as it is released
    #[must_use]
    pub fn with_player(mut self, player: Arc<dyn AudioPlayerPort>) -> Self {
        self.player = Some(player);
        self
    }
}

/// The pipeline coordinator
pub struct SpeechPipeline {
    speech: Arc<dyn SpeechPort>,
    config: PipelineConfig,
}

impl fmt::Debug for SpeechPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Channels of one run, as seen by the coordinator
struct RunChannels {
    requests: mpsc::Sender<SynthesisRequest>,
    results: mpsc::Receiver<Segment>,
}

impl SpeechPipeline {
    /// Create a pipeline with default tuning
    pub fn new(speech: Arc<dyn SpeechPort>) -> Self {
        Self::with_config(speech, PipelineConfig::default())
    }

    /// Create a pipeline with custom tuning
    ///
    /// Zero lookahead or worker counts are raised to 1.
    pub fn with_config(speech: Arc<dyn SpeechPort>, config: PipelineConfig) -> Self {
        let config = PipelineConfig {
            lookahead: config.lookahead.max(1),
            workers: config.workers.max(1),
            ..config
        };
        Self { speech, config }
    }

    /// Pipeline tuning in effect
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Synthesize every line and release the segments in order
    ///
    /// Returns the segment files in dialogue order. Workers are stopped and
    /// joined before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns the first [`PipelineError`] encountered; nothing is returned
    /// for the lines that were already released.
    #[instrument(skip_all, fields(lines = lines.len(), lookahead = self.config.lookahead))]
    pub async fn run(
        &self,
        lines: &[DialogueLine],
        run: &RunConfig,
        dir: &Path,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            workers = self.config.workers,
            speed = run.speed,
            interactive = run.player.is_some(),
            "Starting speech pipeline"
        );

        let window = self.config.lookahead;
        let (request_tx, request_rx) = mpsc::channel(window);
        let (result_tx, result_rx) = mpsc::channel(window);
        let (stop_tx, stop_rx) = watch::channel(false);

        let shared_requests = Arc::new(Mutex::new(request_rx));
        let workers: Vec<JoinHandle<()>> = (0..self.config.workers)
            .map(|id| {
                let worker = SpeechWorker::new(
                    id,
                    Arc::clone(&self.speech),
                    Arc::clone(&shared_requests),
                    result_tx.clone(),
                    stop_rx.clone(),
                );
                tokio::spawn(worker.run())
            })
            .collect();
        // Only workers hold result senders, so the queue closes once they all exit
        drop(result_tx);

        let mut channels = RunChannels {
            requests: request_tx,
            results: result_rx,
        };
        let outcome = self.drive(lines, run, dir, &mut channels).await;

        let _ = stop_tx.send(true);
        drop(channels);
        for handle in workers {
            if let Err(e) = handle.await {
                warn!(error = %e, "Speech worker panicked");
            }
        }

        match &outcome {
            Ok(paths) => info!(segments = paths.len(), "Speech pipeline finished"),
            Err(e) => warn!(index = e.index(), error = %e, "Speech pipeline aborted"),
        }
        outcome
    }

    async fn drive(
        &self,
        lines: &[DialogueLine],
        run: &RunConfig,
        dir: &Path,
        channels: &mut RunChannels,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let total = lines.len();
        let window = self.config.lookahead;
        let wait = self.config.segment_timeout();

        let buffer = OrderedSegmentBuffer::new();
        let store = SegmentStore::new(dir, total, self.speech.output_format());
        let mut paths = Vec::with_capacity(total);
        let mut next_issue = 0;
        let mut cursor = 0;

        while cursor < total {
            while next_issue < total && next_issue - cursor < window {
                let request = SynthesisRequest::new(next_issue, &lines[next_issue], &run.roster, run.speed);
                debug!(
                    index = next_issue,
                    speaker = %request.line.speaker,
                    voice = %request.voice,
                    text = %truncate_for_display(&request.line.text),
                    "Issuing synthesis request"
                );
                channels
                    .requests
                    .send(request)
                    .await
                    .map_err(|_| PipelineError::WorkersExited { index: cursor })?;
                next_issue += 1;
            }

            let mut segment = match timeout(wait, channels.results.recv()).await {
                Ok(Some(segment)) => segment,
                Ok(None) => return Err(PipelineError::WorkersExited { index: cursor }),
                Err(_) => {
                    return Err(PipelineError::Timeout {
                        index: cursor,
                        waited: wait,
                    });
                },
            };

            let index = segment.index;
            if let Some(source) = segment.error.take() {
                return Err(PipelineError::Synthesis {
                    index,
                    source: Box::new(source),
                });
            }
            if index >= next_issue {
                return Err(PipelineError::UnexpectedSegment { index });
            }
            buffer
                .insert(segment)
                .map_err(|_| PipelineError::UnexpectedSegment { index })?;

            while let Some(ready) = buffer.take_if_next(cursor) {
                let path = store
                    .save(cursor, &ready.audio)
                    .await
                    .map_err(|source| PipelineError::Write {
                        index: cursor,
                        path: store.path_for(cursor),
                        source,
                    })?;

                if let Some(player) = &run.player {
                    debug!(index = cursor, speaker = %ready.speaker, "Playing segment");
                    player
                        .play(&path)
                        .await
                        .map_err(|source| PipelineError::Playback {
                            index: cursor,
                            source: Box::new(source),
                        })?;
                }

                paths.push(path);
                cursor += 1;
            }
        }

        Ok(paths)
    }
}
