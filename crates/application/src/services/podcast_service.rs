//! Podcast service - The end-to-end use case
//!
//! 1. Fetch the article
//! 2. Script the discussion
//! 3. Pick a speech speed that fits the target duration
//! 4. Run the speech pipeline into a scratch directory
//! 5. Save, stream, or just play the result

use std::path::PathBuf;
use std::{fmt, sync::Arc};

use domain::{Discussion, Host, HostRoster};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    error::ApplicationError,
    ports::{ArticlePort, AudioMuxerPort, AudioPlayerPort, SpeechPort},
    services::{
        DiscussionService,
        speech_pipeline::{PipelineConfig, RunConfig, SpeechPipeline, write_playlist},
        speech_timing::{estimate_total_secs, speech_speed},
    },
};

/// Prefix of the per-run scratch directory
const SCRATCH_PREFIX: &str = "podcast";

/// Where the finished podcast goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Stream to the configured Icecast server
    Stream,
    /// Stay on this machine
    Local {
        /// Play each segment as soon as it is ready
        play: bool,
        /// Join all segments into this file
        save_to: Option<PathBuf>,
    },
}

impl Delivery {
    const fn needs_muxer(&self) -> bool {
        matches!(
            self,
            Self::Stream | Self::Local {
                save_to: Some(_),
                ..
            }
        )
    }

    const fn plays(&self) -> bool {
        matches!(self, Self::Local { play: true, .. })
    }
}

/// Configuration of a podcast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastConfig {
    /// Target length of the podcast in minutes
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,

    /// The host panel
    #[serde(default = "Host::default_panel")]
    pub hosts: Vec<Host>,

    /// Speech pipeline tuning
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

const fn default_duration_minutes() -> u32 {
    10
}

impl Default for PodcastConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_duration_minutes(),
            hosts: Host::default_panel(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl PodcastConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` describing the first problem.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.duration_minutes == 0 {
            return Err(ApplicationError::Configuration(
                "podcast.duration_minutes must be greater than 0".to_string(),
            ));
        }
        if self.hosts.is_empty() {
            return Err(ApplicationError::Configuration(
                "podcast.hosts must name at least one host".to_string(),
            ));
        }
        for host in &self.hosts {
            host.validate()?;
        }
        self.pipeline
            .validate()
            .map_err(ApplicationError::Configuration)
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct PodcastReport {
    /// Title of the discussed article
    pub title: String,
    /// Number of dialogue lines spoken
    pub lines: usize,
    /// Estimated length at normal speed, in seconds
    pub estimated_secs: f64,
    /// Speed the lines were synthesized at
    pub speed: f32,
    /// File the podcast was saved to
    pub saved_to: Option<PathBuf>,
    /// Whether the podcast was streamed
    pub streamed: bool,
}

/// Service that produces a podcast from an article URL
pub struct PodcastService {
    articles: Arc<dyn ArticlePort>,
    discussions: DiscussionService,
    pipeline: SpeechPipeline,
    muxer: Arc<dyn AudioMuxerPort>,
    player: Option<Arc<dyn AudioPlayerPort>>,
    config: PodcastConfig,
}

impl fmt::Debug for PodcastService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PodcastService")
            .field("discussions", &self.discussions)
            .field("pipeline", &self.pipeline)
            .field("has_player", &self.player.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PodcastService {
    /// Create a podcast service
    pub fn new(
        articles: Arc<dyn ArticlePort>,
        discussions: DiscussionService,
        speech: Arc<dyn SpeechPort>,
        muxer: Arc<dyn AudioMuxerPort>,
        config: PodcastConfig,
    ) -> Self {
        let pipeline = SpeechPipeline::with_config(speech, config.pipeline.clone());
        Self {
            articles,
            discussions,
            pipeline,
            muxer,
            player: None,
            config,
        }
    }

    /// Attach a player for local playback
    #[must_use]
    pub fn with_player(mut self, player: Arc<dyn AudioPlayerPort>) -> Self {
        self.player = Some(player);
        self
    }

    /// Configuration in effect
    #[must_use]
    pub const fn config(&self) -> &PodcastConfig {
        &self.config
    }

    /// Fetch, script, synthesize and deliver a podcast about `url`
    ///
    /// # Errors
    ///
    /// Returns the first failure of any stage. Nothing is saved or streamed
    /// unless every line was synthesized.
    #[instrument(skip(self, delivery))]
    pub async fn generate(
        &self,
        url: &str,
        delivery: &Delivery,
    ) -> Result<PodcastReport, ApplicationError> {
        self.check_delivery(delivery).await?;

        let article = self.articles.fetch_article(url).await?;
        info!(title = %article.title, chars = article.char_count(), "Article fetched");

        let discussion = self
            .discussions
            .generate(&article, &self.config.hosts, self.config.duration_minutes)
            .await?;

        self.deliver(&discussion, delivery).await
    }

    /// Synthesize and deliver an already scripted discussion
    ///
    /// # Errors
    ///
    /// Returns an error if the delivery cannot be carried out or any stage
    /// of synthesis, playback or muxing fails.
    #[instrument(skip_all, fields(title = %discussion.title, lines = discussion.len()))]
    pub async fn render(
        &self,
        discussion: &Discussion,
        delivery: &Delivery,
    ) -> Result<PodcastReport, ApplicationError> {
        self.check_delivery(delivery).await?;
        self.deliver(discussion, delivery).await
    }

    async fn deliver(
        &self,
        discussion: &Discussion,
        delivery: &Delivery,
    ) -> Result<PodcastReport, ApplicationError> {
        let estimated_secs = estimate_total_secs(&discussion.lines);
        let speed = speech_speed(estimated_secs, self.config.duration_minutes);
        info!(
            estimated_minutes = estimated_secs / 60.0,
            target_minutes = self.config.duration_minutes,
            speed,
            "Speech speed selected"
        );

        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir()
            .map_err(|e| ApplicationError::Internal(format!("failed to create scratch directory: {e}")))?;

        let mut run = RunConfig::new(HostRoster::from_hosts(&self.config.hosts), speed);
        if let Some(player) = self.player.as_ref().filter(|_| delivery.plays()) {
            run = run.with_player(Arc::clone(player));
        }

        let paths = self
            .pipeline
            .run(&discussion.lines, &run, scratch.path())
            .await?;
        let playlist = write_playlist(scratch.path(), &paths)
            .await
            .map_err(|e| ApplicationError::Internal(format!("failed to write playlist: {e}")))?;

        let mut report = PodcastReport {
            title: discussion.title.clone(),
            lines: paths.len(),
            estimated_secs,
            speed,
            saved_to: None,
            streamed: false,
        };

        match delivery {
            Delivery::Stream => {
                info!("Streaming podcast");
                self.muxer.stream(&playlist).await?;
                report.streamed = true;
            },
            Delivery::Local {
                save_to: Some(output),
                ..
            } => {
                self.muxer.concatenate(&playlist, output).await?;
                info!(output = %output.display(), "Podcast saved");
                report.saved_to = Some(output.clone());
            },
            Delivery::Local { save_to: None, .. } => {},
        }

        Ok(report)
    }

    /// Fail before any paid work if the delivery cannot be carried out
    async fn check_delivery(&self, delivery: &Delivery) -> Result<(), ApplicationError> {
        if delivery.plays() && self.player.is_none() {
            return Err(ApplicationError::Configuration(
                "local playback requested but no audio player is configured".to_string(),
            ));
        }
        if delivery.needs_muxer() && !self.muxer.is_available().await {
            return Err(ApplicationError::Muxing(
                "ffmpeg is required to save or stream the podcast".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use domain::{Article, AudioFormat, DialogueLine};
    use parking_lot::Mutex;

    use super::*;
    use crate::ports::{
        InferenceResult, MockArticlePort, MockAudioMuxerPort, MockAudioPlayerPort,
        MockInferencePort, MockSpeechPort, SynthesisResult,
    };
    use crate::services::PipelineError;

    const SCRIPT: &str = r#"[
        {"host":"Мария","content":"Сегодня говорим о Rust."},
        {"host":"Алексей","content":"Это огонь!"},
        {"host":"Дмитрий","content":"Ну, посмотрим."}
    ]"#;

    fn articles() -> MockArticlePort {
        let mut articles = MockArticlePort::new();
        articles.expect_fetch_article().returning(|url| {
            Ok(Article::new(url, "Rust", "Rust is a systems programming language."))
        });
        articles
    }

    fn discussions() -> DiscussionService {
        let mut inference = MockInferencePort::new();
        inference
            .expect_current_model()
            .returning(|| "gpt-4o".to_string());
        inference.expect_generate_with_system().returning(|_, _| {
            Ok(InferenceResult {
                content: SCRIPT.to_string(),
                model: "gpt-4o".to_string(),
                tokens_used: Some(100),
                latency_ms: 10,
            })
        });
        DiscussionService::new(Arc::new(inference))
    }

    fn speech() -> MockSpeechPort {
        let mut speech = MockSpeechPort::new();
        speech.expect_output_format().returning(|| AudioFormat::Mp3);
        speech.expect_synthesize().returning(|text, _| {
            Ok(SynthesisResult {
                audio_data: text.into_bytes(),
                format: AudioFormat::Mp3,
            })
        });
        speech
    }

    fn available_muxer() -> MockAudioMuxerPort {
        let mut muxer = MockAudioMuxerPort::new();
        muxer.expect_is_available().returning(|| true);
        muxer
    }

    fn service(muxer: MockAudioMuxerPort, speech: MockSpeechPort) -> PodcastService {
        PodcastService::new(
            Arc::new(articles()),
            discussions(),
            Arc::new(speech),
            Arc::new(muxer),
            PodcastConfig::default(),
        )
    }

    #[tokio::test]
    async fn streaming_uses_playlist_of_all_segments() {
        let seen: Arc<Mutex<Option<(PathBuf, String)>>> = Arc::new(Mutex::new(None));
        let captured = Arc::clone(&seen);
        let mut muxer = available_muxer();
        muxer.expect_stream().times(1).returning(move |playlist: &Path| {
            let contents = std::fs::read_to_string(playlist).unwrap();
            *captured.lock() = Some((playlist.to_path_buf(), contents));
            Ok(())
        });

        let report = service(muxer, speech())
            .generate("https://example.com/rust", &Delivery::Stream)
            .await
            .unwrap();

        assert!(report.streamed);
        assert_eq!(report.lines, 3);
        assert_eq!(report.title, "Rust");

        let (playlist, contents) = seen.lock().clone().unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.lines().next().unwrap().ends_with("segment_000.mp3'"));
        assert!(
            playlist
                .parent()
                .unwrap()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("podcast")
        );
        assert!(!playlist.exists(), "scratch directory must be removed");
    }

    #[tokio::test]
    async fn saving_concatenates_into_output() {
        let mut muxer = available_muxer();
        muxer
            .expect_concatenate()
            .withf(|_, output| output.ends_with("out.mp3"))
            .times(1)
            .returning(|_, _| Ok(()));
        let delivery = Delivery::Local {
            play: false,
            save_to: Some(PathBuf::from("/tmp/out.mp3")),
        };

        let report = service(muxer, speech())
            .generate("https://example.com/rust", &delivery)
            .await
            .unwrap();

        assert_eq!(report.saved_to, Some(PathBuf::from("/tmp/out.mp3")));
        assert!(!report.streamed);
    }

    #[tokio::test]
    async fn local_playback_plays_each_line() {
        let mut player = MockAudioPlayerPort::new();
        player.expect_play().times(3).returning(|_| Ok(()));
        let service = service(MockAudioMuxerPort::new(), speech()).with_player(Arc::new(player));
        let delivery = Delivery::Local {
            play: true,
            save_to: None,
        };

        let report = service
            .generate("https://example.com/rust", &delivery)
            .await
            .unwrap();

        assert_eq!(report.lines, 3);
        assert!(report.saved_to.is_none());
    }

    #[tokio::test]
    async fn playback_without_player_is_rejected_up_front() {
        let mut articles = MockArticlePort::new();
        articles.expect_fetch_article().never();
        let service = PodcastService::new(
            Arc::new(articles),
            discussions(),
            Arc::new(MockSpeechPort::new()),
            Arc::new(MockAudioMuxerPort::new()),
            PodcastConfig::default(),
        );
        let delivery = Delivery::Local {
            play: true,
            save_to: None,
        };

        let err = service.generate("https://e.com", &delivery).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[tokio::test]
    async fn missing_ffmpeg_is_rejected_before_synthesis() {
        let mut muxer = MockAudioMuxerPort::new();
        muxer.expect_is_available().returning(|| false);

        let err = service(muxer, MockSpeechPort::new())
            .generate("https://e.com", &Delivery::Stream)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Muxing(_)));
    }

    #[tokio::test]
    async fn synthesis_failure_produces_no_output() {
        let mut speech = MockSpeechPort::new();
        speech.expect_output_format().returning(|| AudioFormat::Mp3);
        speech
            .expect_synthesize()
            .returning(|_, _| Err(ApplicationError::Speech("quota".to_string())));
        let mut muxer = available_muxer();
        muxer.expect_stream().never();

        let err = service(muxer, speech)
            .generate("https://e.com", &Delivery::Stream)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Pipeline(PipelineError::Synthesis { index: 0, .. })
        ));
    }

    #[tokio::test]
    async fn render_reports_speed_within_bounds() {
        let service = service(MockAudioMuxerPort::new(), speech());
        let discussion = Discussion::new("T", vec![DialogueLine::new("Мария", "Коротко.")]).unwrap();
        let delivery = Delivery::Local {
            play: false,
            save_to: None,
        };

        let report = service.render(&discussion, &delivery).await.unwrap();

        // A one-word script is far too short for ten minutes
        assert!((report.speed - 1.2).abs() < f32::EPSILON);
        assert_eq!(report.lines, 1);
    }

    #[test]
    fn config_validation() {
        assert!(PodcastConfig::default().validate().is_ok());

        let no_hosts = PodcastConfig {
            hosts: vec![],
            ..PodcastConfig::default()
        };
        assert!(matches!(
            no_hosts.validate(),
            Err(ApplicationError::Configuration(_))
        ));

        let zero = PodcastConfig {
            duration_minutes: 0,
            ..PodcastConfig::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: PodcastConfig = serde_json::from_str(r#"{"duration_minutes": 5}"#).unwrap();
        assert_eq!(config.duration_minutes, 5);
        assert_eq!(config.hosts.len(), 3);
        assert_eq!(config.pipeline, PipelineConfig::default());
    }
}
