//! `generate` command: flags, delivery and service wiring

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use application::{Delivery, DiscussionService, PodcastService, SpeechPort};
use clap::Args;
use infrastructure::{
    AppConfig, ArticleAdapter, FfmpegMuxerAdapter, OpenAIInferenceAdapter, PlaybackAdapter,
    SpeechAdapter,
};

/// Flags of the `generate` command
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// URL of the article to discuss
    #[arg(long)]
    pub url: String,

    /// Target podcast duration in minutes
    #[arg(short, long)]
    pub duration: Option<u32>,

    /// Play locally instead of streaming to Icecast
    #[arg(long)]
    pub dry: bool,

    /// Save the podcast to this file instead of streaming
    #[arg(long, value_name = "FILE")]
    pub mp3: Option<PathBuf>,

    /// Icecast server address (host:port)
    #[arg(long, value_name = "ADDRESS")]
    pub icecast: Option<String>,

    /// Icecast mount point
    #[arg(long)]
    pub mount: Option<String>,

    /// Icecast username
    #[arg(long)]
    pub user: Option<String>,

    /// Icecast password
    #[arg(long, value_name = "PASSWORD")]
    pub pass: Option<String>,
}

impl GenerateArgs {
    /// Where the podcast goes
    ///
    /// `--dry` and `--mp3` keep the podcast local and may be combined;
    /// without either it is streamed.
    pub fn delivery(&self) -> Delivery {
        if self.dry || self.mp3.is_some() {
            Delivery::Local {
                play: self.dry,
                save_to: self.mp3.clone(),
            }
        } else {
            Delivery::Stream
        }
    }

    /// Apply the flags on top of the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(duration) = self.duration {
            config.podcast.duration_minutes = duration;
        }
        if let Some(address) = &self.icecast {
            config.icecast.address.clone_from(address);
        }
        if let Some(mount) = &self.mount {
            config.icecast.mount.clone_from(mount);
        }
        if let Some(user) = &self.user {
            config.icecast.user.clone_from(user);
        }
        if let Some(pass) = &self.pass {
            config.icecast.password = pass.clone().into();
        }
    }
}

/// Speech adapter for the configured provider
pub fn speech_adapter(config: &AppConfig) -> anyhow::Result<SpeechAdapter> {
    Ok(SpeechAdapter::new(config.speech_config())
        .context("failed to set up speech synthesis")?
        .with_retry(config.retry.clone()))
}

/// Player honouring `[media.player]`, checked to exist
fn player(config: &AppConfig) -> anyhow::Result<PlaybackAdapter> {
    let player = match &config.media.player {
        Some(command) => {
            let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
            PlaybackAdapter::with_command(&command.program, &args)
        },
        None => PlaybackAdapter::new(),
    };
    player.check()?;
    Ok(player)
}

/// Wire the adapters into a podcast service
pub fn build_service(config: &AppConfig, delivery: &Delivery) -> anyhow::Result<PodcastService> {
    let inference = OpenAIInferenceAdapter::new(config.inference_config())
        .context("failed to set up chat completions")?
        .with_retry(config.retry.clone());
    let speech = speech_adapter(config)?;
    let articles = ArticleAdapter::new(config.article.clone())
        .context("failed to set up article fetching")?
        .with_retry(config.retry.clone());

    let mut muxer =
        FfmpegMuxerAdapter::new(speech.output_format()).with_icecast(config.icecast.target());
    if let Some(path) = &config.media.ffmpeg_path {
        muxer = muxer.with_ffmpeg_path(path.clone());
    }

    let discussions =
        DiscussionService::with_config(Arc::new(inference), config.discussion.clone());
    let service = PodcastService::new(
        Arc::new(articles),
        discussions,
        Arc::new(speech),
        Arc::new(muxer),
        config.podcast.clone(),
    );

    if matches!(delivery, Delivery::Local { play: true, .. }) {
        Ok(service.with_player(Arc::new(player(config)?)))
    } else {
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use infrastructure::IcecastConfig;

    use super::*;

    fn args(extra: impl FnOnce(&mut GenerateArgs)) -> GenerateArgs {
        let mut args = GenerateArgs {
            url: "https://example.com/post".to_string(),
            duration: None,
            dry: false,
            mp3: None,
            icecast: None,
            mount: None,
            user: None,
            pass: None,
        };
        extra(&mut args);
        args
    }

    #[test]
    fn streams_by_default() {
        assert_eq!(args(|_| {}).delivery(), Delivery::Stream);
    }

    #[test]
    fn dry_plays_locally() {
        assert_eq!(
            args(|a| a.dry = true).delivery(),
            Delivery::Local {
                play: true,
                save_to: None
            }
        );
    }

    #[test]
    fn dry_and_mp3_combine() {
        let delivery = args(|a| {
            a.dry = true;
            a.mp3 = Some(PathBuf::from("out.mp3"));
        })
        .delivery();

        assert_eq!(
            delivery,
            Delivery::Local {
                play: true,
                save_to: Some(PathBuf::from("out.mp3"))
            }
        );
    }

    #[test]
    fn flags_override_config() {
        let mut config = AppConfig::default();
        args(|a| {
            a.duration = Some(4);
            a.icecast = Some("radio:9000".to_string());
            a.mount = Some("/live.mp3".to_string());
        })
        .apply(&mut config);

        assert_eq!(config.podcast.duration_minutes, 4);
        assert_eq!(config.icecast.address, "radio:9000");
        assert_eq!(config.icecast.mount, "/live.mp3");
        assert_eq!(config.icecast.user, IcecastConfig::default().user);
    }

    #[test]
    fn missing_api_key_is_reported() {
        let config = AppConfig::default();
        let err = build_service(&config, &Delivery::Stream).unwrap_err();
        assert!(err.to_string().contains("chat completions"));
    }

    #[test]
    fn builds_with_api_key() {
        let mut config = AppConfig::default();
        config.set_api_key("sk-test");
        assert!(build_service(&config, &Delivery::Stream).is_ok());
    }
}
