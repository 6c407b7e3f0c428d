//! AI podcast generator CLI
//!
//! Turns an article into a multi-host podcast and plays, saves or streams it.

#![allow(clippy::print_stdout)]

mod generate;

use std::path::PathBuf;

use application::{PodcastReport, SpeechPort};
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, init_logging};
use tracing::info;

use crate::generate::GenerateArgs;

/// AI podcast generator
#[derive(Parser)]
#[command(name = "ai-podcast")]
#[command(author, version, about = "Generate a multi-host podcast from an article", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./ai-podcast.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    apikey: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a podcast from an article
    ///
    /// Example: ai-podcast generate --url https://example.com/post --dry
    Generate(GenerateArgs),

    /// List the voices offered by the speech provider
    Voices,

    /// Show the configured host panel
    Hosts,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn print_report(report: &PodcastReport) {
    println!("🎙️  {}", report.title);
    println!("   Lines: {}", report.lines);
    println!(
        "   Estimated length: {:.1} min at speed {:.2}",
        report.estimated_secs / 60.0,
        report.speed
    );
    if let Some(path) = &report.saved_to {
        println!("   📁 Saved to {}", path.display());
    }
    if report.streamed {
        println!("   📡 Stream finished");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config.logging, log_filter_from_verbosity(cli.verbose))?;

    if let Some(key) = cli.apikey {
        config.set_api_key(key);
    }

    match cli.command {
        Commands::Generate(args) => {
            args.apply(&mut config);
            config.validate()?;

            let delivery = args.delivery();
            let service = generate::build_service(&config, &delivery)?;

            info!(url = %args.url, ?delivery, "Generating podcast");
            let report = service.generate(&args.url, &delivery).await?;
            print_report(&report);
        },
        Commands::Voices => {
            let speech = generate::speech_adapter(&config)?;
            println!("🗣️  Available voices:");
            for voice in speech.list_voices().await? {
                match voice.description {
                    Some(description) => {
                        println!("   {:<10} {} - {description}", voice.id, voice.name);
                    },
                    None => println!("   {:<10} {}", voice.id, voice.name),
                }
            }
        },
        Commands::Hosts => {
            println!("👥 Host panel:");
            for host in &config.podcast.hosts {
                println!("   {} ({}, voice {})", host.name, host.gender, host.voice);
                if !host.character.is_empty() {
                    println!("      {}", host.character);
                }
            }
        },
    }

    Ok(())
}
