//! Sense CLI - narrates what the camera sees, out loud
//!
//! Reads the frame an external capture process keeps writing, describes it
//! from a clinical observer's point of view and speaks the description.

mod adapters;
mod application;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use adapters::{
    http_client, CommandAudioPlayer, ElevenLabsSynthesizer, FileFrameSource, FsNarrationArchive,
    GuumPersonalityClient, HumeEmotionClient, OpenAiNarrator,
};
use application::{ObserverEvent, ObserverService, ObserverSettings, SpeakerService};
use config::{Credentials, Settings};

#[derive(Parser)]
#[command(name = "sense")]
#[command(about = "Sense - clinical narration of a live camera frame", long_about = None)]
#[command(version)]
struct Cli {
    /// Personality screening reference id of the person being observed
    reference_id: String,

    /// Config file (defaults to ~/.config/sense/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame written by the capture process
    #[arg(short, long)]
    frame: Option<PathBuf>,

    /// Directory where spoken narrations are archived
    #[arg(short, long)]
    narration_dir: Option<PathBuf>,

    /// Seconds to wait between observations
    #[arg(short, long)]
    interval_secs: Option<u64>,

    /// Number of emotions kept from the startup reading
    #[arg(short, long)]
    top_emotions: Option<usize>,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(frame) = &self.frame {
            settings.frame_path = frame.clone();
        }
        if let Some(dir) = &self.narration_dir {
            settings.narration_dir = dir.clone();
        }
        if let Some(secs) = self.interval_secs {
            settings.interval_secs = secs;
        }
        if let Some(k) = self.top_emotions {
            settings.top_emotions = k;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply(&mut settings);

    let credentials = Credentials::from_env();
    for name in credentials.missing() {
        warn!("⚠️  No {} set, calls that need it will fail", name);
    }

    let observer = build_observer(&settings, credentials)?;

    info!("🚀 Starting Sense for {}", cli.reference_id);

    let mut on_event = |event: ObserverEvent<'_>| match event {
        ObserverEvent::Watching { iteration } => {
            println!(
                "{}",
                format!("👀 The psychotherapist is watching... (#{iteration})").cyan()
            );
        }
        ObserverEvent::Narrated { iteration, text } => {
            println!(
                "{}",
                format!("🎙️ The psychotherapist says (#{iteration}):")
                    .green()
                    .bold()
            );
            println!("{}", text);
        }
    };

    observer
        .run(&cli.reference_id, &mut on_event)
        .await
        .context("Observation loop stopped")
}

/// Wire adapters into the observer from immutable settings
fn build_observer(settings: &Settings, credentials: Credentials) -> Result<ObserverService> {
    let client = http_client(settings.request_timeout())?;
    let endpoints = &settings.endpoints;

    let frames = FileFrameSource::new(&settings.frame_path)
        .with_retry_delay(settings.lock_retry_delay())
        .with_max_retries(settings.max_lock_retries);

    let emotions = HumeEmotionClient::new(&endpoints.hume_stream_url, credentials.hume_api_key);

    let personality = GuumPersonalityClient::new(
        client.clone(),
        &endpoints.guum_base_url,
        credentials.guum_api_key,
    );

    let narrator = OpenAiNarrator::new(
        client.clone(),
        &endpoints.openai_base_url,
        credentials.openai_api_key,
    )
    .with_model(&settings.chat_model);

    let synthesizer = ElevenLabsSynthesizer::new(
        client,
        &endpoints.elevenlabs_base_url,
        credentials.elevenlabs_api_key,
        credentials.elevenlabs_voice_id,
    )
    .with_model(&settings.tts_model);

    let player = CommandAudioPlayer::new(&settings.player_command)
        .context("Invalid player_command in config")?;

    let speaker = SpeakerService::new(
        Arc::new(synthesizer),
        Arc::new(FsNarrationArchive::new(&settings.narration_dir)),
        Arc::new(player),
    );

    Ok(ObserverService::new(
        Arc::new(frames),
        Arc::new(emotions),
        Arc::new(personality),
        Arc::new(narrator),
        speaker,
        ObserverSettings::from(settings),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_id_is_required() {
        let err = Cli::try_parse_from(["sense"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::try_parse_from([
            "sense",
            "abc123",
            "--frame",
            "/tmp/cam.jpg",
            "--interval-secs",
            "10",
            "--top-emotions",
            "3",
        ])
        .unwrap();

        let mut settings = Settings::default();
        cli.apply(&mut settings);

        assert_eq!(cli.reference_id, "abc123");
        assert_eq!(settings.frame_path, PathBuf::from("/tmp/cam.jpg"));
        assert_eq!(settings.interval_secs, 10);
        assert_eq!(settings.top_emotions, 3);
        assert_eq!(settings.narration_dir, Settings::default().narration_dir);
    }

    #[test]
    fn test_observer_builds_without_credentials() {
        let settings = Settings {
            player_command: vec!["true".to_string()],
            ..Default::default()
        };
        assert!(build_observer(&settings, Credentials::default()).is_ok());
    }
}
