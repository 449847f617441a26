//! Local playback through an external player process
//!
//! Playback blocks: `play` returns only after the player exits, so the next
//! capture never overlaps the current utterance.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use sense::{AudioPlayer, DomainError};

/// AudioPlayer that runs a command with the audio path as its last argument
pub struct CommandAudioPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandAudioPlayer {
    /// Build from a command line such as `["ffplay", "-nodisp", "-autoexit"]`
    pub fn new(command: &[String]) -> Result<Self, DomainError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| DomainError::Configuration("player_command is empty".into()))?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl AudioPlayer for CommandAudioPlayer {
    async fn play(&self, path: &Path) -> Result<(), DomainError> {
        debug!(program = %self.program, path = ?path, "Playing narration");

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| {
                DomainError::ExternalService(format!("Failed to start {}: {e}", self.program))
            })?;

        if !status.success() {
            return Err(DomainError::ExternalService(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        Ok(())
    }
}
