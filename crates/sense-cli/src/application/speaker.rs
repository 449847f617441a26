//! Speaker Application Service
//!
//! Synthesize → archive → play, in that order.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use sense::{AudioPlayer, DomainError, NarrationArchive, SpeechSynthesizer};

/// Speaks narration text aloud and keeps a copy of every utterance
pub struct SpeakerService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    archive: Arc<dyn NarrationArchive>,
    player: Arc<dyn AudioPlayer>,
}

impl SpeakerService {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        archive: Arc<dyn NarrationArchive>,
        player: Arc<dyn AudioPlayer>,
    ) -> Self {
        Self {
            synthesizer,
            archive,
            player,
        }
    }

    /// Speak `text`, returning where the audio was archived
    pub async fn speak(&self, text: &str) -> Result<PathBuf, DomainError> {
        let audio = self.synthesizer.synthesize(text).await?;
        let path = self.archive.store(&audio).await?;

        info!(
            "🔊 Speaking with voice {} ({} bytes, {:?})",
            self.synthesizer.voice_id(),
            audio.bytes.len(),
            path
        );

        self.player.play(&path).await?;
        Ok(path)
    }
}
