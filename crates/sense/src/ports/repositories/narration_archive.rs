//! Narration Archive Port

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::errors::DomainError;
use crate::ports::services::SynthesizedAudio;

/// Append-only store of synthesized utterances
#[async_trait]
pub trait NarrationArchive: Send + Sync {
    /// Persist one utterance under a fresh unique name and return its path
    async fn store(&self, audio: &SynthesizedAudio) -> Result<PathBuf, DomainError>;
}
