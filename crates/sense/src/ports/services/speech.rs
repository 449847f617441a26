//! Speech Ports
//!
//! Text-to-speech synthesis and local playback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::errors::DomainError;

/// Audio returned by a synthesizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
    /// Content type reported by the service (e.g. "audio/mpeg")
    pub content_type: Option<String>,
}

impl SynthesizedAudio {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Voice synthesis service
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the configured voice
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, DomainError>;

    /// Voice identity used for synthesis
    fn voice_id(&self) -> &str;
}

/// Local audio output
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play the file at `path`, returning once playback has finished
    async fn play(&self, path: &Path) -> Result<(), DomainError>;
}
