//! Emotion Recognition Port
//!
//! Abstract interface for facial-emotion recognition of a single frame.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, EmotionReading, Frame};

/// Service interface for facial-emotion recognition
#[async_trait]
pub trait EmotionRecognizer: Send + Sync {
    /// Recognize emotions on the first face detected in `frame`.
    ///
    /// Only the first face is considered; frames with several subjects
    /// report the one the service lists first.
    async fn recognize(&self, frame: &Frame) -> Result<EmotionReading, DomainError>;

    /// Get the provider name (e.g., "hume")
    fn provider_name(&self) -> &str;
}
