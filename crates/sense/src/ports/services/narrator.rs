//! Vision Narrator Port
//!
//! Abstract interface for vision-and-language completions. The narrator
//! receives the conversation so far plus the current frame and returns a
//! clinical narration of what it sees.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{errors::DomainError, Frame, NarrationPrompt, Turn};

/// Response from a narration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Narration {
    /// Generated text content
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Token usage statistics
    pub usage: TokenUsage,
    /// Finish reason
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// Vision narrator interface
///
/// # Example
///
/// ```rust,ignore
/// use sense::ports::VisionNarrator;
///
/// struct OpenAiNarrator { /* ... */ }
///
/// #[async_trait]
/// impl VisionNarrator for OpenAiNarrator {
///     async fn narrate(&self, prompt: &NarrationPrompt, history: &[&Turn], frame: &Frame)
///         -> Result<Narration, DomainError> {
///         // Call the chat completions endpoint
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait VisionNarrator: Send + Sync {
    /// Narrate `frame`.
    ///
    /// The request is the system instruction, then `history`, then a user
    /// turn carrying `prompt.instruction` and the frame inline.
    async fn narrate(
        &self,
        prompt: &NarrationPrompt,
        history: &[&Turn],
        frame: &Frame,
    ) -> Result<Narration, DomainError>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
