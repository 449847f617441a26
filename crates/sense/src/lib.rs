//! Sense Domain Library
//!
//! Core domain types and interfaces for the Sense narration loop: a camera
//! frame is read, narrated by a vision model in the light of the subject's
//! personality and current emotions, and spoken aloud.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure entities and logic
//!   - `entities/`: Frame, EmotionReading, PersonalityProfile,
//!     ConversationScript, NarrationPrompt
//!   - `value_objects/`: Immutable value types (TurnRole)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Frame source and narration archive
//!   - `services/`: Emotion, personality, narration and speech services
//!
//! # Usage
//!
//! ```rust,ignore
//! use sense::domain::{ConversationScript, PersonalityContext};
//! use sense::ports::{EmotionRecognizer, VisionNarrator};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    CompletionOptions, ConversationScript, DomainError, EmotionReading, EmotionScore, Frame,
    NarrationPrompt, PersonalityContext, PersonalityProfile, Turn, TurnRole,
    CLINICAL_OBSERVER_INSTRUCTION, CONTEXT_DELIMITER, DEFAULT_TOP_EMOTIONS, EMOTION_UNAVAILABLE,
    IMAGE_INSTRUCTION,
};
pub use ports::{
    // Services
    AudioPlayer,
    EmotionRecognizer,
    // Repositories
    FrameSource,
    Narration,
    NarrationArchive,
    PersonalityDirectory,
    SpeechSynthesizer,
    SynthesizedAudio,
    TokenUsage,
    VisionNarrator,
};
