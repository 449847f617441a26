//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Frame: the current camera still
//! - Emotion: ranked facial-emotion reading
//! - Personality: profile and the narrative preamble built from it
//! - Conversation: the growing script sent to the narrator
//! - Prompt: fixed narration instruction and sampling options

mod conversation;
mod emotion;
mod frame;
mod personality;
mod prompt;

pub use conversation::*;
pub use emotion::*;
pub use frame::*;
pub use personality::*;
pub use prompt::*;
