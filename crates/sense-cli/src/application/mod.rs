//! Application Layer - Use case orchestration

mod observer;
mod speaker;

pub use observer::{ObserverEvent, ObserverService, ObserverSettings};
pub use speaker::SpeakerService;
