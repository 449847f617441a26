//! Observer Application Service (Use Case)
//!
//! Startup takes one emotion reading and one personality lookup and seeds
//! the conversation with them. After that every iteration reads the frame,
//! narrates it, speaks the narration and records it, then sleeps.
//!
//! Emotion and personality failures degrade to fallback text. Narration and
//! speech failures end the run.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use sense::{
    ConversationScript, DomainError, EmotionRecognizer, Frame, FrameSource, Narration,
    NarrationPrompt, PersonalityContext, PersonalityDirectory, VisionNarrator,
    DEFAULT_TOP_EMOTIONS,
};

use super::SpeakerService;
use crate::config::Settings;

/// Where the observer is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverPhase {
    Init,
    EmotionFetched,
    PersonalityResolved,
    Observing,
}

impl std::fmt::Display for ObserverPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObserverPhase::Init => write!(f, "🚀 Init"),
            ObserverPhase::EmotionFetched => write!(f, "🎭 EmotionFetched"),
            ObserverPhase::PersonalityResolved => write!(f, "🧬 PersonalityResolved"),
            ObserverPhase::Observing => write!(f, "👀 Observing"),
        }
    }
}

/// Loop tuning
#[derive(Debug, Clone)]
pub struct ObserverSettings {
    pub top_emotions: usize,
    pub interval: Duration,
    pub max_history_turns: Option<usize>,
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            top_emotions: DEFAULT_TOP_EMOTIONS,
            interval: Duration::from_secs(500),
            max_history_turns: None,
        }
    }
}

impl From<&Settings> for ObserverSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            top_emotions: settings.top_emotions,
            interval: settings.interval(),
            max_history_turns: settings.max_history_turns,
        }
    }
}

/// Progress reported to the caller while observing
#[derive(Debug)]
pub enum ObserverEvent<'a> {
    Watching { iteration: usize },
    Narrated { iteration: usize, text: &'a str },
}

/// Result of one completed iteration
#[derive(Debug)]
pub struct Observation {
    pub iteration: usize,
    pub narration: Narration,
    pub audio_path: PathBuf,
}

/// Application service driving the observe → narrate → speak loop
pub struct ObserverService {
    frames: Arc<dyn FrameSource>,
    emotions: Arc<dyn EmotionRecognizer>,
    personality: Arc<dyn PersonalityDirectory>,
    narrator: Arc<dyn VisionNarrator>,
    speaker: SpeakerService,
    prompt: NarrationPrompt,
    settings: ObserverSettings,
}

impl ObserverService {
    pub fn new(
        frames: Arc<dyn FrameSource>,
        emotions: Arc<dyn EmotionRecognizer>,
        personality: Arc<dyn PersonalityDirectory>,
        narrator: Arc<dyn VisionNarrator>,
        speaker: SpeakerService,
        settings: ObserverSettings,
    ) -> Self {
        Self {
            frames,
            emotions,
            personality,
            narrator,
            speaker,
            prompt: NarrationPrompt::default(),
            settings,
        }
    }

    /// Top-`k` emotion names for `frame`, or `None` when unavailable
    pub async fn extract_top_emotions(&self, frame: &Frame, k: usize) -> Option<String> {
        match self.emotions.recognize(frame).await {
            Ok(reading) => {
                let phrase = reading.top_phrase(k);
                if phrase.is_none() {
                    warn!("⚠️  {} returned no emotions", self.emotions.provider_name());
                }
                phrase
            }
            Err(e) => {
                warn!(
                    "⚠️  Emotion extraction via {} failed: {}",
                    self.emotions.provider_name(),
                    e
                );
                None
            }
        }
    }

    /// Look up the personality profile, falling back to "unidentified"
    pub async fn resolve_personality(&self, reference_id: &str) -> PersonalityContext {
        match self.personality.fetch_profile(reference_id).await {
            Ok(profile) => PersonalityContext::Identified(profile),
            Err(e) => {
                warn!("⚠️  Personality not identified for {}: {}", reference_id, e);
                PersonalityContext::Unidentified
            }
        }
    }

    /// Take the one-off startup readings and seed the conversation
    pub async fn bootstrap(&self, reference_id: &str) -> ConversationScript {
        info!("{} reference_id={}", ObserverPhase::Init, reference_id);

        let emotions = match self.frames.read_frame().await {
            Ok(frame) => {
                self.extract_top_emotions(&frame, self.settings.top_emotions)
                    .await
            }
            Err(e) => {
                warn!("⚠️  Could not read frame for emotion reading: {}", e);
                None
            }
        };
        info!(
            "{} {}",
            ObserverPhase::EmotionFetched,
            emotions.as_deref().unwrap_or(sense::EMOTION_UNAVAILABLE)
        );

        let context = self.resolve_personality(reference_id).await;
        info!(
            "{} identified={}",
            ObserverPhase::PersonalityResolved,
            context.is_identified()
        );

        ConversationScript::seeded(context.seed_content(emotions.as_deref()))
    }

    /// One capture → narrate → speak → record iteration
    pub async fn observe_once(
        &self,
        script: &mut ConversationScript,
        on_event: &mut dyn FnMut(ObserverEvent<'_>),
    ) -> Result<Observation, DomainError> {
        let iteration = script.observations() + 1;

        let frame = self.frames.read_frame().await?;
        on_event(ObserverEvent::Watching { iteration });

        let history = script.window(self.settings.max_history_turns);
        let narration = self.narrator.narrate(&self.prompt, &history, &frame).await?;
        info!(
            "📝 Narration #{} from {} ({} tokens)",
            iteration, narration.model, narration.usage.total_tokens
        );
        on_event(ObserverEvent::Narrated {
            iteration,
            text: &narration.content,
        });

        let audio_path = self.speaker.speak(&narration.content).await?;

        script.record_observation(narration.content.clone());

        Ok(Observation {
            iteration,
            narration,
            audio_path,
        })
    }

    /// Bootstrap, then observe forever. Returns only on a fatal error.
    pub async fn run(
        &self,
        reference_id: &str,
        on_event: &mut dyn FnMut(ObserverEvent<'_>),
    ) -> Result<(), DomainError> {
        let mut script = self.bootstrap(reference_id).await;
        info!(
            "{} every {:?} with {}",
            ObserverPhase::Observing,
            self.settings.interval,
            self.narrator.model_id()
        );

        loop {
            let observation = self.observe_once(&mut script, on_event).await?;
            info!(
                "✅ Observation #{} archived at {:?} ({} chars, {} turns)",
                observation.iteration,
                observation.audio_path,
                observation.narration.content.len(),
                script.len()
            );

            tokio::time::sleep(self.settings.interval).await;
        }
    }
}
