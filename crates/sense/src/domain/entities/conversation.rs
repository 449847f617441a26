//! Conversation - the script the narrator sees
//!
//! Append-only: a seed turn, then one image-analysis request and one
//! narration per observation. Nothing is ever pruned from storage; a request
//! window only limits what is sent.

use serde::{Deserialize, Serialize};

use crate::domain::entities::prompt::IMAGE_INSTRUCTION;
use crate::domain::value_objects::TurnRole;

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Growing conversation script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationScript {
    turns: Vec<Turn>,
}

impl ConversationScript {
    /// Start a script with the personality/emotion preamble as its only turn
    pub fn seeded(preamble: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::user(preamble)],
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn seed(&self) -> Option<&Turn> {
        self.turns.first()
    }

    /// Number of completed observations
    pub fn observations(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.role == TurnRole::Assistant)
            .count()
    }

    /// Record one observation: the image-analysis request and its narration
    pub fn record_observation(&mut self, narration: impl Into<String>) {
        self.turns.push(Turn::user(IMAGE_INSTRUCTION));
        self.turns.push(Turn::assistant(narration));
    }

    /// Turns to send with the next request.
    ///
    /// `None` sends the full history. `Some(n)` sends the seed plus the last
    /// `n` turns after it.
    pub fn window(&self, max_history_turns: Option<usize>) -> Vec<&Turn> {
        let Some(max) = max_history_turns else {
            return self.turns.iter().collect();
        };
        let Some((seed, rest)) = self.turns.split_first() else {
            return Vec::new();
        };

        let skip = rest.len().saturating_sub(max);
        std::iter::once(seed).chain(rest[skip..].iter()).collect()
    }
}
