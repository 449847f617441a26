//! Personality - GUUM profile and the narrative preamble built from it
//!
//! The profile is fetched once per run. Rendering blends it with the emotion
//! phrase captured at startup; the result seeds the conversation.

use serde::{Deserialize, Serialize};

/// Rendered in place of the emotion phrase when no reading was obtained
pub const EMOTION_UNAVAILABLE: &str = "unavailable";

/// Closes the personality block the system instruction refers to
pub const CONTEXT_DELIMITER: &str = "---";

/// Precomputed personality profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityProfile {
    pub role_name: String,
    pub role_description: String,
    #[serde(rename = "typeName1")]
    pub type_name1: String,
    #[serde(rename = "typeName2")]
    pub type_name2: String,
    pub category: String,
    pub focus: String,
    pub attention: String,
    pub engagement: String,
}

/// Outcome of the personality lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonalityContext {
    Identified(PersonalityProfile),
    Unidentified,
}

impl PersonalityContext {
    pub fn is_identified(&self) -> bool {
        matches!(self, PersonalityContext::Identified(_))
    }

    /// Render the preamble; it ends with the current-emotions line.
    pub fn render(&self, emotions: Option<&str>) -> String {
        let emotions = emotions.unwrap_or(EMOTION_UNAVAILABLE);
        match self {
            PersonalityContext::Identified(p) => format!(
                "---PERSONALITY: \n\
                 Based on the GUUM personality model, the patient falls into \
                 the {} or {} category. This designation signifies a personality \
                 blend of {} and {}. Notably, this individual demonstrates strengths \
                 in {}. The patient ability to focus on tasks is quite {}, and \
                 the patient has {} ability to maintain attention during conversations \
                 or group interactions. Additionally, the engagement levels during \
                 activities appear to be {}. Understanding these aspects of their \
                 personality can help tailor the therapeutic approach to better \
                 support the patient needs.\n\
                 \n\
                 CURRENT EMOTIONS: \n\
                 {}.",
                p.category,
                p.role_name,
                p.type_name1,
                p.type_name2,
                p.role_description,
                p.focus,
                p.attention,
                p.engagement,
                emotions
            ),
            PersonalityContext::Unidentified => format!(
                "---PERSONALITY: \n\
                 the patient personality has not been identified.\n\
                 \n\
                 CURRENT EMOTIONS:\n\
                 {}.",
                emotions
            ),
        }
    }

    /// Content of the seed turn: the rendered preamble plus its closing delimiter
    pub fn seed_content(&self, emotions: Option<&str>) -> String {
        format!("{}\n{}", self.render(emotions), CONTEXT_DELIMITER)
    }
}

impl From<Option<PersonalityProfile>> for PersonalityContext {
    fn from(profile: Option<PersonalityProfile>) -> Self {
        match profile {
            Some(p) => PersonalityContext::Identified(p),
            None => PersonalityContext::Unidentified,
        }
    }
}
