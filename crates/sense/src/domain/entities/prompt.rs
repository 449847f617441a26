//! Prompt - fixed narration instruction and sampling options
//!
//! Pure domain entity without infrastructure dependencies.

/// Text of the user turn that carries each frame
pub const IMAGE_INSTRUCTION: &str = "Describe this image";

/// System instruction framing the model as a clinical observer
pub const CLINICAL_OBSERVER_INSTRUCTION: &str = "You are a licensed professional psychotherapist. \
Narrate the picture of the patient who you are counseling to assess \
any indications of clinical behavioral disorders or mental health issues. \
Aim to retain the most important points, providing a coherent and \
readable summary that could help the patient to focus on the \
main points. Please avoid unnecessary details or tangential points. \
Please consider the overall emotion conveyed by the picture, and \
indicate whether the emotion is generally positive, negative, or \
neutral, and provide brief explanations for your analysis \
where possible. \
Please also use the patient \"personality\" and \"current emotions\" \
information provided below, delimited by triple dashes, \
in your assessment.";

/// Options for the narration completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature; 0 is fully deterministic
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.0,
        }
    }
}

/// Everything fixed about a narration request
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationPrompt {
    pub system: String,
    pub instruction: String,
    pub options: CompletionOptions,
}

impl Default for NarrationPrompt {
    fn default() -> Self {
        Self {
            system: CLINICAL_OBSERVER_INSTRUCTION.to_string(),
            instruction: IMAGE_INSTRUCTION.to_string(),
            options: CompletionOptions::default(),
        }
    }
}
