//! Infrastructure Adapters
//!
//! Implementations of the domain ports for external systems.

pub mod archive;
pub mod elevenlabs;
pub mod frame_file;
pub mod guum;
pub mod hume;
pub mod openai;
pub mod player;

// Re-exports
pub use archive::FsNarrationArchive;
pub use elevenlabs::ElevenLabsSynthesizer;
pub use frame_file::FileFrameSource;
pub use guum::GuumPersonalityClient;
pub use hume::HumeEmotionClient;
pub use openai::OpenAiNarrator;
pub use player::CommandAudioPlayer;

use reqwest::{Client, StatusCode};
use std::time::Duration;

use sense::DomainError;

const USER_AGENT: &str = concat!("sense/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by the REST adapters
pub fn http_client(timeout: Option<Duration>) -> Result<Client, DomainError> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| DomainError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Turn a non-success response into an error, preferring the API's own message
pub(crate) fn api_error(service: &str, status: StatusCode, body: String) -> DomainError {
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            let error = json.get("error").or_else(|| json.get("detail"))?;
            error
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| error.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or(body);

    DomainError::ExternalService(format!("{service} API error ({status}): {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_prefers_json_message() {
        let err = api_error(
            "OpenAI",
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Incorrect API key provided"}}"#.to_string(),
        );
        let text = err.to_string();
        assert!(text.contains("OpenAI API error (401 Unauthorized)"));
        assert!(text.ends_with("Incorrect API key provided"));
    }

    #[test]
    fn test_api_error_falls_back_to_body() {
        let err = api_error("GUUM", StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert!(err.to_string().ends_with("upstream down"));
    }
}
