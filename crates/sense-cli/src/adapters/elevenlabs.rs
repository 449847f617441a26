//! ElevenLabs text-to-speech

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::api_error;
use sense::{DomainError, SpeechSynthesizer, SynthesizedAudio};

const DEFAULT_MODEL: &str = "eleven_monolingual_v1";

/// SpeechSynthesizer backed by the ElevenLabs API
#[derive(Clone)]
pub struct ElevenLabsSynthesizer {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    voice_id: String,
    model: String,
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

impl ElevenLabsSynthesizer {
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: Option<String>,
        voice_id: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            voice_id: voice_id.unwrap_or_default(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Overrides the synthesis model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, DomainError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| DomainError::missing_key("ELEVENLABS_API_KEY"))?;
        if self.voice_id.is_empty() {
            return Err(DomainError::missing_key("ELEVENLABS_VOICE_ID"));
        }

        let url = format!(
            "{}/text-to-speech/{}",
            self.base_url,
            urlencoding::encode(&self.voice_id)
        );
        debug!(voice = %self.voice_id, chars = text.len(), "Synthesizing narration");

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", api_key)
            .header("Accept", "audio/mpeg")
            .json(&SynthesisRequest {
                text,
                model_id: &self.model,
            })
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("ElevenLabs request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(api_error("ElevenLabs", status, body));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::ExternalService(format!("ElevenLabs read failed: {e}")))?;

        if bytes.is_empty() {
            return Err(DomainError::ExternalService(
                "ElevenLabs returned no audio".into(),
            ));
        }

        let mut audio = SynthesizedAudio::new(bytes.to_vec());
        if let Some(content_type) = content_type {
            audio = audio.with_content_type(content_type);
        }
        Ok(audio)
    }

    fn voice_id(&self) -> &str {
        &self.voice_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_synthesize() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/text-to-speech/voice-1")
            .match_header("xi-api-key", "xi-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "text": "The patient appears relaxed.",
                "model_id": "eleven_monolingual_v1"
            })))
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body([0x49, 0x44, 0x33, 0x04])
            .create_async()
            .await;

        let synth = ElevenLabsSynthesizer::new(
            Client::new(),
            &server.url(),
            Some("xi-test".to_string()),
            Some("voice-1".to_string()),
        );
        let audio = synth.synthesize("The patient appears relaxed.").await.unwrap();

        mock.assert_async().await;
        assert_eq!(audio.bytes, vec![0x49, 0x44, 0x33, 0x04]);
        assert_eq!(audio.content_type.as_deref(), Some("audio/mpeg"));
    }

    #[tokio::test]
    async fn test_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/text-to-speech/voice-1")
            .with_status(401)
            .with_body(r#"{"detail":{"status":"invalid_api_key","message":"Invalid API key"}}"#)
            .create_async()
            .await;

        let synth = ElevenLabsSynthesizer::new(
            Client::new(),
            &server.url(),
            Some("bad".to_string()),
            Some("voice-1".to_string()),
        );
        let err = synth.synthesize("hello").await.unwrap_err();
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_missing_voice() {
        let synth = ElevenLabsSynthesizer::new(
            Client::new(),
            "http://elevenlabs.test",
            Some("xi-test".to_string()),
            None,
        );
        let err = synth.synthesize("hello").await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
    }
}
