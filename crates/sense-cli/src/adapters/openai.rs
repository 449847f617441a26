//! OpenAI vision narrator
//!
//! Chat completions with an inline image. The system instruction goes first,
//! then the conversation so far, then the frame.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::api_error;
use sense::{DomainError, Frame, Narration, NarrationPrompt, TokenUsage, Turn, VisionNarrator};

/// VisionNarrator backed by the OpenAI chat completions API
#[derive(Clone)]
pub struct OpenAiNarrator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiNarrator {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: "gpt-4o".to_string(),
        }
    }

    /// Overrides the chat model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_request(
        &self,
        prompt: &NarrationPrompt,
        history: &[&Turn],
        frame: &Frame,
    ) -> ChatRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: MessageContent::Text(prompt.system.clone()),
        });
        messages.extend(history.iter().map(|turn| ChatMessage {
            role: turn.role.to_string(),
            content: MessageContent::Text(turn.content.clone()),
        }));
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: prompt.instruction.clone(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: frame.data_uri(),
                    },
                },
            ]),
        });

        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: prompt.options.temperature,
            max_tokens: prompt.options.max_tokens,
        }
    }
}

#[async_trait]
impl VisionNarrator for OpenAiNarrator {
    async fn narrate(
        &self,
        prompt: &NarrationPrompt,
        history: &[&Turn],
        frame: &Frame,
    ) -> Result<Narration, DomainError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| DomainError::missing_key("OPENAI_API_KEY"))?;

        let request = self.build_request(prompt, history, frame);
        debug!(
            model = %self.model,
            turns = history.len(),
            frame_bytes = frame.len(),
            "Requesting narration"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("OpenAI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(api_error("OpenAI", status, body));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Malformed OpenAI response: {e}")))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::ExternalService("OpenAI returned no choices".into()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| DomainError::ExternalService("OpenAI returned an empty message".into()))?;

        Ok(Narration {
            content,
            model: completion.model.unwrap_or_else(|| self.model.clone()),
            usage: completion.usage.unwrap_or_default(),
            finish_reason: choice.finish_reason,
        })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ============================================
// Request/Response Types
// ============================================

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sense::ConversationScript;

    fn narrator(base_url: &str) -> OpenAiNarrator {
        OpenAiNarrator::new(Client::new(), base_url, Some("sk-test".to_string()))
            .with_model("gpt-4o-mini")
    }

    #[test]
    fn test_request_layout() {
        let mut script = ConversationScript::seeded("---PERSONALITY: \n...");
        script.record_observation("Looks calm.");
        let history = script.window(None);
        let frame = Frame::new(b"jpeg".to_vec());

        let request = narrator("http://openai.test").build_request(
            &NarrationPrompt::default(),
            &history,
            &frame,
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["max_tokens"], 500);

        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[3]["role"], "assistant");
        assert_eq!(messages[3]["content"], "Looks calm.");

        let last = &messages[4];
        assert_eq!(last["role"], "user");
        assert_eq!(last["content"][0]["type"], "text");
        assert_eq!(last["content"][0]["text"], "Describe this image");
        assert_eq!(last["content"][1]["type"], "image_url");
        assert_eq!(
            last["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,anBlZw=="
        );
    }

    #[tokio::test]
    async fn test_narrate_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "id": "chatcmpl-1",
                    "model": "gpt-4o-mini-2024-07-18",
                    "choices": [
                        {"index": 0, "message": {"role": "assistant", "content": "The patient appears relaxed."}, "finish_reason": "stop"},
                        {"index": 1, "message": {"role": "assistant", "content": "ignored"}, "finish_reason": "stop"}
                    ],
                    "usage": {"prompt_tokens": 900, "completion_tokens": 12, "total_tokens": 912}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let script = ConversationScript::seeded("seed");
        let narration = narrator(&server.url())
            .narrate(
                &NarrationPrompt::default(),
                &script.window(None),
                &Frame::new(vec![0xFF, 0xD8]),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(narration.content, "The patient appears relaxed.");
        assert_eq!(narration.usage.total_tokens, 912);
        assert_eq!(narration.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_api_error_propagates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
            .create_async()
            .await;

        let script = ConversationScript::seeded("seed");
        let err = narrator(&server.url())
            .narrate(
                &NarrationPrompt::default(),
                &script.window(None),
                &Frame::new(vec![1]),
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Rate limit reached"));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let narrator = OpenAiNarrator::new(Client::new(), "http://openai.test", None);
        let script = ConversationScript::seeded("seed");
        let err = narrator
            .narrate(
                &NarrationPrompt::default(),
                &script.window(None),
                &Frame::new(vec![1]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
    }
}
