//! Hume streaming face-expression client
//!
//! One websocket session per recognition: connect, send the frame with face
//! identification enabled, take the first prediction message, close.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

use sense::{DomainError, EmotionReading, EmotionRecognizer, EmotionScore, Frame};

type HumeSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// EmotionRecognizer backed by Hume's streaming API
#[derive(Clone)]
pub struct HumeEmotionClient {
    stream_url: String,
    api_key: Option<String>,
    identify_faces: bool,
}

impl HumeEmotionClient {
    pub fn new(stream_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            stream_url: stream_url.into(),
            api_key,
            identify_faces: true,
        }
    }

    async fn connect(&self) -> Result<HumeSocket, DomainError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::missing_key("HUME_API_KEY"))?;

        let url = Url::parse(&self.stream_url)
            .map_err(|e| DomainError::Configuration(format!("Invalid Hume stream URL: {e}")))?;

        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|e| DomainError::Configuration(format!("Invalid Hume request: {e}")))?;
        let header = HeaderValue::from_str(api_key)
            .map_err(|_| DomainError::Configuration("HUME_API_KEY is not a valid header".into()))?;
        request.headers_mut().insert("x-hume-api-key", header);

        let (socket, _response) = connect_async(request)
            .await
            .map_err(|e| DomainError::ExternalService(format!("Hume connection failed: {e}")))?;

        debug!("Hume stream connected");
        Ok(socket)
    }

    async fn exchange(&self, socket: &mut HumeSocket, frame: &Frame) -> Result<String, DomainError> {
        let payload = StreamRequest {
            models: StreamModels {
                face: FaceConfig {
                    identify_faces: self.identify_faces,
                },
            },
            data: frame.to_base64(),
        };
        let body = serde_json::to_string(&payload)
            .map_err(|e| DomainError::Validation(format!("Failed to encode Hume payload: {e}")))?;

        socket
            .send(Message::Text(body))
            .await
            .map_err(|e| DomainError::ExternalService(format!("Hume send failed: {e}")))?;

        while let Some(message) = socket.next().await {
            match message {
                Ok(Message::Text(text)) => return Ok(text),
                Ok(Message::Binary(bytes)) => {
                    return String::from_utf8(bytes).map_err(|_| {
                        DomainError::ExternalService("Hume sent non UTF-8 payload".into())
                    })
                }
                Ok(Message::Close(frame)) => {
                    return Err(DomainError::ExternalService(format!(
                        "Hume closed the stream: {:?}",
                        frame
                    )))
                }
                Ok(_) => continue,
                Err(e) => {
                    return Err(DomainError::ExternalService(format!(
                        "Hume stream error: {e}"
                    )))
                }
            }
        }

        Err(DomainError::ExternalService(
            "Hume stream ended without a result".into(),
        ))
    }
}

#[async_trait]
impl EmotionRecognizer for HumeEmotionClient {
    async fn recognize(&self, frame: &Frame) -> Result<EmotionReading, DomainError> {
        let mut socket = self.connect().await?;

        let result = self.exchange(&mut socket, frame).await;

        // Close on every path; dropping the socket on cancellation tears down the connection.
        if let Err(e) = socket.close(None).await {
            debug!("Hume stream close: {}", e);
        }

        parse_face_response(&result?)
    }

    fn provider_name(&self) -> &str {
        "hume"
    }
}

/// Extract the first face's emotions from a stream response
pub fn parse_face_response(text: &str) -> Result<EmotionReading, DomainError> {
    let response: StreamResponse = serde_json::from_str(text)
        .map_err(|e| DomainError::ExternalService(format!("Malformed Hume response: {e}")))?;

    if let Some(error) = response.error {
        let code = response.code.unwrap_or_default();
        return Err(DomainError::ExternalService(format!(
            "Hume error {code}: {error}"
        )));
    }

    let face = response
        .face
        .ok_or_else(|| DomainError::ExternalService("Hume response has no face model".into()))?;

    let mut predictions = face.predictions.unwrap_or_default();
    if predictions.len() > 1 {
        warn!(
            faces = predictions.len(),
            "Multiple faces detected, using the first"
        );
    }
    if predictions.is_empty() {
        let reason = face.warning.unwrap_or_else(|| "No faces detected".to_string());
        return Err(DomainError::ExternalService(format!("Hume: {reason}")));
    }

    let first = predictions.swap_remove(0);
    let mut reading = EmotionReading::new(first.emotions);
    if let Some(face_id) = first.face_id {
        reading = reading.with_face_id(face_id);
    }
    Ok(reading)
}

// ============================================
// Wire Types
// ============================================

#[derive(Serialize)]
struct StreamRequest {
    models: StreamModels,
    data: String,
}

#[derive(Serialize)]
struct StreamModels {
    face: FaceConfig,
}

#[derive(Serialize)]
struct FaceConfig {
    identify_faces: bool,
}

#[derive(Deserialize)]
struct StreamResponse {
    #[serde(default)]
    face: Option<FaceResult>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Deserialize)]
struct FaceResult {
    #[serde(default)]
    predictions: Option<Vec<FacePrediction>>,
    #[serde(default)]
    warning: Option<String>,
}

#[derive(Deserialize)]
struct FacePrediction {
    #[serde(default)]
    face_id: Option<String>,
    emotions: Vec<EmotionScore>,
}
