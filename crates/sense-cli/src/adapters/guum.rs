//! GUUM personality API client
//!
//! `GET /screening/result/{reference_id}` with a bearer token.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use super::api_error;
use sense::{DomainError, PersonalityDirectory, PersonalityProfile};

/// PersonalityDirectory backed by the GUUM REST API
#[derive(Clone)]
pub struct GuumPersonalityClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GuumPersonalityClient {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn result_url(&self, reference_id: &str) -> String {
        format!(
            "{}/screening/result/{}",
            self.base_url,
            urlencoding::encode(reference_id)
        )
    }
}

#[async_trait]
impl PersonalityDirectory for GuumPersonalityClient {
    async fn fetch_profile(&self, reference_id: &str) -> Result<PersonalityProfile, DomainError> {
        let url = self.result_url(reference_id);
        debug!(%url, "Fetching personality profile");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| {
            warn!("Personality request failed: {}", e);
            DomainError::ExternalService(format!("GUUM request failed: {e}"))
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Failed to fetch personality. Status code: {}", status);
            if status == StatusCode::NOT_FOUND {
                return Err(DomainError::not_found("PersonalityProfile", reference_id));
            }
            let body = response.text().await.unwrap_or_default();
            return Err(api_error("GUUM", status, body));
        }

        let profile: PersonalityProfile = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Malformed GUUM profile: {e}")))?;

        info!("✅ Personality profile fetched");
        Ok(profile)
    }
}
