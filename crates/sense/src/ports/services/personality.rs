//! Personality Directory Port

use async_trait::async_trait;

use crate::domain::{errors::DomainError, PersonalityProfile};

/// Lookup of precomputed personality profiles
#[async_trait]
pub trait PersonalityDirectory: Send + Sync {
    /// Fetch the profile screened under `reference_id`.
    ///
    /// Any non-success response is an error; callers decide on a fallback.
    async fn fetch_profile(&self, reference_id: &str) -> Result<PersonalityProfile, DomainError>;
}
