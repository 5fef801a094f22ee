use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Candidate, Coordinates, PlaceDetails, ReviewText};

/// Errors raised by external collaborators (place search, geocoding, language model)
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of candidate places, their reviews and full details
#[async_trait]
pub trait PlaceSearchProvider: Send + Sync {
    /// Places around `center`; `term` narrows the search when given
    async fn search(
        &self,
        center: Coordinates,
        radius_meters: u32,
        term: Option<&str>,
    ) -> Result<Vec<Candidate>, ProviderError>;

    async fn get_reviews(&self, place_id: &str) -> Result<Vec<ReviewText>, ProviderError>;

    async fn get_details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError>;
}

/// Resolves free-text addresses to coordinates
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// `Ok(None)` when the address resolves to nothing
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, ProviderError>;
}

/// Single-shot text classification by a language model
#[async_trait]
pub trait LanguageModelProvider: Send + Sync {
    /// Raw label produced for `text` under `instruction`
    async fn classify(&self, instruction: &str, text: &str) -> Result<String, ProviderError>;
}
