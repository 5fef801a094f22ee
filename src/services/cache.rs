use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::models::{Candidate, Coordinates, PlaceDetails, ReviewText};
use crate::services::provider::{PlaceSearchProvider, ProviderError};

/// In-memory cache in front of a place provider
///
/// Reviews and details are cached per place id. Searches always go to the
/// inner provider. Failures are never cached.
pub struct CachedPlaceProvider {
    inner: Arc<dyn PlaceSearchProvider>,
    reviews: Cache<String, Arc<Vec<ReviewText>>>,
    details: Cache<String, Arc<PlaceDetails>>,
}

impl CachedPlaceProvider {
    pub fn new(inner: Arc<dyn PlaceSearchProvider>, capacity: u64, ttl_secs: u64) -> Self {
        let ttl = Duration::from_secs(ttl_secs);

        Self {
            inner,
            reviews: moka::future::CacheBuilder::new(capacity).time_to_live(ttl).build(),
            details: moka::future::CacheBuilder::new(capacity).time_to_live(ttl).build(),
        }
    }
}

#[async_trait]
impl PlaceSearchProvider for CachedPlaceProvider {
    async fn search(
        &self,
        center: Coordinates,
        radius_meters: u32,
        term: Option<&str>,
    ) -> Result<Vec<Candidate>, ProviderError> {
        self.inner.search(center, radius_meters, term).await
    }

    async fn get_reviews(&self, place_id: &str) -> Result<Vec<ReviewText>, ProviderError> {
        if let Some(hit) = self.reviews.get(place_id).await {
            tracing::trace!("Review cache hit: {}", place_id);
            return Ok(hit.as_ref().clone());
        }

        let reviews = self.inner.get_reviews(place_id).await?;
        self.reviews
            .insert(place_id.to_string(), Arc::new(reviews.clone()))
            .await;
        Ok(reviews)
    }

    async fn get_details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError> {
        if let Some(hit) = self.details.get(place_id).await {
            tracing::trace!("Details cache hit: {}", place_id);
            return Ok(hit.as_ref().clone());
        }

        let details = self.inner.get_details(place_id).await?;
        self.details
            .insert(place_id.to_string(), Arc::new(details.clone()))
            .await;
        Ok(details)
    }
}
