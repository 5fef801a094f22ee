use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::models::{Candidate, Coordinates, PlaceDetails, ReviewText};
use crate::services::provider::{PlaceSearchProvider, ProviderError};

pub const YELP_API_BASE: &str = "https://api.yelp.com/v3";

/// Yelp Fusion API client
///
/// Handles the three lookups the ranking pipeline needs:
/// - Searching businesses around a point
/// - Fetching a business's reviews
/// - Fetching a business's full details and categories
pub struct YelpClient {
    base_url: String,
    api_key: String,
    search_limit: u32,
    review_limit: u32,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    businesses: Vec<YelpBusiness>,
}

#[derive(Debug, Deserialize)]
struct ReviewsEnvelope {
    #[serde(default)]
    reviews: Vec<YelpReview>,
}

#[derive(Debug, Deserialize)]
struct YelpBusiness {
    id: String,
    name: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    review_count: Option<u32>,
    coordinates: YelpCoordinates,
    #[serde(default)]
    location: YelpLocation,
    #[serde(default)]
    categories: Vec<YelpCategory>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YelpCoordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Default, Deserialize)]
struct YelpLocation {
    #[serde(default)]
    address1: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YelpCategory {
    alias: String,
}

#[derive(Debug, Deserialize)]
struct YelpReview {
    id: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    rating: Option<u8>,
    #[serde(default)]
    time_created: Option<String>,
}

impl YelpBusiness {
    fn category_aliases(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.alias.clone()).collect()
    }

    fn into_candidate(self) -> Candidate {
        Candidate {
            categories: self.category_aliases(),
            id: self.id,
            name: self.name,
            coordinates: Coordinates::new(self.coordinates.latitude, self.coordinates.longitude),
            rating: self.rating,
            review_count: self.review_count,
            address: self.location.address1.unwrap_or_default(),
            url: self.url,
        }
    }

    fn into_details(self) -> PlaceDetails {
        PlaceDetails {
            categories: self.category_aliases(),
            id: self.id,
            name: self.name,
            address: self.location.address1.unwrap_or_default(),
            city: self.location.city,
            state: self.location.state,
            country: self.location.country,
            lat: self.coordinates.latitude,
            lng: self.coordinates.longitude,
            rating: self.rating,
            review_count: self.review_count,
            phone: self.phone,
            website: Some(self.url).filter(|u| !u.is_empty()),
            price: self.price,
        }
    }
}

impl From<YelpReview> for ReviewText {
    fn from(review: YelpReview) -> Self {
        // Yelp reports local wall-clock time without an offset
        let published_at = review
            .time_created
            .as_deref()
            .and_then(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S").ok())
            .map(|t| Utc.from_utc_datetime(&t));

        ReviewText {
            id: review.id,
            text: review.text,
            rating: review.rating,
            published_at,
        }
    }
}

impl YelpClient {
    /// Create a new Yelp client
    pub fn new(
        base_url: String,
        api_key: String,
        search_limit: u32,
        review_limit: u32,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            search_limit,
            review_limit,
            client,
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Yelp request: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProviderError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound(path.to_string())),
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Yelp request {} failed: {} - {}", path, status, body);
                Err(ProviderError::ApiError(format!("{} returned {}", path, status)))
            }
        }
    }
}

#[async_trait]
impl PlaceSearchProvider for YelpClient {
    async fn search(
        &self,
        center: Coordinates,
        radius_meters: u32,
        term: Option<&str>,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let mut query = vec![
            ("latitude", center.lat.to_string()),
            ("longitude", center.lng.to_string()),
            ("radius", radius_meters.to_string()),
            ("limit", self.search_limit.to_string()),
            ("sort_by", "rating".to_string()),
        ];
        if let Some(term) = term {
            query.push(("term", term.to_string()));
        }

        let envelope: SearchEnvelope = self
            .get("/businesses/search", &query)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse search: {}", e)))?;

        tracing::debug!("Yelp search returned {} businesses", envelope.businesses.len());

        Ok(envelope
            .businesses
            .into_iter()
            .map(YelpBusiness::into_candidate)
            .collect())
    }

    async fn get_reviews(&self, place_id: &str) -> Result<Vec<ReviewText>, ProviderError> {
        let path = format!("/businesses/{}/reviews", urlencoding::encode(place_id));
        let query = [("limit", self.review_limit.to_string())];

        let envelope: ReviewsEnvelope = self
            .get(&path, &query)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse reviews: {}", e)))?;

        Ok(envelope.reviews.into_iter().map(ReviewText::from).collect())
    }

    async fn get_details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError> {
        let path = format!("/businesses/{}", urlencoding::encode(place_id));

        let business: YelpBusiness = self
            .get(&path, &[])
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse details: {}", e)))?;

        Ok(business.into_details())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const BUSINESS_JSON: &str = r#"{
        "id": "pizza-1",
        "name": "Gluten-Free Pizza Palace",
        "rating": 4.5,
        "review_count": 127,
        "coordinates": {"latitude": 33.759, "longitude": -84.378},
        "location": {"address1": "123 Gluten Free St", "city": "Atlanta", "state": "GA", "country": "US"},
        "categories": [{"alias": "pizza", "title": "Pizza"}],
        "url": "https://www.yelp.com/biz/pizza-1",
        "price": "$$"
    }"#;

    fn client(base_url: String) -> YelpClient {
        YelpClient::new(base_url, "test_key".to_string(), 50, 20, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = client("https://api.yelp.test/v3/".to_string());
        assert_eq!(client.base_url, "https://api.yelp.test/v3");
        assert_eq!(client.api_key, "test_key");
    }

    #[tokio::test]
    async fn test_search_parses_businesses() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/businesses/search")
            .match_header("authorization", "Bearer test_key")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("radius".into(), "16093".into()),
                Matcher::UrlEncoded("term".into(), "pizza".into()),
                Matcher::UrlEncoded("sort_by".into(), "rating".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"businesses": [{}], "total": 1}}"#, BUSINESS_JSON))
            .create_async()
            .await;

        let candidates = client(server.url())
            .search(Coordinates::new(33.749, -84.388), 16093, Some("pizza"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "pizza-1");
        assert_eq!(candidates[0].categories, vec!["pizza"]);
        assert_eq!(candidates[0].address, "123 Gluten Free St");
        assert_eq!(candidates[0].review_count, Some(127));
    }

    #[tokio::test]
    async fn test_reviews_parse_timestamps() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/businesses/pizza-1/reviews")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"reviews": [
                    {"id": "a", "rating": 5, "text": "Dedicated fryer!", "time_created": "2023-12-01 12:00:00"},
                    {"id": "b", "text": "ok", "time_created": "yesterday"}
                ]}"#,
            )
            .create_async()
            .await;

        let reviews = client(server.url()).get_reviews("pizza-1").await.unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].rating, Some(5));
        assert!(reviews[0].published_at.is_some());
        assert!(reviews[1].published_at.is_none());
    }

    #[tokio::test]
    async fn test_details_and_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/businesses/pizza-1")
            .with_status(200)
            .with_body(BUSINESS_JSON)
            .create_async()
            .await;
        server
            .mock("GET", "/businesses/missing")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/businesses/broken")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = client(server.url());
        let details = client.get_details("pizza-1").await.unwrap();
        assert_eq!(details.city.as_deref(), Some("Atlanta"));
        assert_eq!(details.website.as_deref(), Some("https://www.yelp.com/biz/pizza-1"));

        assert!(matches!(
            client.get_details("missing").await,
            Err(ProviderError::NotFound(_))
        ));
        assert!(matches!(
            client.get_details("broken").await,
            Err(ProviderError::ApiError(_))
        ));
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/businesses/search")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let result = client(server.url())
            .search(Coordinates::new(33.749, -84.388), 1000, None)
            .await;
        assert!(matches!(result, Err(ProviderError::Unauthorized)));
    }
}
