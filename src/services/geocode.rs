use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::models::Coordinates;
use crate::services::provider::{GeocodingProvider, ProviderError};

pub const OPENCAGE_API_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

/// OpenCage forward and reverse geocoder
pub struct OpenCageGeocoder {
    base_url: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GeocodeEnvelope {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    #[serde(default)]
    formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

impl OpenCageGeocoder {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    async fn first_result(&self, query: &str) -> Result<Option<GeocodeResult>, ProviderError> {
        tracing::debug!("Geocoding '{}'", query);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(ProviderError::Unauthorized),
            status => {
                return Err(ProviderError::ApiError(format!(
                    "Geocoding returned {}",
                    status
                )))
            }
        }

        let envelope: GeocodeEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse geocode: {}", e)))?;

        Ok(envelope.results.into_iter().next())
    }

    /// Formatted address nearest to a coordinate pair
    pub async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<Option<String>, ProviderError> {
        let query = format!("{},{}", coordinates.lat, coordinates.lng);
        Ok(self.first_result(&query).await?.and_then(|r| r.formatted))
    }
}

#[async_trait]
impl GeocodingProvider for OpenCageGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, ProviderError> {
        Ok(self
            .first_result(address)
            .await?
            .map(|r| Coordinates::new(r.geometry.lat, r.geometry.lng)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn geocoder(url: String) -> OpenCageGeocoder {
        OpenCageGeocoder::new(url, "geo_key".to_string(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_geocode_first_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Atlanta, GA".into()),
                Matcher::UrlEncoded("key".into(), "geo_key".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"results": [{"geometry": {"lat": 33.749, "lng": -84.388}, "formatted": "Atlanta, GA, USA"}]}"#)
            .create_async()
            .await;

        let coords = geocoder(server.url()).geocode("Atlanta, GA").await.unwrap();

        mock.assert_async().await;
        assert_eq!(coords, Some(Coordinates::new(33.749, -84.388)));
    }

    #[tokio::test]
    async fn test_geocode_no_results() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": []}"#)
            .create_async()
            .await;

        let geocoder = geocoder(server.url());
        assert_eq!(geocoder.geocode("Nowhere").await.unwrap(), None);
        assert_eq!(
            geocoder
                .reverse_geocode(Coordinates::new(0.0, 0.0))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_reverse_geocode() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("q".into(), "33.749,-84.388".into()))
            .with_status(200)
            .with_body(r#"{"results": [{"geometry": {"lat": 33.749, "lng": -84.388}, "formatted": "Atlanta, GA, USA"}]}"#)
            .create_async()
            .await;

        let address = geocoder(server.url())
            .reverse_geocode(Coordinates::new(33.749, -84.388))
            .await
            .unwrap();
        assert_eq!(address.as_deref(), Some("Atlanta, GA, USA"));
    }

    #[tokio::test]
    async fn test_geocode_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let result = geocoder(server.url()).geocode("Atlanta").await;
        assert!(matches!(result, Err(ProviderError::ApiError(_))));
    }
}
