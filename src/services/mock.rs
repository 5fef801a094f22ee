use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::models::{Candidate, Coordinates, PlaceDetails, ReviewText};
use crate::services::provider::{GeocodingProvider, PlaceSearchProvider, ProviderError};

/// Atlanta, GA
pub const MOCK_CENTER: Coordinates = Coordinates {
    lat: 33.7490,
    lng: -84.3880,
};

struct MockBusiness {
    id: &'static str,
    name: &'static str,
    rating: f64,
    review_count: u32,
    price: &'static str,
    phone: &'static str,
    address: &'static str,
    category: &'static str,
    /// Offset in degrees applied to both latitude and longitude
    offset: f64,
}

const MOCK_BUSINESSES: &[MockBusiness] = &[
    MockBusiness {
        id: "mock-pizza-1",
        name: "Gluten-Free Pizza Palace",
        rating: 4.5,
        review_count: 127,
        price: "$$",
        phone: "+1-555-0123",
        address: "123 Gluten Free St",
        category: "pizza",
        offset: 0.01,
    },
    MockBusiness {
        id: "mock-italian-1",
        name: "Celiac Safe Italian Kitchen",
        rating: 4.8,
        review_count: 89,
        price: "$$$",
        phone: "+1-555-0456",
        address: "456 Safe Dining Ave",
        category: "italian",
        offset: -0.01,
    },
];

/// (id, rating, text, created "YYYY-MM-DD HH:MM:SS")
const MOCK_REVIEWS: &[(&str, u8, &str, (i32, u32, u32, u32, u32))] = &[
    (
        "mock-review-1",
        5,
        "Great gluten-free options! They have a dedicated fryer and the staff was very knowledgeable about celiac disease.",
        (2023, 12, 1, 12, 0),
    ),
    (
        "mock-review-2",
        4,
        "Good food but limited gluten-free menu. No cross-contamination issues though.",
        (2023, 11, 28, 18, 30),
    ),
    (
        "mock-review-3",
        2,
        "Not safe for celiac. They use shared equipment and I got sick.",
        (2023, 11, 25, 14, 15),
    ),
];

fn provider_url(id: &str) -> String {
    format!("https://www.yelp.com/biz/{}", id)
}

/// Canned place data for development and demos
///
/// Places are laid out around whatever center is searched; details resolve
/// relative to Atlanta.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockPlaceProvider;

impl MockPlaceProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PlaceSearchProvider for MockPlaceProvider {
    async fn search(
        &self,
        center: Coordinates,
        _radius_meters: u32,
        term: Option<&str>,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let pizza_only = term.is_some_and(|t| t.eq_ignore_ascii_case("pizza"));

        Ok(MOCK_BUSINESSES
            .iter()
            .filter(|b| !pizza_only || b.category == "pizza")
            .map(|b| Candidate {
                id: b.id.to_string(),
                name: b.name.to_string(),
                coordinates: Coordinates::new(center.lat + b.offset, center.lng + b.offset),
                rating: Some(b.rating),
                review_count: Some(b.review_count),
                categories: vec![b.category.to_string()],
                address: b.address.to_string(),
                url: provider_url(b.id),
            })
            .collect())
    }

    async fn get_reviews(&self, _place_id: &str) -> Result<Vec<ReviewText>, ProviderError> {
        Ok(MOCK_REVIEWS
            .iter()
            .map(|(id, rating, text, (y, mo, d, h, mi))| ReviewText {
                id: id.to_string(),
                text: text.to_string(),
                rating: Some(*rating),
                published_at: Utc.with_ymd_and_hms(*y, *mo, *d, *h, *mi, 0).single(),
            })
            .collect())
    }

    async fn get_details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError> {
        let business = MOCK_BUSINESSES
            .iter()
            .find(|b| b.id == place_id)
            .ok_or_else(|| ProviderError::NotFound(place_id.to_string()))?;

        Ok(PlaceDetails {
            id: business.id.to_string(),
            name: business.name.to_string(),
            address: business.address.to_string(),
            city: Some("Atlanta".to_string()),
            state: Some("GA".to_string()),
            country: Some("US".to_string()),
            lat: MOCK_CENTER.lat + business.offset,
            lng: MOCK_CENTER.lng + business.offset,
            rating: Some(business.rating),
            review_count: Some(business.review_count),
            phone: Some(business.phone.to_string()),
            website: Some(provider_url(business.id)),
            price: Some(business.price.to_string()),
            categories: vec![business.category.to_string()],
        })
    }
}

/// Resolves every address to Atlanta, GA
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGeocoder;

#[async_trait]
impl GeocodingProvider for MockGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, ProviderError> {
        tracing::debug!("Mock geocoding '{}'", address);
        Ok(Some(MOCK_CENTER))
    }
}
