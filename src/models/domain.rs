use std::fmt;

use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A single provider review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewText {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ReviewText {
    /// Helper for reviews that only carry text
    pub fn plain(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            rating: None,
            published_at: None,
        }
    }
}

/// Gluten-safety polarity of a single review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Numeric polarity: 1 positive, -1 negative, 0 neutral
    pub fn score(self) -> f64 {
        match self {
            Sentiment::Positive => 1.0,
            Sentiment::Negative => -1.0,
            Sentiment::Neutral => 0.0,
        }
    }

    /// Parse a one-word label, tolerating case and surrounding whitespace or quotes
    pub fn from_label(label: &str) -> Option<Self> {
        let cleaned = label
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '.')
            .to_lowercase();
        match cleaned.as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        };
        f.write_str(label)
    }
}

/// Tally of gluten-relevant reviews for one place
///
/// Invariant: `positive_count + negative_count <= gluten_review_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlutenSignal {
    #[serde(rename = "glutenReviewCount")]
    pub gluten_review_count: u32,
    #[serde(rename = "positiveCount")]
    pub positive_count: u32,
    #[serde(rename = "negativeCount")]
    pub negative_count: u32,
}

impl GlutenSignal {
    /// Record one gluten-relevant review with its classified sentiment
    pub fn record(self, sentiment: Sentiment) -> Self {
        let mut next = Self {
            gluten_review_count: self.gluten_review_count.saturating_add(1),
            ..self
        };
        match sentiment {
            Sentiment::Positive => next.positive_count = next.positive_count.saturating_add(1),
            Sentiment::Negative => next.negative_count = next.negative_count.saturating_add(1),
            Sentiment::Neutral => {}
        }
        next
    }

    pub fn polarized_count(&self) -> u64 {
        u64::from(self.positive_count) + u64::from(self.negative_count)
    }

    /// Share of positive reviews among polarized ones, 0 when none are polarized
    pub fn positivity_rate(&self) -> f64 {
        self.positive_count as f64 / self.polarized_count().max(1) as f64
    }
}

/// Intermediate statistics behind a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub confidence: u8,
    #[serde(rename = "wilsonLowerBound")]
    pub wilson_lower_bound: f64,
    #[serde(rename = "volumeBonus")]
    pub volume_bonus: f64,
    #[serde(rename = "observedProportion")]
    pub observed_proportion: f64,
    #[serde(rename = "polarizedCount")]
    pub polarized_count: u64,
    #[serde(rename = "totalRelevantCount")]
    pub total_relevant_count: u32,
}

/// A place returned by the search provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "reviewCount", default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub address: String,
    /// Provider page for the place
    #[serde(default)]
    pub url: String,
}

/// A candidate together with the reviews the pipeline should score
#[derive(Debug, Clone)]
pub struct CandidateReviews {
    pub candidate: Candidate,
    pub reviews: Vec<ReviewText>,
}

/// Full place record returned by the provider's detail lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
    #[serde(rename = "reviewCount")]
    pub review_count: Option<u32>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub price: Option<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceLinks {
    pub provider: String,
    pub maps: String,
}

impl PlaceLinks {
    pub fn new(provider_url: &str, coordinates: Coordinates) -> Self {
        Self {
            provider: provider_url.to_string(),
            maps: maps_link(coordinates),
        }
    }
}

/// Deep link into Google Maps for a coordinate pair
pub fn maps_link(coordinates: Coordinates) -> String {
    format!("https://maps.google.com/?q={},{}", coordinates.lat, coordinates.lng)
}

/// Scored and ranked search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    #[serde(rename = "placeId")]
    pub place_id: String,
    pub name: String,
    #[serde(rename = "distanceMiles")]
    pub distance_miles: f64,
    pub confidence: u8,
    #[serde(rename = "glutenReviewCount")]
    pub gluten_review_count: u32,
    #[serde(rename = "positiveCount")]
    pub positive_count: u32,
    #[serde(rename = "negativeCount")]
    pub negative_count: u32,
    #[serde(rename = "summaryText")]
    pub summary_text: String,
    pub address: String,
    pub rating: Option<f64>,
    #[serde(rename = "reviewCount")]
    pub review_count: Option<u32>,
    pub links: PlaceLinks,
    /// Categories from the search listing, used by the cuisine filter
    #[serde(skip)]
    pub categories: Vec<String>,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

/// Search terms and categories a cuisine maps to
#[derive(Debug, Clone, Copy)]
pub struct CuisineRule {
    pub search_terms: &'static [&'static str],
    pub categories: &'static [&'static str],
}
