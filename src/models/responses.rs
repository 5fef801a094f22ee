use serde::{Deserialize, Serialize};

use crate::models::domain::{Coordinates, PlaceDetails, PlaceLinks, RankedResult, Sentiment};

pub const RANKING_EXPLAINER: &str =
    "Confidence = Wilson lower bound on gluten-safety sentiment + volume bonus";

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub center: Coordinates,
    #[serde(rename = "rankingExplainer")]
    pub ranking_explainer: String,
    pub results: Vec<RankedResult>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    /// Search time in seconds
    #[serde(rename = "searchTime")]
    pub search_time: f64,
}

/// Gluten-related excerpt of a review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlutenSnippet {
    pub text: String,
    pub rating: u8,
    pub sentiment: Sentiment,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Aggregated gluten signal for a single place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceSignal {
    pub confidence: u8,
    #[serde(rename = "glutenReviewCount")]
    pub gluten_review_count: u32,
    #[serde(rename = "positiveCount")]
    pub positive_count: u32,
    #[serde(rename = "negativeCount")]
    pub negative_count: u32,
    #[serde(rename = "positivityRate")]
    pub positivity_rate: f64,
}

/// Response for the place detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceDetailResponse {
    pub place: PlaceDetails,
    #[serde(rename = "glutenSignal")]
    pub gluten_signal: PlaceSignal,
    #[serde(rename = "glutenSnippets")]
    pub gluten_snippets: Vec<GlutenSnippet>,
    pub links: PlaceLinks,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
