// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    maps_link, BoundingBox, Candidate, CandidateReviews, ConfidenceBreakdown, Coordinates,
    CuisineRule, GlutenSignal, PlaceDetails, PlaceLinks, RankedResult, ReviewText, Sentiment,
};
pub use requests::{ProviderQuery, SearchRequest};
pub use responses::{
    ErrorResponse, GlutenSnippet, HealthResponse, PlaceDetailResponse, PlaceSignal,
    SearchResponse, RANKING_EXPLAINER,
};
