//! SafeBites Algo - gluten-safety ranking for restaurant search
//!
//! Scans place reviews for gluten-related phrases, classifies their
//! gluten-safety sentiment and ranks nearby places by a Wilson-bound
//! confidence score.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Ranker, RankError, distance::{haversine_distance, calculate_bounding_box}};
pub use models::{Candidate, CandidateReviews, Coordinates, GlutenSignal, RankedResult, ReviewText, Sentiment};
