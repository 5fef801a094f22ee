use std::cmp::Ordering;

use futures::future::join_all;
use thiserror::Error;

use crate::core::{
    confidence::ConfidenceEstimator,
    cuisine::CuisineMatcher,
    distance::{distance_miles, round_to_tenth, METERS_PER_MILE},
    signal::{summarize, ReviewAnalysis, SignalExtractor},
};
use crate::models::{
    Candidate, CandidateReviews, Coordinates, GlutenSnippet, PlaceDetailResponse, PlaceLinks,
    PlaceSignal, RankedResult,
};
use crate::services::{PlaceSearchProvider, ProviderError};

/// Results returned when a cuisine filter matches nothing
pub const DEFAULT_FALLBACK_LIMIT: usize = 5;

/// Most gluten snippets shown for a single place
const MAX_SNIPPETS: usize = 10;

/// Snippet length in characters before truncation
const SNIPPET_CHARS: usize = 200;

/// Pipeline-level failures
///
/// Per-candidate collaborator failures never surface here, they only lower
/// that candidate's confidence.
#[derive(Debug, Error)]
pub enum RankError {
    #[error("Place search failed: {0}")]
    Upstream(#[from] ProviderError),

    #[error("Place not found: {0}")]
    NotFound(String),
}

/// A ranked result with its unrounded distance, used as the sort key
struct Scored {
    distance: f64,
    result: RankedResult,
}

/// Main ranking orchestrator
///
/// # Pipeline Stages
/// 1. Radius filter (Haversine)
/// 2. Gluten keyword detection and sentiment tally per place
/// 3. Confidence scoring and summary
/// 4. Sort by confidence, then distance
/// 5. Optional cuisine filter with a top-N fallback
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    extractor: SignalExtractor,
    estimator: ConfidenceEstimator,
    cuisine: CuisineMatcher,
    fallback_limit: Option<usize>,
}

impl Ranker {
    pub fn new(extractor: SignalExtractor, estimator: ConfidenceEstimator, cuisine: CuisineMatcher) -> Self {
        Self {
            extractor,
            estimator,
            cuisine,
            fallback_limit: None,
        }
    }

    pub fn with_fallback_limit(mut self, limit: usize) -> Self {
        self.fallback_limit = Some(limit);
        self
    }

    pub fn fallback_limit(&self) -> usize {
        self.fallback_limit.unwrap_or(DEFAULT_FALLBACK_LIMIT)
    }

    /// Rank candidates whose reviews are already in hand
    ///
    /// The cuisine filter, when given, judges places by their listing categories.
    pub fn rank(
        &self,
        center: Coordinates,
        radius_miles: f64,
        candidates: Vec<CandidateReviews>,
        cuisine: Option<&str>,
    ) -> Vec<RankedResult> {
        let scored = candidates
            .into_iter()
            .filter_map(|CandidateReviews { candidate, reviews }| {
                let distance = self.distance_within(center, &candidate, radius_miles)?;
                let analysis = self.extractor.extract(&reviews);
                Some(self.score(candidate, distance, &analysis))
            })
            .collect();

        let ranked = sort_ranked(scored);

        match cuisine {
            Some(cuisine) => {
                let categories: Vec<Vec<String>> =
                    ranked.iter().map(|r| r.categories.clone()).collect();
                self.filter_by_cuisine(ranked, &categories, cuisine)
            }
            None => ranked,
        }
    }

    /// Search the provider around `center` and rank what comes back
    ///
    /// Reviews and details are fetched concurrently per candidate. A failed
    /// review fetch scores the place as having no gluten reviews, a failed
    /// detail fetch falls back to the listing categories. Only a failed
    /// search aborts.
    pub async fn search<P: PlaceSearchProvider + ?Sized>(
        &self,
        provider: &P,
        center: Coordinates,
        radius_miles: f64,
        cuisine: Option<&str>,
    ) -> Result<Vec<RankedResult>, RankError> {
        let term = cuisine.map(|c| self.cuisine.primary_search_term(c));
        let radius_meters = (radius_miles * METERS_PER_MILE).round() as u32;

        let candidates = provider.search(center, radius_meters, term.as_deref()).await?;
        let total_candidates = candidates.len();

        let in_range: Vec<(Candidate, f64)> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let distance = self.distance_within(center, &candidate, radius_miles)?;
                Some((candidate, distance))
            })
            .collect();

        tracing::debug!(
            "{} of {} candidates within {} miles",
            in_range.len(),
            total_candidates,
            radius_miles
        );

        let scored = join_all(in_range.into_iter().map(|(candidate, distance)| async move {
            let reviews = provider.get_reviews(&candidate.id).await.unwrap_or_else(|e| {
                tracing::warn!("Failed to fetch reviews for {}: {}", candidate.id, e);
                Vec::new()
            });
            let analysis = self.extractor.extract_enriched(&reviews).await;
            self.score(candidate, distance, &analysis)
        }))
        .await;

        let ranked = sort_ranked(scored);

        let Some(cuisine) = cuisine else {
            return Ok(ranked);
        };

        let categories = join_all(ranked.iter().map(|result| async move {
            match provider.get_details(&result.place_id).await {
                Ok(details) => details.categories,
                Err(e) => {
                    tracing::warn!("Failed to fetch details for {}: {}", result.place_id, e);
                    result.categories.clone()
                }
            }
        }))
        .await;

        Ok(self.filter_by_cuisine(ranked, &categories, cuisine))
    }

    /// Gluten report for a single place: details, signal and review snippets
    ///
    /// Details are required; reviews degrade to none on failure.
    pub async fn place_report<P: PlaceSearchProvider + ?Sized>(
        &self,
        provider: &P,
        place_id: &str,
    ) -> Result<PlaceDetailResponse, RankError> {
        let place = provider.get_details(place_id).await.map_err(|e| match e {
            ProviderError::NotFound(_) => RankError::NotFound(place_id.to_string()),
            other => RankError::Upstream(other),
        })?;

        let reviews = provider.get_reviews(place_id).await.unwrap_or_else(|e| {
            tracing::warn!("Failed to fetch reviews for {}: {}", place_id, e);
            Vec::new()
        });

        let analysis = self.extractor.extract_enriched(&reviews).await;
        let signal = analysis.signal;

        let gluten_snippets = analysis
            .relevant
            .iter()
            .take(MAX_SNIPPETS)
            .map(|classified| GlutenSnippet {
                text: truncate_snippet(&classified.review.text),
                rating: classified.review.rating.unwrap_or(0),
                sentiment: classified.sentiment,
                published_at: classified.review.published_at,
            })
            .collect();

        let links = PlaceLinks::new(
            place.website.as_deref().unwrap_or_default(),
            Coordinates::new(place.lat, place.lng),
        );

        Ok(PlaceDetailResponse {
            gluten_signal: PlaceSignal {
                confidence: self.estimator.estimate_signal(&signal),
                gluten_review_count: signal.gluten_review_count,
                positive_count: signal.positive_count,
                negative_count: signal.negative_count,
                positivity_rate: signal.positivity_rate(),
            },
            gluten_snippets,
            links,
            place,
        })
    }

    /// Distance to `candidate` when it lies within the radius
    fn distance_within(&self, center: Coordinates, candidate: &Candidate, radius_miles: f64) -> Option<f64> {
        let distance = distance_miles(center, candidate.coordinates);
        (distance <= radius_miles).then_some(distance)
    }

    fn score(&self, candidate: Candidate, distance: f64, analysis: &ReviewAnalysis) -> Scored {
        let signal = &analysis.signal;
        let links = PlaceLinks::new(&candidate.url, candidate.coordinates);

        Scored {
            distance,
            result: RankedResult {
                place_id: candidate.id,
                name: candidate.name,
                distance_miles: round_to_tenth(distance),
                confidence: self.estimator.estimate_signal(signal),
                gluten_review_count: signal.gluten_review_count,
                positive_count: signal.positive_count,
                negative_count: signal.negative_count,
                summary_text: summarize(signal),
                address: candidate.address,
                rating: candidate.rating,
                review_count: candidate.review_count,
                links,
                categories: candidate.categories,
            },
        }
    }

    /// Keep results matching `cuisine`; `categories[i]` belongs to `ranked[i]`
    fn filter_by_cuisine(
        &self,
        ranked: Vec<RankedResult>,
        categories: &[Vec<String>],
        cuisine: &str,
    ) -> Vec<RankedResult> {
        let keep: Vec<bool> = ranked
            .iter()
            .zip(categories)
            .map(|(result, cats)| self.cuisine.matches(&result.name, cats, cuisine))
            .collect();

        if ranked.is_empty() || keep.iter().any(|k| *k) {
            return ranked
                .into_iter()
                .zip(keep)
                .filter_map(|(result, keep)| keep.then_some(result))
                .collect();
        }

        tracing::info!(
            "No results matched cuisine '{}', returning top {} unfiltered",
            cuisine,
            self.fallback_limit()
        );
        ranked.into_iter().take(self.fallback_limit()).collect()
    }
}

/// Sort by confidence (descending) and then by distance (ascending)
fn sort_ranked(mut scored: Vec<Scored>) -> Vec<RankedResult> {
    scored.sort_by(|a, b| {
        b.result
            .confidence
            .cmp(&a.result.confidence)
            .then_with(|| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal))
    });

    scored.into_iter().map(|s| s.result).collect()
}

fn truncate_snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
