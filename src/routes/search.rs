use std::sync::Arc;
use std::time::Instant;

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::config::SearchSettings;
use crate::core::{RankError, Ranker};
use crate::models::{ErrorResponse, HealthResponse, ProviderQuery, SearchRequest, SearchResponse, RANKING_EXPLAINER};
use crate::services::{GeocodingProvider, MockGeocoder, MockPlaceProvider, PlaceSearchProvider};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub places: Arc<dyn PlaceSearchProvider>,
    pub geocoder: Arc<dyn GeocodingProvider>,
    pub mock_places: Arc<dyn PlaceSearchProvider>,
    pub mock_geocoder: Arc<dyn GeocodingProvider>,
    pub ranker: Arc<Ranker>,
    pub search: SearchSettings,
}

impl AppState {
    pub fn new(
        places: Arc<dyn PlaceSearchProvider>,
        geocoder: Arc<dyn GeocodingProvider>,
        ranker: Arc<Ranker>,
        search: SearchSettings,
    ) -> Self {
        Self {
            places,
            geocoder,
            mock_places: Arc::new(MockPlaceProvider::new()),
            mock_geocoder: Arc::new(MockGeocoder),
            ranker,
            search,
        }
    }

    /// State that only ever serves canned data
    pub fn mock(ranker: Arc<Ranker>, search: SearchSettings) -> Self {
        Self::new(Arc::new(MockPlaceProvider::new()), Arc::new(MockGeocoder), ranker, search)
    }

    fn places(&self, mock: bool) -> &dyn PlaceSearchProvider {
        if mock { self.mock_places.as_ref() } else { self.places.as_ref() }
    }

    fn geocoder(&self, mock: bool) -> &dyn GeocodingProvider {
        if mock { self.mock_geocoder.as_ref() } else { self.geocoder.as_ref() }
    }
}

/// Configure search and place routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/search", web::post().to(search))
        .route("/places/{place_id}", web::get().to(place_details));
}

/// Service banner
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "SafeBites API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
    }))
}

/// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn rank_error_response(err: RankError) -> HttpResponse {
    match err {
        RankError::NotFound(id) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Place not found".to_string(),
            message: format!("No place with id {}", id),
            status_code: 404,
        }),
        RankError::Upstream(e) => {
            tracing::error!("Upstream provider failed: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Upstream provider failed".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}

/// Search for gluten-friendly places
///
/// POST /api/v1/search?mock=false
///
/// Request body:
/// ```json
/// {
///   "query": "Atlanta, GA",
///   "radiusMiles": 10,
///   "cuisine": "pizza"
/// }
/// ```
async fn search(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
    query: web::Query<ProviderQuery>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if !state.search.accepts_radius(req.radius_miles) {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: format!(
                "radiusMiles must be between {} and {}",
                state.search.min_radius_miles, state.search.max_radius_miles
            ),
            status_code: 400,
        });
    }

    let start = Instant::now();
    let mock = query.mock;
    let cuisine = req.cuisine_filter();

    tracing::info!(
        "Searching '{}' within {} miles (cuisine: {:?}, mock: {})",
        req.query,
        req.radius_miles,
        cuisine,
        mock
    );

    let center = match state.geocoder(mock).geocode(&req.query).await {
        Ok(Some(center)) => center,
        Ok(None) => {
            tracing::info!("Could not geocode '{}'", req.query);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Location not found".to_string(),
                message: format!("Could not geocode address: {}", req.query),
                status_code: 400,
            });
        }
        Err(e) => {
            tracing::error!("Geocoding failed for '{}': {}", req.query, e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Geocoding failed".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    let results = match state
        .ranker
        .search(state.places(mock), center, req.radius_miles, cuisine)
        .await
    {
        Ok(results) => results,
        Err(e) => return rank_error_response(e),
    };

    let search_time = start.elapsed().as_secs_f64();
    tracing::info!("Search returned {} results in {:.3}s", results.len(), search_time);

    HttpResponse::Ok().json(SearchResponse {
        center,
        ranking_explainer: RANKING_EXPLAINER.to_string(),
        total_results: results.len(),
        results,
        search_time,
    })
}

/// Gluten report for a single place
///
/// GET /api/v1/places/{place_id}?mock=false
async fn place_details(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ProviderQuery>,
) -> impl Responder {
    let place_id = path.into_inner();
    tracing::info!("Fetching place details for {}", place_id);

    match state.ranker.place_report(state.places(query.mock), &place_id).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => rank_error_response(e),
    }
}
