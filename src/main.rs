use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use safebites_algo::config::Settings;
use safebites_algo::core::{ConfidenceEstimator, CuisineMatcher, KeywordDetector, Ranker, SentimentClassifier, SignalExtractor};
use safebites_algo::routes::{self, AppState};
use safebites_algo::services::{
    CachedPlaceProvider, GeocodingProvider, MockGeocoder, MockPlaceProvider, OpenAiClient,
    OpenCageGeocoder, PlaceSearchProvider, ProviderError, YelpClient,
};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn configured_key(key: &Option<String>) -> Option<&str> {
    key.as_deref().map(str::trim).filter(|k| !k.is_empty())
}

/// Place provider for the configured mode: Yelp behind a cache, or canned data
fn build_place_provider(settings: &Settings) -> Result<Arc<dyn PlaceSearchProvider>, ProviderError> {
    let api_key = match configured_key(&settings.yelp.api_key) {
        Some(key) if !settings.mock_mode => key.to_string(),
        _ => {
            warn!("Yelp API key not configured or mock mode enabled, serving mock places");
            return Ok(Arc::new(MockPlaceProvider::new()));
        }
    };

    let yelp = YelpClient::new(
        settings.yelp.base_url.clone(),
        api_key,
        settings.yelp.search_limit,
        settings.yelp.review_limit,
        settings.yelp.timeout(),
    )?;

    info!(
        "Yelp client initialized (cache: {} entries, TTL: {}s)",
        settings.cache.capacity, settings.cache.ttl_secs
    );

    Ok(Arc::new(CachedPlaceProvider::new(
        Arc::new(yelp),
        settings.cache.capacity,
        settings.cache.ttl_secs,
    )))
}

fn build_geocoder(settings: &Settings) -> Result<Arc<dyn GeocodingProvider>, ProviderError> {
    match configured_key(&settings.geocoding.api_key) {
        Some(key) if !settings.mock_mode => {
            info!("OpenCage geocoder initialized");
            Ok(Arc::new(OpenCageGeocoder::new(
                settings.geocoding.base_url.clone(),
                key.to_string(),
                Duration::from_secs(settings.geocoding.timeout_secs),
            )?))
        }
        _ => {
            warn!("Geocoding API key not configured or mock mode enabled, every address resolves to Atlanta, GA");
            Ok(Arc::new(MockGeocoder))
        }
    }
}

fn build_ranker(settings: &Settings) -> Result<Ranker, ProviderError> {
    let classifier = match configured_key(&settings.llm.api_key) {
        Some(key) if !settings.mock_mode => {
            let client = OpenAiClient::new(
                settings.llm.base_url.clone(),
                key.to_string(),
                settings.llm.model.clone(),
                settings.llm.timeout(),
            )?;
            info!("Language model sentiment enrichment enabled ({})", client.model());
            SentimentClassifier::new().with_language_model(Arc::new(client), settings.llm.timeout())
        }
        _ => {
            info!("Language model not configured, using rule-based sentiment");
            SentimentClassifier::new()
        }
    };

    let extractor = SignalExtractor::new(KeywordDetector::new(), classifier);

    Ok(Ranker::new(extractor, ConfidenceEstimator::default(), CuisineMatcher::new())
        .with_fallback_limit(settings.search.cuisine_fallback_limit))
}

fn startup_error(e: impl std::fmt::Display) -> std::io::Error {
    error!("Startup failed: {}", e);
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting SafeBites ranking service...");

    let places = build_place_provider(&settings).map_err(startup_error)?;
    let geocoder = build_geocoder(&settings).map_err(startup_error)?;
    let ranker = Arc::new(build_ranker(&settings).map_err(startup_error)?);

    let app_state = AppState::new(places, geocoder, ranker, settings.search.clone());

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
