// Service exports
pub mod cache;
pub mod geocode;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod yelp;

pub use cache::CachedPlaceProvider;
pub use geocode::OpenCageGeocoder;
pub use mock::{MockGeocoder, MockPlaceProvider};
pub use openai::OpenAiClient;
pub use provider::{GeocodingProvider, LanguageModelProvider, PlaceSearchProvider, ProviderError};
pub use yelp::YelpClient;
