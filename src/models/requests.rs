use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to search for gluten-friendly places
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    /// Address or location to search from
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub query: String,
    #[serde(alias = "radius_miles", rename = "radiusMiles")]
    #[validate(range(min = 0.1, max = 50.0, message = "radiusMiles must be between 0.1 and 50"))]
    pub radius_miles: f64,
    #[serde(default)]
    pub cuisine: Option<String>,
}

impl SearchRequest {
    /// Cuisine filter with blank values treated as absent
    pub fn cuisine_filter(&self) -> Option<&str> {
        self.cuisine
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Query flags accepted by the search and place endpoints
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProviderQuery {
    #[serde(default)]
    pub mock: bool,
}
