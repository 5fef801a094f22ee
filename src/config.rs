use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::services::{geocode::OPENCAGE_API_URL, openai::{DEFAULT_MODEL, OPENAI_API_BASE}, yelp::YELP_API_BASE};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub yelp: YelpSettings,
    pub geocoding: GeocodingSettings,
    pub llm: LlmSettings,
    pub cache: CacheSettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
    /// Serve canned data instead of calling upstream APIs
    pub mock_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YelpSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub search_limit: u32,
    pub review_limit: u32,
    pub timeout_secs: u64,
}

impl Default for YelpSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: YELP_API_BASE.to_string(),
            search_limit: 50,
            review_limit: 20,
            timeout_secs: 30,
        }
    }
}

impl YelpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocodingSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENCAGE_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENAI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 86_400,
            capacity: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub min_radius_miles: f64,
    pub max_radius_miles: f64,
    pub cuisine_fallback_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_radius_miles: 0.1,
            max_radius_miles: 50.0,
            cuisine_fallback_limit: 5,
        }
    }
}

impl SearchSettings {
    pub fn accepts_radius(&self, radius_miles: f64) -> bool {
        (self.min_radius_miles..=self.max_radius_miles).contains(&radius_miles)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// Conventional key variables, honored alongside the prefixed ones
const API_KEY_VARS: &[(&str, &str)] = &[
    ("YELP_API_KEY", "yelp.api_key"),
    ("OPENCAGE_API_KEY", "geocoding.api_key"),
    ("OPENAI_API_KEY", "llm.api_key"),
];

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Plain API key variables (YELP_API_KEY, OPENCAGE_API_KEY, OPENAI_API_KEY)
    /// 3. Configuration file (config/default.toml, then config/local.toml)
    /// 4. Environment variables (prefixed with SAFEBITES__)
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false));

        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut builder = builder;
        for (var, key) in API_KEY_VARS {
            if let Some(value) = std::env::var(var).ok().filter(|v| !v.trim().is_empty()) {
                builder = builder.set_default(*key, value)?;
            }
        }

        builder
            // e.g., SAFEBITES__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SAFEBITES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
