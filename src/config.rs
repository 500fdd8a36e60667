use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub l1_cache_size: Option<u64>,
    /// TTL of memoized full responses
    pub response_ttl_secs: Option<u64>,
    /// TTL of memoized per-user top cuisines
    pub preference_ttl_secs: Option<u64>,
}

/// Tunables of the ranking pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_max_distance_km")]
    pub default_max_distance_km: f64,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_top_cuisines")]
    pub top_cuisines: usize,
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_max_distance_km: default_max_distance_km(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            top_cuisines: default_top_cuisines(),
            min_rating: default_min_rating(),
        }
    }
}

fn default_max_distance_km() -> f64 { 10.0 }
fn default_limit() -> usize { 20 }
fn default_max_limit() -> usize { 50 }
fn default_top_cuisines() -> usize { 5 }
fn default_min_rating() -> f64 { 3.5 }

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

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with SAVOR_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with SAVOR_)
            // e.g., SAVOR_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SAVOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SAVOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Honor the conventional DATABASE_URL / REDIS_URL variables over the
/// prefixed forms
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL").or_else(|_| env::var("SAVOR_DATABASE__URL")) {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL").or_else(|_| env::var("SAVOR_CACHE__REDIS_URL")) {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }

    builder.build()
}
