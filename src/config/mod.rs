use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use crate::errors::AppError;
use crate::utils::retry::RetryConfig;
use defaults::*;
use duration_serde::duration;

/// Environment variable prefix; nested keys are separated by `__`
/// (e.g. `POKEDEX_CACHE__TYPE_POOL_TTL=30m`).
pub const ENV_PREFIX: &str = "POKEDEX_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for a whole search request, upstream calls included
    #[serde(default = "default_request_timeout", with = "duration")]
    pub request_timeout: Duration,
}

/// Upstream catalog (PokeAPI) client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    #[serde(default = "default_catalog_connect_timeout", with = "duration")]
    pub connect_timeout: Duration,
    #[serde(default = "default_catalog_request_timeout", with = "duration")]
    pub request_timeout: Duration,
    /// Maximum number of entries pulled for a single category pool
    #[serde(default = "default_category_pool_max")]
    pub category_pool_max: usize,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// TTLs and capacity of the process-wide catalog cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_max_capacity")]
    pub max_capacity: u64,
    #[serde(default = "default_types_ttl", with = "duration")]
    pub types_ttl: Duration,
    #[serde(default = "default_all_names_ttl", with = "duration")]
    pub all_names_ttl: Duration,
    #[serde(default = "default_type_pool_ttl", with = "duration")]
    pub type_pool_ttl: Duration,
    #[serde(default = "default_lite_by_name_ttl", with = "duration")]
    pub lite_by_name_ttl: Duration,
    /// Full records looked up by id or exact name
    #[serde(default = "default_details_ttl", with = "duration")]
    pub details_ttl: Duration,
    /// Catalog size and native pages
    #[serde(default = "default_listing_ttl", with = "duration")]
    pub listing_ttl: Duration,
}

/// Search behaviour: page size default and fan-out caps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Larger requested page sizes are clamped to this
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// Concurrent full-detail fetches per request
    #[serde(default = "default_max_detail_concurrency")]
    pub max_detail_concurrency: usize,
    /// Concurrent lite-by-name resolutions per request
    #[serde(default = "default_max_lite_concurrency")]
    pub max_lite_concurrency: usize,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

// Catalog defaults
fn default_catalog_base_url() -> String {
    DEFAULT_CATALOG_BASE_URL.to_string()
}

fn default_catalog_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CATALOG_CONNECT_TIMEOUT_SECS)
}

fn default_catalog_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS)
}

fn default_category_pool_max() -> usize {
    DEFAULT_CATEGORY_POOL_MAX
}

// Cache defaults
fn default_cache_max_capacity() -> u64 {
    DEFAULT_CACHE_MAX_CAPACITY
}

fn default_types_ttl() -> Duration {
    Duration::from_secs(DEFAULT_TYPES_TTL_SECS)
}

fn default_all_names_ttl() -> Duration {
    Duration::from_secs(DEFAULT_ALL_NAMES_TTL_SECS)
}

fn default_type_pool_ttl() -> Duration {
    Duration::from_secs(DEFAULT_TYPE_POOL_TTL_SECS)
}

fn default_lite_by_name_ttl() -> Duration {
    Duration::from_secs(DEFAULT_LITE_BY_NAME_TTL_SECS)
}

fn default_details_ttl() -> Duration {
    Duration::from_secs(DEFAULT_DETAILS_TTL_SECS)
}

fn default_listing_ttl() -> Duration {
    Duration::from_secs(DEFAULT_LISTING_TTL_SECS)
}

// Query defaults
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    DEFAULT_MAX_PAGE_SIZE
}

fn default_max_detail_concurrency() -> usize {
    DEFAULT_MAX_DETAIL_CONCURRENCY
}

fn default_max_lite_concurrency() -> usize {
    DEFAULT_MAX_LITE_CONCURRENCY
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base_url(),
            connect_timeout: default_catalog_connect_timeout(),
            request_timeout: default_catalog_request_timeout(),
            category_pool_max: default_category_pool_max(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_cache_max_capacity(),
            types_ttl: default_types_ttl(),
            all_names_ttl: default_all_names_ttl(),
            type_pool_ttl: default_type_pool_ttl(),
            lite_by_name_ttl: default_lite_by_name_ttl(),
            details_ttl: default_details_ttl(),
            listing_ttl: default_listing_ttl(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_detail_concurrency: default_max_detail_concurrency(),
            max_lite_concurrency: default_max_lite_concurrency(),
        }
    }
}

impl Config {
    /// Load configuration, writing a default file first if none exists.
    ///
    /// Precedence (lowest to highest): built-in defaults, the TOML file,
    /// `POKEDEX_*` environment variables.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if !Path::new(config_file).exists() {
            let contents = toml::to_string_pretty(&Self::default())?;
            std::fs::write(config_file, contents)
                .with_context(|| format!("Failed to write default config to {config_file}"))?;
            info!("Created default config file: {}", config_file);
        }

        let config: Config = Self::figment(config_file)
            .extract()
            .with_context(|| format!("Failed to load config from {config_file}"))?;

        config.validate()?;
        Ok(config)
    }

    /// Layered figment for the given file (exposed for tests and tooling)
    pub fn figment(config_file: &str) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject settings that would stall or disable the search path
    pub fn validate(&self) -> Result<(), AppError> {
        if self.query.default_page_size == 0 {
            return Err(AppError::configuration(
                "query.default_page_size must be at least 1",
            ));
        }
        if self.query.max_page_size < self.query.default_page_size {
            return Err(AppError::configuration(
                "query.max_page_size must not be smaller than query.default_page_size",
            ));
        }
        if self.query.max_detail_concurrency == 0 {
            return Err(AppError::configuration(
                "query.max_detail_concurrency must be at least 1",
            ));
        }
        if self.query.max_lite_concurrency == 0 {
            return Err(AppError::configuration(
                "query.max_lite_concurrency must be at least 1",
            ));
        }

        let ttls = [
            ("cache.types_ttl", self.cache.types_ttl),
            ("cache.all_names_ttl", self.cache.all_names_ttl),
            ("cache.type_pool_ttl", self.cache.type_pool_ttl),
            ("cache.lite_by_name_ttl", self.cache.lite_by_name_ttl),
            ("cache.details_ttl", self.cache.details_ttl),
            ("cache.listing_ttl", self.cache.listing_ttl),
        ];
        if let Some((name, _)) = ttls.iter().find(|(_, ttl)| ttl.is_zero()) {
            return Err(AppError::configuration(format!("{name} must be non-zero")));
        }

        if self.catalog.retry.max_attempts == 0 {
            return Err(AppError::configuration(
                "catalog.retry.max_attempts must be at least 1",
            ));
        }

        url::Url::parse(&self.catalog.base_url).map_err(|e| {
            AppError::configuration(format!(
                "catalog.base_url '{}' is not a valid URL: {e}",
                self.catalog.base_url
            ))
        })?;

        Ok(())
    }
}
