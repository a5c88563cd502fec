/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Catalog client defaults
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_CATALOG_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_CATEGORY_POOL_MAX: usize = 20_000;
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 2_000;

// Cache defaults
pub const DEFAULT_CACHE_MAX_CAPACITY: u64 = 10_000;
pub const DEFAULT_TYPES_TTL_SECS: u64 = 12 * 60 * 60;
pub const DEFAULT_ALL_NAMES_TTL_SECS: u64 = 12 * 60 * 60;
pub const DEFAULT_TYPE_POOL_TTL_SECS: u64 = 12 * 60 * 60;
pub const DEFAULT_LITE_BY_NAME_TTL_SECS: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_DETAILS_TTL_SECS: u64 = 12 * 60 * 60;
pub const DEFAULT_LISTING_TTL_SECS: u64 = 60 * 60;

// Query defaults
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 200;
pub const DEFAULT_MAX_DETAIL_CONCURRENCY: usize = 8;
pub const DEFAULT_MAX_LITE_CONCURRENCY: usize = 10;
