//! Cache-aside store for catalog reference data
//!
//! One process-wide [`CatalogCache`] is created at startup and shared by
//! reference across requests. Entries expire independently according to the
//! TTL they were stored with.
//!
//! Two access patterns are offered:
//!
//! - [`CatalogCache::get_or_populate`] for fixed keys (labels, names, category
//!   pools). Concurrent misses on the same key run a single initializer and
//!   every waiter receives its result.
//! - [`CatalogCache::get_or_populate_item`] for per-item keys. A lock-free read
//!   is tried first; on a miss the caller takes a slot from a request-scoped
//!   semaphore and reads again before going upstream.

use moka::Expiry;
use moka::future::Cache;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::config::CacheConfig;
use crate::errors::{AppError, AppResult, CatalogError};
use crate::models::CatalogEntryRef;
use crate::sources::CatalogClient;

const CATEGORY_LABELS_KEY: &str = "poke:types";
const ALL_NAMES_KEY: &str = "poke:all-names";

fn category_pool_key(label: &str) -> String {
    format!("poke:type:{}", label.to_lowercase())
}

fn lite_key(name: &str) -> String {
    format!("poke:lite:{}", name.to_lowercase())
}

/// Typed payload of a cache entry; the key prefix determines the variant
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Labels(Arc<Vec<String>>),
    Names(Arc<Vec<String>>),
    Pool(Arc<Vec<CatalogEntryRef>>),
    /// `None` records a confirmed miss upstream
    Lite(Option<CatalogEntryRef>),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedValue,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with
struct PerEntryTtl;

impl Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

fn unexpected_kind(key: &str) -> AppError {
    AppError::internal(format!("cache entry '{key}' holds an unexpected value kind"))
}

/// Process-wide TTL cache in front of the catalog client
pub struct CatalogCache {
    cache: Cache<String, CacheEntry>,
    config: CacheConfig,
}

impl CatalogCache {
    pub fn new(config: CacheConfig) -> Self {
        let cache = Cache::builder()
            .name("catalog")
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache, config }
    }

    /// Return the value under `key`, running `populate` on a miss.
    ///
    /// At most one `populate` runs per key at a time. Failures are not
    /// cached; every caller waiting on a failed initializer gets the error.
    pub async fn get_or_populate<Fut>(
        &self,
        key: String,
        ttl: Duration,
        populate: Fut,
    ) -> AppResult<CachedValue>
    where
        Fut: Future<Output = Result<CachedValue, CatalogError>>,
    {
        let miss_key = key.clone();
        let init = async move {
            debug!("Cache miss for '{}', populating", miss_key);
            populate.await.map(|value| CacheEntry { value, ttl })
        };

        self.cache
            .try_get_with(key, init)
            .await
            .map(|entry| entry.value)
            .map_err(|e| AppError::Catalog(e.as_ref().clone()))
    }

    /// Per-item cache-aside with a double-check under `slots`.
    pub async fn get_or_populate_item<Fut>(
        &self,
        key: String,
        ttl: Duration,
        slots: &Semaphore,
        populate: Fut,
    ) -> AppResult<CachedValue>
    where
        Fut: Future<Output = Result<CachedValue, CatalogError>>,
    {
        if let Some(entry) = self.cache.get(&key).await {
            return Ok(entry.value);
        }

        let _permit = slots
            .acquire()
            .await
            .map_err(|e| AppError::internal(format!("lookup slots unavailable: {e}")))?;

        if let Some(entry) = self.cache.get(&key).await {
            debug!("'{}' was populated while waiting for a slot", key);
            return Ok(entry.value);
        }

        let value = populate.await?;
        self.cache
            .insert(
                key,
                CacheEntry {
                    value: value.clone(),
                    ttl,
                },
            )
            .await;

        Ok(value)
    }

    /// Every category label
    pub async fn category_labels(
        &self,
        client: &dyn CatalogClient,
    ) -> AppResult<Arc<Vec<String>>> {
        let populate = async {
            let labels = client.all_category_labels().await?;
            Ok::<_, CatalogError>(CachedValue::Labels(Arc::new(labels)))
        };

        match self
            .get_or_populate(CATEGORY_LABELS_KEY.to_string(), self.config.types_ttl, populate)
            .await?
        {
            CachedValue::Labels(labels) => Ok(labels),
            _ => Err(unexpected_kind(CATEGORY_LABELS_KEY)),
        }
    }

    /// Every entry name
    pub async fn all_names(&self, client: &dyn CatalogClient) -> AppResult<Arc<Vec<String>>> {
        let populate = async {
            let names = client.all_names().await?;
            Ok::<_, CatalogError>(CachedValue::Names(Arc::new(names)))
        };

        match self
            .get_or_populate(ALL_NAMES_KEY.to_string(), self.config.all_names_ttl, populate)
            .await?
        {
            CachedValue::Names(names) => Ok(names),
            _ => Err(unexpected_kind(ALL_NAMES_KEY)),
        }
    }

    /// Members of the category `label`, unique by id, keyed case-insensitively
    pub async fn category_pool(
        &self,
        client: &dyn CatalogClient,
        label: &str,
        max: usize,
    ) -> AppResult<Arc<Vec<CatalogEntryRef>>> {
        let key = category_pool_key(label);
        let label = label.to_lowercase();
        let populate = async move {
            let entries = client.entries_by_category(&label, max).await?;
            let mut seen = HashSet::with_capacity(entries.len());
            let pool: Vec<_> = entries.into_iter().filter(|e| seen.insert(e.id)).collect();
            Ok::<_, CatalogError>(CachedValue::Pool(Arc::new(pool)))
        };

        match self
            .get_or_populate(key.clone(), self.config.type_pool_ttl, populate)
            .await?
        {
            CachedValue::Pool(pool) => Ok(pool),
            _ => Err(unexpected_kind(&key)),
        }
    }

    /// Lightweight record for an exact name, including cached misses
    pub async fn lite_by_name(
        &self,
        client: &dyn CatalogClient,
        name: &str,
        slots: &Semaphore,
    ) -> AppResult<Option<CatalogEntryRef>> {
        let key = lite_key(name);
        let populate = async { client.lite_by_name(name).await.map(CachedValue::Lite) };

        match self
            .get_or_populate_item(key.clone(), self.config.lite_by_name_ttl, slots, populate)
            .await?
        {
            CachedValue::Lite(lite) => Ok(lite),
            _ => Err(unexpected_kind(&key)),
        }
    }

    /// Drop every cached entry
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of live entries, after pending maintenance has run
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}
