//! Caching catalog decorator
//!
//! [`CachingCatalogClient`] wraps any [`CatalogClient`] and keeps detail
//! records, the catalog size and native pages for a configurable TTL, so a
//! repeated query is answered without going back upstream. Labels, names,
//! category pools and lite lookups pass straight through: the query layer
//! keeps those in its own [`CatalogCache`](crate::services::CatalogCache).

use async_trait::async_trait;
use moka::future::Cache;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::traits::CatalogClient;
use crate::config::CacheConfig;
use crate::errors::{CatalogError, CatalogResult};
use crate::models::{CatalogEntryDetails, CatalogEntryRef, EntityId};

fn build_cache<K, V>(name: &str, capacity: u64, ttl: Duration) -> Cache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .name(name)
        .max_capacity(capacity)
        .time_to_live(ttl)
        .build()
}

fn unshare(error: Arc<CatalogError>) -> CatalogError {
    error.as_ref().clone()
}

/// [`CatalogClient`] decorator with TTL caches for details and listings
///
/// Absent entries are cached like present ones; failures never are.
pub struct CachingCatalogClient {
    inner: Arc<dyn CatalogClient>,
    details_by_id: Cache<EntityId, Option<CatalogEntryDetails>>,
    details_by_name: Cache<String, Option<CatalogEntryDetails>>,
    total_count: Cache<(), u64>,
    pages: Cache<(u32, u32), Vec<CatalogEntryDetails>>,
}

impl CachingCatalogClient {
    pub fn new(inner: Arc<dyn CatalogClient>, config: &CacheConfig) -> Self {
        let capacity = config.max_capacity;

        Self {
            inner,
            details_by_id: build_cache("details-by-id", capacity, config.details_ttl),
            details_by_name: build_cache("details-by-name", capacity, config.details_ttl),
            total_count: build_cache("total-count", 1, config.listing_ttl),
            pages: build_cache("pages", capacity, config.listing_ttl),
        }
    }

    /// Drop every cached record
    pub fn invalidate_all(&self) {
        self.details_by_id.invalidate_all();
        self.details_by_name.invalidate_all();
        self.total_count.invalidate_all();
        self.pages.invalidate_all();
    }
}

#[async_trait]
impl CatalogClient for CachingCatalogClient {
    async fn all_category_labels(&self) -> CatalogResult<Vec<String>> {
        self.inner.all_category_labels().await
    }

    async fn all_names(&self) -> CatalogResult<Vec<String>> {
        self.inner.all_names().await
    }

    async fn entries_by_category(
        &self,
        label: &str,
        max: usize,
    ) -> CatalogResult<Vec<CatalogEntryRef>> {
        self.inner.entries_by_category(label, max).await
    }

    async fn lite_by_name(&self, name: &str) -> CatalogResult<Option<CatalogEntryRef>> {
        self.inner.lite_by_name(name).await
    }

    async fn details_by_id(&self, id: EntityId) -> CatalogResult<Option<CatalogEntryDetails>> {
        let fetch = async {
            debug!("Details cache miss for id {}", id);
            self.inner.details_by_id(id).await
        };
        self.details_by_id.try_get_with(id, fetch).await.map_err(unshare)
    }

    async fn details_by_name(&self, name: &str) -> CatalogResult<Option<CatalogEntryDetails>> {
        let fetch = async {
            debug!("Details cache miss for '{}'", name);
            self.inner.details_by_name(name).await
        };
        self.details_by_name
            .try_get_with(name.to_lowercase(), fetch)
            .await
            .map_err(unshare)
    }

    async fn total_count(&self) -> CatalogResult<u64> {
        self.total_count
            .try_get_with((), self.inner.total_count())
            .await
            .map_err(unshare)
    }

    async fn page(&self, page: u32, page_size: u32) -> CatalogResult<Vec<CatalogEntryDetails>> {
        let fetch = async {
            debug!("Page cache miss for page {} (size {})", page, page_size);
            self.inner.page(page, page_size).await
        };
        self.pages
            .try_get_with((page, page_size), fetch)
            .await
            .map_err(unshare)
    }
}
