//! Pokédex search orchestration
//!
//! Resolves a [`SearchQuery`] into one page of fully detailed entries. The
//! query picks exactly one strategy:
//!
//! 1. **Category**: the cached category pool, optionally narrowed by a
//!    case-insensitive name substring.
//! 2. **Name**: an exact-name lookup that short-circuits to a single-item
//!    page, falling back to a substring scan over the cached name index with
//!    each match resolved to its id through the per-name cache.
//! 3. **Default**: the catalog's native paging.
//!
//! Category and name candidates are sorted by id, clamped and sliced, and
//! only the visible ids are materialized. The category label list is
//! loaded alongside every query.

use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

use super::bounded_fetch::fetch_details_bounded;
use super::catalog_cache::CatalogCache;
use crate::config::QueryConfig;
use crate::errors::AppResult;
use crate::models::{
    EntityId, Pagination, PokedexIndexView, SearchMode, SearchQuery, SearchResultPage,
};
use crate::sources::CatalogClient;

/// Orchestrates candidate resolution, pagination and detail fetching
pub struct PokedexQueryService {
    client: Arc<dyn CatalogClient>,
    cache: Arc<CatalogCache>,
    config: QueryConfig,
    category_pool_max: usize,
}

impl PokedexQueryService {
    pub fn new(
        client: Arc<dyn CatalogClient>,
        cache: Arc<CatalogCache>,
        config: QueryConfig,
        category_pool_max: usize,
    ) -> Self {
        Self {
            client,
            cache,
            config,
            category_pool_max,
        }
    }

    /// Page size used when a request does not give a usable one
    pub fn default_page_size(&self) -> u32 {
        self.config.default_page_size
    }

    pub fn max_page_size(&self) -> u32 {
        self.config.max_page_size
    }

    /// Answer a search request.
    ///
    /// Any catalog failure fails the whole request; entries the catalog
    /// reports as absent are simply left out.
    pub async fn search(&self, query: SearchQuery) -> AppResult<PokedexIndexView> {
        let labels = self.cache.category_labels(self.client.as_ref());
        let page = self.resolve_page(&query);

        let (labels, page) = futures::try_join!(labels, page)?;

        debug!(
            "Search resolved {} of {} entries (page {}, size {})",
            page.items.len(),
            page.total_count,
            page.page,
            page.page_size
        );

        Ok(PokedexIndexView::assemble(query, page, labels.to_vec()))
    }

    async fn resolve_page(&self, query: &SearchQuery) -> AppResult<SearchResultPage> {
        match query.mode() {
            SearchMode::Category { label, term } => {
                debug!("Category search: label='{}', term={:?}", label, term);
                let candidates = self.category_candidates(label, term).await?;
                self.materialize(&candidates, query).await
            }
            SearchMode::Name { term } => {
                debug!("Name search: term='{}'", term);
                self.search_by_name(term, query).await
            }
            SearchMode::Default => self.native_page(query).await,
        }
    }

    /// Pool members whose name contains `term`, ascending by id
    async fn category_candidates(
        &self,
        label: &str,
        term: Option<&str>,
    ) -> AppResult<Vec<EntityId>> {
        let pool = self
            .cache
            .category_pool(self.client.as_ref(), label, self.category_pool_max)
            .await?;

        let needle = term.map(str::to_lowercase);
        let mut ids: Vec<EntityId> = pool
            .iter()
            .filter(|entry| match &needle {
                Some(needle) => entry.name.to_lowercase().contains(needle),
                None => true,
            })
            .map(|entry| entry.id)
            .collect();
        ids.sort_unstable();

        Ok(ids)
    }

    async fn search_by_name(&self, term: &str, query: &SearchQuery) -> AppResult<SearchResultPage> {
        let client = self.client.as_ref();

        if let Some(details) = client.details_by_name(term).await? {
            debug!("Exact match for '{}' (id {})", term, details.id);
            return Ok(SearchResultPage::exact(details));
        }

        let names = self.cache.all_names(client).await?;
        let needle = term.to_lowercase();
        let matches: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect();

        if matches.is_empty() {
            return Ok(SearchResultPage::empty(query.page_size));
        }

        let slots = Semaphore::new(self.config.max_lite_concurrency.max(1));
        let resolved = try_join_all(
            matches
                .iter()
                .map(|name| self.cache.lite_by_name(client, name, &slots)),
        )
        .await?;

        let mut ids: Vec<EntityId> = resolved.into_iter().flatten().map(|lite| lite.id).collect();
        ids.sort_unstable();

        debug!(
            "'{}' matched {} names, {} resolved to ids",
            term,
            matches.len(),
            ids.len()
        );

        self.materialize(&ids, query).await
    }

    /// Clamp, slice and fetch details for the visible candidates
    async fn materialize(
        &self,
        candidates: &[EntityId],
        query: &SearchQuery,
    ) -> AppResult<SearchResultPage> {
        let pagination = Pagination::clamp(query.page, query.page_size, candidates.len() as u64);
        let visible = pagination.slice(candidates);

        let items = fetch_details_bounded(
            self.client.as_ref(),
            visible.iter().copied(),
            self.config.max_detail_concurrency,
        )
        .await?;

        Ok(SearchResultPage {
            items,
            total_count: pagination.total_count,
            page: pagination.page,
            page_size: pagination.page_size,
        })
    }

    async fn native_page(&self, query: &SearchQuery) -> AppResult<SearchResultPage> {
        let total = self.client.total_count().await?;
        let pagination = Pagination::clamp(query.page, query.page_size, total);

        let mut items = self
            .client
            .page(pagination.page, pagination.page_size)
            .await?;
        items.sort_by_key(|d| d.id);

        Ok(SearchResultPage {
            items,
            total_count: pagination.total_count,
            page: pagination.page,
            page_size: pagination.page_size,
        })
    }
}
