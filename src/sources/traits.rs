//! Catalog client trait definition
//!
//! The query layer only ever talks to the catalog through this trait, so the
//! HTTP client and the in-memory fixture catalog are interchangeable.

use async_trait::async_trait;

use crate::errors::CatalogResult;
use crate::models::{CatalogEntryDetails, CatalogEntryRef, EntityId};

/// Read-only access to a remote entity catalog
///
/// Lookups of a single entry return `Ok(None)` when the entry does not
/// exist; `Err` is reserved for transport, status and decoding failures.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Every category label the catalog knows about
    async fn all_category_labels(&self) -> CatalogResult<Vec<String>>;

    /// Every entry name, used for substring search
    async fn all_names(&self) -> CatalogResult<Vec<String>>;

    /// Up to `max` entries belonging to the category `label`
    async fn entries_by_category(
        &self,
        label: &str,
        max: usize,
    ) -> CatalogResult<Vec<CatalogEntryRef>>;

    /// Lightweight id/name record for an exact name
    async fn lite_by_name(&self, name: &str) -> CatalogResult<Option<CatalogEntryRef>>;

    /// Full record by id
    async fn details_by_id(&self, id: EntityId) -> CatalogResult<Option<CatalogEntryDetails>>;

    /// Full record by exact name
    async fn details_by_name(&self, name: &str) -> CatalogResult<Option<CatalogEntryDetails>>;

    /// Number of entries in the catalog
    async fn total_count(&self) -> CatalogResult<u64>;

    /// One page (1-based) of full records in native catalog order
    async fn page(&self, page: u32, page_size: u32) -> CatalogResult<Vec<CatalogEntryDetails>>;
}
