//! Domain models for catalog entries and search results

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod pagination;
pub mod search;

pub use pagination::Pagination;
pub use search::{PokedexIndexView, SearchMode, SearchQuery, SearchResultPage};

/// Canonical catalog identifier
pub type EntityId = i32;

/// Minimal reference to a catalog entry, as produced by listing calls
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntryRef {
    pub id: EntityId,
    pub name: String,
}

impl CatalogEntryRef {
    pub fn new<S: Into<String>>(id: EntityId, name: S) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Full catalog record for a single entry. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntryDetails {
    pub id: EntityId,
    pub name: String,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_experience: Option<u32>,
    /// Category labels in slot order
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
}

impl CatalogEntryDetails {
    pub fn as_ref_entry(&self) -> CatalogEntryRef {
        CatalogEntryRef::new(self.id, self.name.clone())
    }
}
