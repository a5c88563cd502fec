//! Search request and result models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CatalogEntryDetails;

/// A normalized search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Name filter exactly as received
    pub search_name: Option<String>,
    /// Category label exactly as received
    pub selected_type: Option<String>,
    /// Requested page, at least 1
    pub page: u32,
    /// Requested page size, at least 1
    pub page_size: u32,
}

/// Which strategy resolves the candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode<'a> {
    /// Category pool, optionally narrowed by a name substring
    Category { label: &'a str, term: Option<&'a str> },
    /// Exact name first, then substring match over all names
    Name { term: &'a str },
    /// Native catalog paging
    Default,
}

impl SearchQuery {
    pub fn new(
        search_name: Option<String>,
        selected_type: Option<String>,
        page: u32,
        page_size: u32,
    ) -> Self {
        Self {
            search_name,
            selected_type,
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Trimmed search term, if any non-blank term was given
    pub fn term(&self) -> Option<&str> {
        self.search_name
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Trimmed category label, if any non-blank label was given
    pub fn category(&self) -> Option<&str> {
        self.selected_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// First match wins: category, then name, then default paging
    pub fn mode(&self) -> SearchMode<'_> {
        match (self.category(), self.term()) {
            (Some(label), term) => SearchMode::Category { label, term },
            (None, Some(term)) => SearchMode::Name { term },
            (None, None) => SearchMode::Default,
        }
    }
}

/// One page of fully detailed entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultPage {
    /// Ascending by id
    pub items: Vec<CatalogEntryDetails>,
    pub total_count: u64,
    /// Effective page after clamping
    pub page: u32,
    pub page_size: u32,
}

impl SearchResultPage {
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page: 1,
            page_size,
        }
    }

    /// Single-item page returned by an exact name match
    pub fn exact(details: CatalogEntryDetails) -> Self {
        Self {
            items: vec![details],
            total_count: 1,
            page: 1,
            page_size: 1,
        }
    }
}

/// Response view model for the Pokédex index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PokedexIndexView {
    pub search_name: Option<String>,
    pub selected_type: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub results: Vec<CatalogEntryDetails>,
    /// Every category label, for filter population
    pub all_categories: Vec<String>,
}

impl PokedexIndexView {
    pub fn assemble(query: SearchQuery, page: SearchResultPage, all_categories: Vec<String>) -> Self {
        Self {
            search_name: query.search_name,
            selected_type: query.selected_type,
            page: page.page,
            page_size: page.page_size,
            total_count: page.total_count,
            results: page.items,
            all_categories,
        }
    }
}
