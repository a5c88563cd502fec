//! Search services
//!
//! - [`bounded_fetch`]: capped concurrent fan-out over the catalog client
//! - [`catalog_cache`]: process-wide cache-aside store with per-entry TTLs
//! - [`pokedex_query`]: query mode selection, pagination and assembly

pub mod bounded_fetch;
pub mod catalog_cache;
pub mod pokedex_query;

pub use bounded_fetch::{fetch_bounded, fetch_details_bounded};
pub use catalog_cache::{CachedValue, CatalogCache};
pub use pokedex_query::PokedexQueryService;
