//! Catalog sources
//!
//! Implementations of [`CatalogClient`]: the PokeAPI HTTP client used in
//! production, a fixture-backed in-memory catalog for offline runs, and a
//! caching decorator that sits in front of either.

pub mod cached;
pub mod memory;
pub mod pokeapi;
pub mod traits;

pub use cached::CachingCatalogClient;
pub use memory::{CatalogOperation, InMemoryCatalog};
pub use pokeapi::PokeApiClient;
pub use traits::CatalogClient;
