//! Centralized error handling for the Pokédex search service
//!
//! # Error Categories
//!
//! - **Catalog Errors**: upstream transport, HTTP status and decoding failures
//! - **Configuration Errors**: invalid settings detected at startup
//! - **Internal Errors**: invariant violations inside the service
//!
//! Absence ("not found") is never an error: catalog lookups return
//! `Ok(None)` and callers filter those out.
//!
//! # Usage
//!
//! ```rust
//! use pokedex_search::errors::{AppError, AppResult};
//!
//! async fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for catalog client Results
pub type CatalogResult<T> = Result<T, CatalogError>;
