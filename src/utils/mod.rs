//! Utility modules for the Pokédex search service
//!
//! This module contains reusable utilities that can be used
//! across different parts of the system.

pub mod id_normalizer;
pub mod jitter;
pub mod retry;

// Re-export commonly used types for convenience
pub use id_normalizer::{RawId, normalize_ids};
pub use retry::{RetryConfig, with_retry};
