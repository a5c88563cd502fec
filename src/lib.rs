//! Paginated Pokédex search over a remote catalog
//!
//! The crate answers search requests by combining three strategies (category
//! filter, name search, native paging) into one page of fully detailed
//! entries, fetching through a TTL cache and a bounded fan-out so the
//! upstream catalog is never hit redundantly or without limit.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod sources;
pub mod utils;
pub mod web;
