//! Web handlers module
//!
//! HTTP request handlers organized by domain. Handlers stay thin and
//! delegate to the service layer.

pub mod health;
pub mod index;
pub mod pokedex;
