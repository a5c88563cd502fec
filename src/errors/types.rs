//! Error type definitions for the Pokédex search service
//!
//! This module defines all error types used throughout the application,
//! providing a hierarchical error system that keeps "not found" out of the
//! error path entirely: absence is always `Ok(None)`, so anything that lands
//! here is a genuine failure.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Catalog (upstream) failures
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Catalog client errors
///
/// Payloads are plain strings so the error is `Clone`: a failed cache
/// population hands the same error to every caller waiting on that key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Connection-level failures (DNS, refused, reset)
    #[error("Transport error: {url} - {message}")]
    Transport { url: String, message: String },

    /// Request exceeded the configured timeout
    #[error("Request timeout: {url}")]
    Timeout { url: String },

    /// Non-success HTTP status other than 404
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Parse error: {resource} - {message}")]
    Parse { resource: String, message: String },

    /// Base URL or path could not be turned into a request URL
    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl CatalogError {
    /// Create a parse error for a catalog resource
    pub fn parse<R: Into<String>, M: Into<String>>(resource: R, message: M) -> Self {
        Self::Parse {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Map a reqwest failure to the matching catalog error
    pub fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::Http {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else if error.is_decode() {
            Self::parse(url, error.to_string())
        } else {
            Self::Transport {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }

    /// Whether the failure is worth retrying
    ///
    /// Transport errors, timeouts, rate limiting and server errors are
    /// transient; client errors and undecodable bodies are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Parse { .. } | Self::InvalidUrl { .. } => false,
        }
    }
}
