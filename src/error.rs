//! Error types for fitpage
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Two smaller error types describe failures reported by collaborators:
//! [`FetchError`] for a single page fetch and [`ClearError`] for a single
//! cache clear. They travel inside [`Error`] unchanged so callers can always
//! get at the underlying cause.

use crate::types::ResourceArea;
use std::fmt;
use thiserror::Error;

/// The main error type for fitpage
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Request Validation Errors
    // ============================================================================
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Fetching page {page} failed: {source}")]
    PageFetch {
        page: u32,
        #[source]
        source: FetchError,
    },

    // ============================================================================
    // Cache Errors
    // ============================================================================
    #[error(
        "{} resource area(s) failed to clear: {}",
        .failures.len(),
        .failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    CacheClear { failures: Vec<ClearFailure> },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wrap a fetch failure with the page number it happened on
    pub fn page_fetch(page: u32, source: FetchError) -> Self {
        Self::PageFetch { page, source }
    }

    /// The underlying fetch failure, if this error came from a page fetch
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            Error::Fetch(e) | Error::PageFetch { source: e, .. } => Some(e),
            _ => None,
        }
    }

    /// Page number that failed during a fetch-all, if known
    pub fn failed_page(&self) -> Option<u32> {
        match self {
            Error::PageFetch { page, .. } => Some(*page),
            _ => None,
        }
    }

    /// Check if this error is a not-found signal from the fetcher
    pub fn is_not_found(&self) -> bool {
        matches!(self.fetch_error(), Some(FetchError::NotFound { .. }))
    }

    /// Check if this error is an authorization failure from the fetcher
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.fetch_error(), Some(FetchError::Unauthorized { .. }))
    }

    /// Areas that failed to clear, if this is an aggregate cache error
    pub fn failed_areas(&self) -> Vec<ResourceArea> {
        match self {
            Error::CacheClear { failures } => failures.iter().map(|f| f.area).collect(),
            _ => Vec::new(),
        }
    }
}

/// Result type alias for fitpage
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Fetch Errors
// ============================================================================

/// Failure reported by a page fetcher for a single page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The parent resource does not exist at all
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Credentials are invalid or have been revoked
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Failed to decode page: {message}")]
    Decode { message: String },
}

impl FetchError {
    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Check if retrying the same page could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::RateLimited { .. } | FetchError::Transport { .. } => true,
            FetchError::Http { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

// ============================================================================
// Cache Clear Errors
// ============================================================================

/// Failure reported by a single resource cache when asked to clear
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ClearError {
    pub message: String,
}

impl ClearError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One resource area that failed during a cache fan-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearFailure {
    pub area: ResourceArea,
    pub error: ClearError,
}

impl fmt::Display for ClearFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.area, self.error)
    }
}
