//! Internal error types for catalog API operations.
//!
//! These errors are internal to `kaizen-api` and are mapped to the core
//! `CatalogError` at the port boundary.

use thiserror::Error;

/// Result type alias for catalog API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors related to catalog API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// API request failed with an HTTP error status.
    #[error("Catalog API request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// API returned a body we could not interpret.
    #[error("Invalid response from catalog API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
