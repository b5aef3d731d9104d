//! Catalog API client for kaizen.
//!
//! Searches the anime catalog and resolves direct stream links. The client
//! is meant to be used through the [`kaizen_core::CatalogPort`] trait.

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::{ApiClient, DefaultApiClient};

// Configuration
pub use config::ApiClientConfig;

// Errors (for construction failures)
pub use error::{ApiError, ApiResult};

// Backend trait, so callers can name `ApiClient<B>` bounds
pub use http::HttpBackend;
