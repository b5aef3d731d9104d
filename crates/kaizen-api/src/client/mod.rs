//! Catalog client for searching titles and resolving stream links.

mod search;
mod stream;

use crate::config::ApiClientConfig;
use crate::error::ApiResult;
use crate::http::{HttpBackend, ReqwestBackend};

/// Default catalog client using the reqwest HTTP backend.
pub type DefaultApiClient = ApiClient<ReqwestBackend>;

/// Client for the anime catalog API.
///
/// Generic over an HTTP backend so request logic can be tested without a
/// network. Use [`DefaultApiClient`] in production and talk to it through
/// the `CatalogPort` trait.
#[derive(Debug)]
pub struct ApiClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) base_url: String,
}

impl DefaultApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &ApiClientConfig) -> ApiResult<Self> {
        let backend = ReqwestBackend::new(config)?;
        Ok(Self {
            backend,
            base_url: config.base_url.clone(),
        })
    }
}

impl<B: HttpBackend> ApiClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) fn with_backend(base_url: &str, backend: B) -> Self {
        Self {
            backend,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}
