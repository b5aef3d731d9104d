//! Port trait implementation for `ApiClient`.
//!
//! Implements the core-owned `CatalogPort` and maps internal errors to
//! `CatalogError`.

use async_trait::async_trait;

use kaizen_core::{Anime, CatalogError, CatalogPort, CatalogResult, EpisodeKind, SearchQuery};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpBackend;

/// Convert internal `ApiError` to core `CatalogError`.
fn map_error(err: ApiError) -> CatalogError {
    match err {
        ApiError::RequestFailed { status, url } => match status {
            404 => CatalogError::NotFound { what: url },
            429 => CatalogError::RateLimited,
            _ => CatalogError::Network {
                message: format!("API request failed with status {status}: {url}"),
            },
        },
        ApiError::InvalidResponse { message } => CatalogError::InvalidResponse { message },
        ApiError::Network(e) => CatalogError::Network {
            message: e.to_string(),
        },
        ApiError::InvalidUrl(e) => CatalogError::Configuration {
            message: e.to_string(),
        },
        ApiError::JsonParse(e) => CatalogError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

#[async_trait]
impl<B: HttpBackend> CatalogPort for ApiClient<B> {
    async fn search(&self, query: &SearchQuery) -> CatalogResult<Vec<Anime>> {
        self.search_titles(query).await.map_err(map_error)
    }

    async fn stream_link(
        &self,
        id: &str,
        kind: EpisodeKind,
        episode: u32,
    ) -> CatalogResult<String> {
        self.resolve_stream(id, kind, episode)
            .await
            .map_err(map_error)?
            .ok_or_else(|| CatalogError::NoStreamLink {
                id: id.to_string(),
                kind,
                episode,
            })
    }
}
