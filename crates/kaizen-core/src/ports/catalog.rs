//! Catalog port: searching titles and resolving stream links.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{Anime, SearchQuery};
use crate::download::EpisodeKind;

/// Errors from catalog operations.
///
/// Implementation-specific errors (HTTP, JSON) are mapped to these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Nothing exists at the requested id/episode.
    #[error("Not found: {what}")]
    NotFound {
        /// What was looked up.
        what: String,
    },

    /// The API asked us to slow down.
    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    /// Network or connectivity error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
    },

    /// The API answered with something we could not use.
    #[error("Invalid API response: {message}")]
    InvalidResponse {
        /// What was invalid
        message: String,
    },

    /// The resolver answered but had no link for this episode.
    #[error("No stream link for {id} {kind} episode {episode}")]
    NoStreamLink {
        /// Catalog id.
        id: String,
        /// Audio track.
        kind: EpisodeKind,
        /// Episode number.
        episode: u32,
    },

    /// Configuration error (bad base URL).
    #[error("Configuration error: {message}")]
    Configuration {
        /// What's wrong with the configuration
        message: String,
    },
}

/// Result type alias for catalog port operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Port trait for the remote anime catalog.
///
/// The implementation lives in `kaizen-api`.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Search the catalog by title.
    async fn search(&self, query: &SearchQuery) -> CatalogResult<Vec<Anime>>;

    /// Resolve a direct media URL for one episode.
    ///
    /// Never returns an empty string; a missing link is
    /// [`CatalogError::NoStreamLink`].
    async fn stream_link(&self, id: &str, kind: EpisodeKind, episode: u32)
    -> CatalogResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // Verify the trait is object-safe
    fn _assert_object_safe(_: Arc<dyn CatalogPort>) {}

    #[test]
    fn no_stream_link_message_names_episode() {
        let err = CatalogError::NoStreamLink {
            id: "abc".to_string(),
            kind: EpisodeKind::Dub,
            episode: 4,
        };
        assert_eq!(err.to_string(), "No stream link for abc dub episode 4");
    }
}
