//! Title search.

use kaizen_core::{Anime, SearchQuery};

use crate::error::ApiResult;
use crate::http::HttpBackend;
use crate::models::SearchResponse;
use crate::url::build_search_url;

use super::ApiClient;

impl<B: HttpBackend> ApiClient<B> {
    /// Search titles matching `query`.
    ///
    /// Malformed entries are skipped with a warning rather than failing the
    /// whole search.
    pub(crate) async fn search_titles(&self, query: &SearchQuery) -> ApiResult<Vec<Anime>> {
        let url = build_search_url(&self.base_url, query)?;
        tracing::debug!(target: "kaizen.api", url = %url, "searching catalog");

        let response: SearchResponse = self.backend.get_json(&url).await?;
        let results: Vec<Anime> = response
            .result
            .into_iter()
            .filter_map(|entry| match entry.into_anime() {
                Ok(anime) => Some(anime),
                Err(reason) => {
                    tracing::warn!(target: "kaizen.api", %reason, "skipping search entry");
                    None
                }
            })
            .collect();

        tracing::debug!(
            target: "kaizen.api",
            query = query.as_str(),
            count = results.len(),
            "search finished"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::ApiClient;
    use crate::error::ApiError;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use kaizen_core::SearchQuery;
    use serde_json::json;

    const BASE: &str = "https://api.test/anime";

    #[tokio::test]
    async fn search_builds_url_and_parses_rows() {
        let backend = FakeBackend::new().with_response(
            "/search/one+piece",
            CannedResponse::Json(json!({"result": [
                ["id1", "One Piece", 1100, 1080],
                ["id2", "One Piece Film: Red", 1, 1],
                ["broken"]
            ]})),
        );
        let client = ApiClient::with_backend(BASE, backend);

        let query = SearchQuery::parse("one piece").unwrap();
        let results = client.search_titles(&query).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "One Piece");
        assert_eq!(results[1].id, "id2");
        assert_eq!(
            client.backend.requested(),
            vec!["https://api.test/anime/search/one+piece".to_string()]
        );
    }

    #[tokio::test]
    async fn search_propagates_http_errors() {
        let client = ApiClient::with_backend(
            BASE,
            FakeBackend::new().with_response("/search/", CannedResponse::Status(503)),
        );
        let query = SearchQuery::parse("bleach").unwrap();

        let err = client.search_titles(&query).await.unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { status: 503, .. }));
    }

    #[tokio::test]
    async fn search_with_no_hits_is_empty() {
        let client = ApiClient::with_backend(
            BASE,
            FakeBackend::new().with_response("/search/", CannedResponse::Json(json!({"result": []}))),
        );
        let query = SearchQuery::parse("zzzz").unwrap();
        assert!(client.search_titles(&query).await.unwrap().is_empty());
    }
}
