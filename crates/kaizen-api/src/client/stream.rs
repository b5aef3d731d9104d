//! Stream link resolution.

use kaizen_core::EpisodeKind;

use crate::error::ApiResult;
use crate::http::HttpBackend;
use crate::models::StreamResponse;
use crate::url::build_stream_url;

use super::ApiClient;

impl<B: HttpBackend> ApiClient<B> {
    /// Resolve the direct media URL of one episode.
    ///
    /// Returns `None` when the API answered without a link.
    pub(crate) async fn resolve_stream(
        &self,
        id: &str,
        kind: EpisodeKind,
        episode: u32,
    ) -> ApiResult<Option<String>> {
        let url = build_stream_url(&self.base_url, id, kind, episode)?;
        tracing::debug!(target: "kaizen.api", url = %url, "resolving stream link");

        let response: StreamResponse = self.backend.get_json(&url).await?;
        let link = response.direct.trim();
        Ok((!link.is_empty()).then(|| link.to_string()))
    }
}
