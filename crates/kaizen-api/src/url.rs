//! URL construction for the catalog API.

use url::Url;

use kaizen_core::{EpisodeKind, SearchQuery};

use crate::error::ApiResult;

/// `<base>/search/<query>`, with each word percent-encoded and joined by `+`.
pub fn build_search_url(base_url: &str, query: &SearchQuery) -> ApiResult<Url> {
    let segment = query
        .as_str()
        .split_whitespace()
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+");
    Ok(Url::parse(&format!("{base_url}/search/{segment}"))?)
}

/// `<base>/search/<id>/<sub|dub>/<episode>`.
pub fn build_stream_url(
    base_url: &str,
    id: &str,
    kind: EpisodeKind,
    episode: u32,
) -> ApiResult<Url> {
    Ok(Url::parse(&format!(
        "{base_url}/search/{}/{kind}/{episode}",
        urlencoding::encode(id)
    ))?)
}
