//! Wire types of the catalog API.
//!
//! The search endpoint has answered in two shapes over time: full objects
//! and positional rows `[id, title, subCount, dubCount]`. Both are accepted.

use serde::Deserialize;
use serde_json::Value;

use kaizen_core::Anime;

/// Body of `GET <base>/search/<query>`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result: Vec<SearchEntry>,
}

/// One search hit, in either shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchEntry {
    Row(Vec<Value>),
    Record(Anime),
}

/// Body of `GET <base>/search/<id>/<kind>/<episode>`.
#[derive(Debug, Deserialize)]
pub struct StreamResponse {
    #[serde(default)]
    pub direct: String,
}

impl SearchEntry {
    /// Convert to the domain type. Rows without an id or title are rejected.
    pub fn into_anime(self) -> Result<Anime, String> {
        match self {
            Self::Record(anime) => Ok(anime),
            Self::Row(row) => {
                let text = |i: usize| row.get(i).and_then(Value::as_str).map(str::to_string);
                let count = |i: usize| row.get(i).map_or(0, count_of);

                let id = text(0).ok_or_else(|| format!("row without id: {row:?}"))?;
                let title = text(1).ok_or_else(|| format!("row without title: {row:?}"))?;
                Ok(Anime {
                    id,
                    title,
                    sub_count: count(2),
                    dub_count: count(3),
                    ..Anime::default()
                })
            }
        }
    }
}

/// Episode counts arrive as integers, floats or numeric strings.
fn count_of(value: &Value) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let from_float = |f: f64| if f.is_finite() && f > 0.0 { f as u32 } else { 0 };

    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .or_else(|| n.as_f64().map(from_float))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_positional_rows() {
        let body = json!({"result": [["abc123", "One Piece", 1071, 1050.0]]});
        let response: SearchResponse = serde_json::from_value(body).unwrap();
        let anime = response
            .result
            .into_iter()
            .next()
            .unwrap()
            .into_anime()
            .unwrap();

        assert_eq!(anime.id, "abc123");
        assert_eq!(anime.title, "One Piece");
        assert_eq!(anime.sub_count, 1071);
        assert_eq!(anime.dub_count, 1050);
    }

    #[test]
    fn parses_object_entries() {
        let body = json!({"result": [{
            "id": "xyz",
            "title": "Frieren",
            "subCount": 28,
            "dubCount": 0,
            "episodes": {"sub": ["1", "2"], "dub": []},
            "type": "TV"
        }]});
        let response: SearchResponse = serde_json::from_value(body).unwrap();
        let anime = response
            .result
            .into_iter()
            .next()
            .unwrap()
            .into_anime()
            .unwrap();

        assert_eq!(anime.title, "Frieren");
        assert_eq!(anime.sub_count, 28);
        assert_eq!(anime.kind, "TV");
    }

    #[test]
    fn rejects_rows_without_title() {
        let entry = SearchEntry::Row(vec![json!("id-only")]);
        assert!(entry.into_anime().is_err());
    }

    #[test]
    fn missing_fields_default() {
        let response: SearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.result.is_empty());
        let stream: StreamResponse = serde_json::from_value(json!({})).unwrap();
        assert!(stream.direct.is_empty());
    }

    #[test]
    fn counts_accept_strings_and_garbage() {
        assert_eq!(count_of(&json!("12")), 12);
        assert_eq!(count_of(&json!(-3)), 0);
        assert_eq!(count_of(&json!(null)), 0);
    }
}
