//! Catalog domain types: anime entries as returned by the search API.

use serde::{Deserialize, Serialize};

use crate::download::EpisodeKind;

/// Episode identifiers per audio track, as listed by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Episodes {
    /// Subbed episode identifiers (usually "1", "2", ...).
    pub sub: Vec<String>,
    /// Dubbed episode identifiers.
    pub dub: Vec<String>,
}

/// One catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Anime {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub sub_count: u32,
    pub dub_count: u32,
    pub episodes: Episodes,
    pub english_name: String,
    pub description: String,
    pub genres: Vec<String>,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rating: String,
    pub score: f64,
}

impl Anime {
    /// Number of episodes available for a track.
    #[must_use]
    pub fn episode_count(&self, kind: EpisodeKind) -> u32 {
        match kind {
            EpisodeKind::Sub => self.sub_count,
            EpisodeKind::Dub => self.dub_count,
        }
    }

    /// Episode numbers for a track, in catalog order.
    ///
    /// Uses the explicit episode list when present, falling back to
    /// `1..=count`. Identifiers that are not plain numbers are skipped.
    #[must_use]
    pub fn episode_numbers(&self, kind: EpisodeKind) -> Vec<u32> {
        let listed = match kind {
            EpisodeKind::Sub => &self.episodes.sub,
            EpisodeKind::Dub => &self.episodes.dub,
        };

        if listed.is_empty() {
            return (1..=self.episode_count(kind)).collect();
        }

        listed
            .iter()
            .filter_map(|ep| ep.trim().parse::<u32>().ok())
            .collect()
    }

    /// Title to display, falling back to the English name.
    #[must_use]
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.english_name
        } else {
            &self.title
        }
    }
}

/// A normalized search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Trim the raw input; `None` when nothing is left.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The query as typed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The query as a path segment: spaces become `+`.
    #[must_use]
    pub fn to_path_segment(&self) -> String {
        self.0.split_whitespace().collect::<Vec<_>>().join("+")
    }
}
