//! On-disk layout of downloaded episodes.
//!
//! Episodes land at `<root>/<SanitizedTitle>/<Title>_ep<N>_<sub|dub>.mp4`.

use std::path::{Path, PathBuf};

use super::types::EpisodeKind;

/// Extension of every downloaded episode.
pub const EPISODE_EXTENSION: &str = "mp4";

const FALLBACK_NAME: &str = "untitled";

/// Characters rejected by at least one common filesystem.
fn is_reserved(c: char) -> bool {
    matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control()
}

/// Turn a catalog title into a directory name.
///
/// Reserved characters are dropped, runs of whitespace collapse to one
/// space, and leading/trailing dots and spaces are trimmed.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title.chars().filter(|c| !is_reserved(*c)).collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches(|c: char| c == '.' || c.is_whitespace());

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Filename for one episode: `<Title>_ep<N>_<sub|dub>.mp4`.
///
/// Spaces and colons are stripped from the title, along with anything else
/// that cannot appear in a filename.
#[must_use]
pub fn episode_filename(title: &str, episode: u32, kind: EpisodeKind) -> String {
    let stem: String = title
        .chars()
        .filter(|c| !c.is_whitespace() && !is_reserved(*c))
        .collect();
    let stem = if stem.is_empty() {
        FALLBACK_NAME
    } else {
        stem.as_str()
    };
    format!("{stem}_ep{episode}_{}.{EPISODE_EXTENSION}", kind.as_str())
}

/// Directory holding every episode of `title`.
#[must_use]
pub fn title_dir(root: &Path, title: &str) -> PathBuf {
    root.join(sanitize_title(title))
}

/// Full path of one downloaded episode.
#[must_use]
pub fn episode_path(root: &Path, title: &str, episode: u32, kind: EpisodeKind) -> PathBuf {
    title_dir(root, title).join(episode_filename(title, episode, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_strips_spaces_and_colons() {
        assert_eq!(
            episode_filename("Re:Zero Starting Life", 3, EpisodeKind::Sub),
            "ReZeroStartingLife_ep3_sub.mp4"
        );
        assert_eq!(
            episode_filename("Attack on Titan: Final", 12, EpisodeKind::Dub),
            "AttackonTitanFinal_ep12_dub.mp4"
        );
    }

    #[test]
    fn filename_never_contains_separators() {
        let name = episode_filename("Fate/stay night", 1, EpisodeKind::Sub);
        assert_eq!(name, "Fatestaynight_ep1_sub.mp4");
        assert!(!name.contains('/'));
    }

    #[test]
    fn sanitize_keeps_readable_directory_name() {
        assert_eq!(sanitize_title("Re:Zero  Starting Life"), "ReZero Starting Life");
        assert_eq!(sanitize_title("  ..Hidden.. "), "Hidden");
        assert_eq!(sanitize_title("???"), "untitled");
    }

    #[test]
    fn episode_path_nests_under_title_directory() {
        let path = episode_path(Path::new("/videos"), "One Piece", 1071, EpisodeKind::Sub);
        assert_eq!(
            path,
            PathBuf::from("/videos/One Piece/OnePiece_ep1071_sub.mp4")
        );
    }

    #[test]
    fn empty_title_falls_back() {
        assert_eq!(episode_filename(" : ", 1, EpisodeKind::Dub), "untitled_ep1_dub.mp4");
    }
}
