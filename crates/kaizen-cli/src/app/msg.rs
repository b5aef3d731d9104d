//! Messages into the event loop and commands out of it.

use std::time::Duration;

use crossterm::event::KeyEvent;
use kaizen_core::{Anime, CatalogResult, EpisodeKind, PlayerError, SearchQuery, SessionId};

/// One episode of one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRef {
    /// Catalog id of the title.
    pub anime_id: String,
    /// Display title, used for the download directory and filename.
    pub title: String,
    pub kind: EpisodeKind,
    pub episode: u32,
}

impl EpisodeRef {
    /// Short label, e.g. `Frieren episode 3 (sub)`.
    pub fn label(&self) -> String {
        format!("{} episode {} ({})", self.title, self.episode, self.kind)
    }
}

/// Why a stream link is being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Hand the link to the media player.
    Stream(EpisodeRef),
    /// Start a download session with the link.
    Download(EpisodeRef),
}

impl LinkTarget {
    pub const fn episode(&self) -> &EpisodeRef {
        match self {
            Self::Stream(episode) | Self::Download(episode) => episode,
        }
    }
}

/// Input to [`App::update`](super::App::update).
#[derive(Debug)]
pub enum Msg {
    /// A key press from the terminal.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize { width: u16, height: u16 },
    /// A search started by [`Command::Search`] finished.
    SearchFinished(CatalogResult<Vec<Anime>>),
    /// A link requested by [`Command::ResolveLink`] was resolved.
    LinkResolved {
        target: LinkTarget,
        result: CatalogResult<String>,
    },
    /// The media player exited.
    PlaybackFinished(Result<(), PlayerError>),
    /// Poll timer for a download session fired.
    PollTick(SessionId),
}

/// Side effects requested by the event loop.
///
/// The runtime performs each one and reports back with a [`Msg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Query the catalog.
    Search(SearchQuery),
    /// Resolve a direct media URL for one episode.
    ResolveLink(LinkTarget),
    /// Launch the media player on a URL.
    Play(String),
    /// Deliver [`Msg::PollTick`] for `session` after `delay`.
    SchedulePoll { session: SessionId, delay: Duration },
    /// Leave the event loop.
    Quit,
}
