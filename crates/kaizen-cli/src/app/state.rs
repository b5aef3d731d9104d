//! Application state and the event loop's `update` function.
//!
//! `update` handles exactly one message and returns the side effects it
//! wants performed. It never blocks and performs no I/O of its own; the
//! only outside call it makes is into the non-blocking download port.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use kaizen_core::download::{episode_filename, title_dir};
use kaizen_core::{
    Anime, CatalogError, CatalogResult, DownloadControlPort, DownloadRequest, EpisodeKind,
    PlayerError, SearchQuery,
};

use super::cursor::{Cursor, PAGE_STEP};
use super::downloads::DownloadPanel;
use super::focus::{Focus, FocusState, FocusTarget};
use super::keymap::{Action, action_for};
use super::msg::{Command, EpisodeRef, LinkTarget, Msg};

/// Columns lost to the outer margin.
pub const WINDOW_MARGIN: u16 = 7;

/// Smallest usable window.
pub const MIN_WIDTH: u16 = 100;
pub const MIN_HEIGHT: u16 = 40;

/// Shown when the resolver has no link for an episode.
pub const NO_LINK_NOTICE: &str = "no link found";

/// Top-level tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    WatchAnime,
    About,
}

impl Tab {
    pub const ALL: [Self; 2] = [Self::WatchAnime, Self::About];

    pub const fn title(self) -> &'static str {
        match self {
            Self::WatchAnime => "Watch Anime",
            Self::About => "About",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::WatchAnime => 0,
            Self::About => 1,
        }
    }

    const fn from_index(index: usize) -> Self {
        match index % Self::ALL.len() {
            0 => Self::WatchAnime,
            _ => Self::About,
        }
    }

    const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    const fn previous(self) -> Self {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }
}

/// Search box and results table.
#[derive(Debug, Default)]
pub struct SearchState {
    pub input: String,
    pub loading: bool,
    pub error: Option<String>,
    pub results: Vec<Anime>,
    pub table: Cursor,
}

/// The title picked from the results table and its episode lists.
#[derive(Debug, Clone)]
pub struct Selection {
    pub anime: Anime,
    pub sub: Vec<u32>,
    pub dub: Vec<u32>,
}

impl Selection {
    fn new(anime: Anime) -> Self {
        let sub = anime.episode_numbers(EpisodeKind::Sub);
        let dub = anime.episode_numbers(EpisodeKind::Dub);
        Self { anime, sub, dub }
    }

    pub fn episodes(&self, kind: EpisodeKind) -> &[u32] {
        match kind {
            EpisodeKind::Sub => &self.sub,
            EpisodeKind::Dub => &self.dub,
        }
    }
}

/// Cursors of the four episode lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpisodeCursors {
    pub sub: Cursor,
    pub dub: Cursor,
    pub download_sub: Cursor,
    pub download_dub: Cursor,
}

impl EpisodeCursors {
    fn reset(selection: Option<&Selection>) -> Self {
        let (sub, dub) = selection.map_or((0, 0), |s| (s.sub.len(), s.dub.len()));
        Self {
            sub: Cursor::at_start(sub),
            dub: Cursor::at_start(dub),
            download_sub: Cursor::at_start(sub),
            download_dub: Cursor::at_start(dub),
        }
    }

    fn for_focus(&mut self, focus: Focus) -> Option<&mut Cursor> {
        match focus {
            Focus::SubList => Some(&mut self.sub),
            Focus::DubList => Some(&mut self.dub),
            Focus::DownloadSubList => Some(&mut self.download_sub),
            Focus::DownloadDubList => Some(&mut self.download_dub),
            Focus::Input | Focus::Table | Focus::InfoBox => None,
        }
    }

    const fn get(&self, focus: Focus) -> Option<Cursor> {
        match focus {
            Focus::SubList => Some(self.sub),
            Focus::DubList => Some(self.dub),
            Focus::DownloadSubList => Some(self.download_sub),
            Focus::DownloadDubList => Some(self.download_dub),
            Focus::Input | Focus::Table | Focus::InfoBox => None,
        }
    }
}

/// Values the event loop needs from the composition root.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root of the `<root>/<Title>/<file>` layout.
    pub download_root: PathBuf,
    /// Delay between poll ticks of the download overlay.
    pub poll_interval: Duration,
}

/// Everything the interface renders.
#[derive(Debug)]
pub struct App {
    pub tab: Tab,
    pub focus: FocusState,
    pub show_help: bool,
    pub width: u16,
    pub height: u16,
    pub search: SearchState,
    pub selection: Option<Selection>,
    pub cursors: EpisodeCursors,
    /// First visible line of the description; clamped while rendering.
    pub info_scroll: u16,
    /// One-line message for the status bar.
    pub notice: Option<String>,
    pub downloads: DownloadPanel,
    download_root: PathBuf,
    running: bool,
}

impl App {
    pub fn new(config: AppConfig, downloads: Arc<dyn DownloadControlPort>) -> Self {
        Self {
            tab: Tab::default(),
            focus: FocusState::new(),
            show_help: false,
            width: 0,
            height: 0,
            search: SearchState::default(),
            selection: None,
            cursors: EpisodeCursors::default(),
            info_scroll: 0,
            notice: None,
            downloads: DownloadPanel::new(downloads, config.poll_interval),
            download_root: config.download_root,
            running: true,
        }
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Width left after the outer margin.
    pub const fn usable_width(&self) -> u16 {
        self.width.saturating_sub(WINDOW_MARGIN)
    }

    /// Check if the window is below the minimum size.
    pub const fn is_too_small(&self) -> bool {
        self.usable_width() < MIN_WIDTH || self.height < MIN_HEIGHT
    }

    /// Handle one message.
    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::Key(key) => self.on_key(&key),
            Msg::Resize { width, height } => {
                self.width = width;
                self.height = height;
                Vec::new()
            }
            Msg::SearchFinished(result) => {
                self.on_search_finished(result);
                Vec::new()
            }
            Msg::LinkResolved { target, result } => self.on_link_resolved(target, result),
            Msg::PlaybackFinished(result) => {
                self.on_playback_finished(result);
                Vec::new()
            }
            Msg::PollTick(session) => self.downloads.on_poll_tick(session).into_iter().collect(),
        }
    }

    fn quit(&mut self) -> Vec<Command> {
        self.running = false;
        vec![Command::Quit]
    }

    fn on_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        let Some(action) = action_for(key, self.focus.focus()) else {
            return Vec::new();
        };

        if self.is_too_small() {
            return if action == Action::Quit {
                self.quit()
            } else {
                Vec::new()
            };
        }

        if self.show_help {
            if matches!(action, Action::Quit | Action::ToggleHelp) {
                self.show_help = false;
            }
            return Vec::new();
        }

        match action {
            Action::Quit => return self.quit(),
            Action::NextTab => self.tab = self.tab.next(),
            Action::PrevTab => self.tab = self.tab.previous(),
            Action::ToggleHelp => self.show_help = true,
            _ if self.tab != Tab::WatchAnime => {}
            Action::Focus(target) => self.focus.jump(target),
            Action::TogglePanel => self.focus.toggle_panel(),
            Action::TogglePause => self.downloads.toggle_pause(),
            Action::CancelDownload => self.downloads.cancel(),
            Action::Submit => return self.submit(),
            Action::Insert(c) => self.search.input.push(c),
            Action::DeleteBack => {
                self.search.input.pop();
            }
            Action::Up => self.navigate(-1),
            Action::Down => self.navigate(1),
            Action::PageUp => self.navigate(-PAGE_STEP),
            Action::PageDown => self.navigate(PAGE_STEP),
            Action::Top => self.jump_to_end(false),
            Action::Bottom => self.jump_to_end(true),
        }
        Vec::new()
    }

    fn submit(&mut self) -> Vec<Command> {
        match self.focus.focus() {
            Focus::Input => {
                let Some(query) = SearchQuery::parse(&self.search.input) else {
                    return Vec::new();
                };
                tracing::debug!(target: "kaizen.ui", query = %query.as_str(), "searching");
                self.search.loading = true;
                self.search.error = None;
                self.focus.set(Focus::Table);
                vec![Command::Search(query)]
            }
            Focus::Table => {
                self.select_row();
                Vec::new()
            }
            Focus::InfoBox => Vec::new(),
            focus => self
                .focused_episode(focus)
                .map(|episode| {
                    self.notice = Some(format!("Fetching link for {}…", episode.label()));
                    let target = if focus.is_download_list() {
                        LinkTarget::Download(episode)
                    } else {
                        LinkTarget::Stream(episode)
                    };
                    Command::ResolveLink(target)
                })
                .into_iter()
                .collect(),
        }
    }

    /// Populate the episode lists, the info panel and the download
    /// overlay from the highlighted row.
    fn select_row(&mut self) {
        let Some(anime) = self
            .search
            .table
            .selected()
            .and_then(|row| self.search.results.get(row))
        else {
            return;
        };

        tracing::debug!(target: "kaizen.ui", id = %anime.id, title = %anime.title, "title selected");
        let selection = Selection::new(anime.clone());
        self.cursors = EpisodeCursors::reset(Some(&selection));
        self.selection = Some(selection);
        self.info_scroll = 0;
        self.notice = None;
        self.focus.jump(FocusTarget::SubList);
    }

    fn focused_episode(&self, focus: Focus) -> Option<EpisodeRef> {
        let kind = focus.episode_kind()?;
        let selection = self.selection.as_ref()?;
        let row = self.cursors.get(focus)?.selected()?;
        let episode = *selection.episodes(kind).get(row)?;

        Some(EpisodeRef {
            anime_id: selection.anime.id.clone(),
            title: selection.anime.display_title().to_string(),
            kind,
            episode,
        })
    }

    fn list_len(&self, focus: Focus) -> usize {
        match focus {
            Focus::Table => self.search.results.len(),
            _ => match (focus.episode_kind(), &self.selection) {
                (Some(kind), Some(selection)) => selection.episodes(kind).len(),
                _ => 0,
            },
        }
    }

    fn navigate(&mut self, delta: isize) {
        let focus = self.focus.focus();
        let len = self.list_len(focus);
        match focus {
            Focus::Input => {}
            Focus::Table => self.search.table.step(delta, len),
            Focus::InfoBox => {
                let magnitude = u16::try_from(delta.unsigned_abs()).unwrap_or(u16::MAX);
                self.info_scroll = if delta < 0 {
                    self.info_scroll.saturating_sub(magnitude)
                } else {
                    self.info_scroll.saturating_add(magnitude)
                };
            }
            list => {
                if let Some(cursor) = self.cursors.for_focus(list) {
                    cursor.step(delta, len);
                }
            }
        }
    }

    fn jump_to_end(&mut self, bottom: bool) {
        let focus = self.focus.focus();
        let len = self.list_len(focus);
        let cursor = match focus {
            Focus::Input => return,
            Focus::InfoBox => {
                self.info_scroll = if bottom { u16::MAX } else { 0 };
                return;
            }
            Focus::Table => Some(&mut self.search.table),
            list => self.cursors.for_focus(list),
        };
        if let Some(cursor) = cursor {
            if bottom {
                cursor.last(len);
            } else {
                cursor.first(len);
            }
        }
    }

    fn on_search_finished(&mut self, result: CatalogResult<Vec<Anime>>) {
        self.search.loading = false;
        match result {
            Ok(results) => {
                tracing::debug!(target: "kaizen.ui", count = results.len(), "search finished");
                self.search.error = results
                    .is_empty()
                    .then(|| "No results found".to_string());
                self.search.table = Cursor::at_start(results.len());
                self.search.results = results;
                self.selection = None;
                self.cursors = EpisodeCursors::reset(None);
                self.info_scroll = 0;
            }
            Err(err) => {
                tracing::warn!(target: "kaizen.ui", error = %err, "search failed");
                self.search.error = Some(err.to_string());
            }
        }
    }

    fn on_link_resolved(
        &mut self,
        target: LinkTarget,
        result: CatalogResult<String>,
    ) -> Vec<Command> {
        let url = match result {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(
                    target: "kaizen.ui",
                    episode = %target.episode().label(),
                    error = %err,
                    "stream link unavailable"
                );
                self.notice = Some(match err {
                    CatalogError::NoStreamLink { .. } => NO_LINK_NOTICE.to_string(),
                    other => other.to_string(),
                });
                return Vec::new();
            }
        };

        match target {
            LinkTarget::Stream(episode) => {
                self.notice = Some(format!("Playing {}", episode.label()));
                vec![Command::Play(url)]
            }
            LinkTarget::Download(episode) => {
                self.notice = None;
                let request = DownloadRequest::new(
                    url,
                    title_dir(&self.download_root, &episode.title),
                    episode_filename(&episode.title, episode.episode, episode.kind),
                );
                vec![self.downloads.start(request, episode.label())]
            }
        }
    }

    fn on_playback_finished(&mut self, result: Result<(), PlayerError>) {
        match result {
            Ok(()) => self.notice = None,
            Err(err) => {
                tracing::warn!(target: "kaizen.ui", error = %err, "playback failed");
                self.notice = Some(err.to_string());
            }
        }
    }
}
