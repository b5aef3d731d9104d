//! Focus state machine of the Watch Anime tab.
//!
//! Focus moves only on dedicated keys (`!`, `@`, `#`, `$`, `%`, `ctrl+d`)
//! and on the few `enter` transitions the event loop performs. `#` and `$`
//! name "the sub list" and "the dub list" of whichever side panel is open:
//! the main episode lists next to the info panel, or the download lists
//! inside the download overlay.

use kaizen_core::EpisodeKind;

/// Component receiving keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Search input.
    #[default]
    Input,
    /// Search results table.
    Table,
    /// Sub episodes, streamed on enter.
    SubList,
    /// Dub episodes, streamed on enter.
    DubList,
    /// Info panel (scrolls the description).
    InfoBox,
    /// Sub episodes of the download overlay.
    DownloadSubList,
    /// Dub episodes of the download overlay.
    DownloadDubList,
}

impl Focus {
    /// Audio track of a focused episode list.
    pub const fn episode_kind(self) -> Option<EpisodeKind> {
        match self {
            Self::SubList | Self::DownloadSubList => Some(EpisodeKind::Sub),
            Self::DubList | Self::DownloadDubList => Some(EpisodeKind::Dub),
            Self::Input | Self::Table | Self::InfoBox => None,
        }
    }

    /// Check if this is one of the download overlay lists.
    pub const fn is_download_list(self) -> bool {
        matches!(self, Self::DownloadSubList | Self::DownloadDubList)
    }
}

/// What the right-hand panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidePanel {
    /// Title details.
    #[default]
    Info,
    /// Episode pickers, progress gauge and status.
    Download,
}

/// Targets of the focus keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// `!`
    Input,
    /// `@`
    Table,
    /// `#`
    SubList,
    /// `$`
    DubList,
    /// `%`
    Panel,
}

/// Current focus and side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusState {
    focus: Focus,
    panel: SidePanel,
}

impl FocusState {
    /// Focus on the search input with the info panel open.
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn focus(self) -> Focus {
        self.focus
    }

    pub const fn panel(self) -> SidePanel {
        self.panel
    }

    /// Apply a focus key.
    pub const fn jump(&mut self, target: FocusTarget) {
        self.focus = match (target, self.panel) {
            (FocusTarget::Input, _) => Focus::Input,
            (FocusTarget::Table, _) => Focus::Table,
            (FocusTarget::SubList, SidePanel::Info) => Focus::SubList,
            (FocusTarget::DubList, SidePanel::Info) => Focus::DubList,
            (FocusTarget::Panel, SidePanel::Info) => Focus::InfoBox,
            (FocusTarget::SubList | FocusTarget::Panel, SidePanel::Download) => {
                Focus::DownloadSubList
            }
            (FocusTarget::DubList, SidePanel::Download) => Focus::DownloadDubList,
        };
    }

    /// Swap the info panel and the download overlay (`ctrl+d`).
    ///
    /// A focused list keeps its track across the swap; the info panel hands
    /// focus to the download sub list.
    pub const fn toggle_panel(&mut self) {
        match self.panel {
            SidePanel::Info => {
                self.panel = SidePanel::Download;
                self.focus = match self.focus {
                    Focus::SubList | Focus::InfoBox => Focus::DownloadSubList,
                    Focus::DubList => Focus::DownloadDubList,
                    other => other,
                };
            }
            SidePanel::Download => {
                self.panel = SidePanel::Info;
                self.focus = match self.focus {
                    Focus::DownloadSubList => Focus::SubList,
                    Focus::DownloadDubList => Focus::DubList,
                    other => other,
                };
            }
        }
    }

    /// Move focus without a key, for `enter` transitions.
    pub const fn set(&mut self, focus: Focus) {
        self.focus = focus;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_input_with_info_panel() {
        let state = FocusState::new();
        assert_eq!(state.focus(), Focus::Input);
        assert_eq!(state.panel(), SidePanel::Info);
    }

    #[test]
    fn focus_keys_follow_key_order() {
        let mut state = FocusState::new();
        state.jump(FocusTarget::Table);
        assert_eq!(state.focus(), Focus::Table);
        state.jump(FocusTarget::SubList);
        assert_eq!(state.focus(), Focus::SubList);
        state.jump(FocusTarget::DubList);
        assert_eq!(state.focus(), Focus::DubList);
        state.jump(FocusTarget::Panel);
        assert_eq!(state.focus(), Focus::InfoBox);
        state.jump(FocusTarget::Input);
        assert_eq!(state.focus(), Focus::Input);
    }

    #[test]
    fn list_keys_target_download_lists_when_overlay_open() {
        let mut state = FocusState::new();
        state.toggle_panel();
        state.jump(FocusTarget::SubList);
        assert_eq!(state.focus(), Focus::DownloadSubList);
        state.jump(FocusTarget::DubList);
        assert_eq!(state.focus(), Focus::DownloadDubList);
        state.jump(FocusTarget::Panel);
        assert_eq!(state.focus(), Focus::DownloadSubList);
    }

    #[test]
    fn toggle_keeps_track_of_focused_list() {
        let mut state = FocusState::new();
        state.jump(FocusTarget::DubList);
        state.toggle_panel();
        assert_eq!(state.panel(), SidePanel::Download);
        assert_eq!(state.focus(), Focus::DownloadDubList);
        state.toggle_panel();
        assert_eq!(state.panel(), SidePanel::Info);
        assert_eq!(state.focus(), Focus::DubList);
    }

    #[test]
    fn toggle_from_info_box_lands_on_download_sub_list() {
        let mut state = FocusState::new();
        state.jump(FocusTarget::Panel);
        state.toggle_panel();
        assert_eq!(state.focus(), Focus::DownloadSubList);
    }

    #[test]
    fn toggle_leaves_input_and_table_alone() {
        let mut state = FocusState::new();
        state.toggle_panel();
        assert_eq!(state.focus(), Focus::Input);
        state.jump(FocusTarget::Table);
        state.toggle_panel();
        assert_eq!(state.focus(), Focus::Table);
    }

    #[test]
    fn episode_kinds() {
        assert_eq!(Focus::SubList.episode_kind(), Some(EpisodeKind::Sub));
        assert_eq!(Focus::DownloadDubList.episode_kind(), Some(EpisodeKind::Dub));
        assert_eq!(Focus::Table.episode_kind(), None);
        assert!(Focus::DownloadSubList.is_download_list());
        assert!(!Focus::SubList.is_download_list());
    }
}
