//! Rendering. Pure functions of [`App`] except for clamping the info
//! panel's scroll offset to its content.

use std::str::FromStr;

use kaizen_core::{Anime, EpisodeKind, Settings};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Cell, Clear, Gauge, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    Tabs, Wrap,
};

use super::cursor::Cursor;
use super::focus::{Focus, SidePanel};
use super::state::{App, MIN_HEIGHT, MIN_WIDTH, Tab, WINDOW_MARGIN};

const PLACEHOLDER: &str = "search your anime";
const LOADING: &str = "Searching for results...";
const TITLE_LIMIT: usize = 51;
const NOTICE_LIMIT: usize = 80;
const DOWNLOAD_HINTS: &str = "ctrl+p pause/resume · ctrl+x cancel";
const STATUS_HINTS: &str = "? help · tab switch tabs · esc quit";

/// Border and highlight colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub active: Color,
    pub inactive: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            active: Color::Rgb(0x5f, 0x5f, 0xd7),
            inactive: Color::Rgb(0x58, 0x58, 0x58),
            accent: Color::Rgb(0x00, 0xaf, 0xaf),
        }
    }
}

impl Theme {
    /// Colors from settings; unparsable values keep the default.
    pub fn from_settings(settings: &Settings) -> Self {
        let defaults = Self::default();
        Self {
            active: parse_color(settings.focus_active_color.as_deref(), defaults.active),
            inactive: parse_color(settings.focus_inactive_color.as_deref(), defaults.inactive),
            accent: parse_color(settings.accent_color.as_deref(), defaults.accent),
        }
    }

    fn border(self, focused: bool) -> Style {
        Style::default().fg(if focused { self.active } else { self.inactive })
    }

    fn highlight(self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}

fn parse_color(value: Option<&str>, fallback: Color) -> Color {
    match value.map(Color::from_str) {
        Some(Ok(color)) => color,
        Some(Err(_)) => {
            tracing::warn!(target: "kaizen.ui", value = ?value, "ignoring unparsable color");
            fallback
        }
        None => fallback,
    }
}

/// Draw one frame.
pub fn render(frame: &mut Frame, app: &mut App, theme: &Theme) {
    let area = frame.area();
    if app.is_too_small() {
        render_size_error(frame, area, app);
        return;
    }

    let area = area.inner(Margin::new(WINDOW_MARGIN / 2, 0));
    let [tabs_area, body, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_tabs(frame, tabs_area, app.tab, theme);
    match app.tab {
        Tab::WatchAnime => render_watch(frame, body, app, theme),
        Tab::About => render_about(frame, body, theme),
    }
    render_status(frame, status, app);

    if app.show_help {
        render_help(frame, area, theme);
    }
}

fn render_size_error(frame: &mut Frame, area: Rect, app: &App) {
    let text = format!(
        "Minimum window size is not met.\n\
         minimum size = {MIN_WIDTH}x{MIN_HEIGHT}, current size = {}x{}\n\
         Please resize the window to either full screen or reduce the text size of the window",
        app.usable_width(),
        app.height
    );
    let [middle] = Layout::vertical([Constraint::Length(5)])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Red)),
        middle,
    );
}

fn render_tabs(frame: &mut Frame, area: Rect, tab: Tab, theme: &Theme) {
    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
        .select(tab.index())
        .highlight_style(theme.highlight())
        .block(Block::bordered().border_style(theme.border(false)));
    frame.render_widget(tabs, area);
}

fn render_watch(frame: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
    let [input, table, lists] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(12),
    ])
    .areas(left);

    render_input(frame, input, app, theme);
    render_results(frame, table, app, theme);

    let [sub, dub] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(lists);
    let focus = app.focus.focus();
    let selection = app.selection.as_ref();
    let episodes = |kind: EpisodeKind| selection.map_or(&[][..], |s| s.episodes(kind));
    render_episodes(
        frame,
        sub,
        "Sub",
        episodes(EpisodeKind::Sub),
        app.cursors.sub,
        focus == Focus::SubList,
        theme,
    );
    render_episodes(
        frame,
        dub,
        "Dub",
        episodes(EpisodeKind::Dub),
        app.cursors.dub,
        focus == Focus::DubList,
        theme,
    );

    match app.focus.panel() {
        SidePanel::Info => render_info(frame, right, app, theme),
        SidePanel::Download => render_downloads(frame, right, app, theme),
    }
}

fn render_input(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let focused = app.focus.focus() == Focus::Input;
    let line = if app.search.input.is_empty() {
        Line::styled(PLACEHOLDER, Style::default().fg(theme.inactive))
    } else if focused {
        Line::from(vec![
            Span::raw(app.search.input.as_str()),
            Span::styled("▏", Style::default().fg(theme.accent)),
        ])
    } else {
        Line::raw(app.search.input.as_str())
    };
    frame.render_widget(
        Paragraph::new(line).block(
            Block::bordered()
                .title(" Search ")
                .border_style(theme.border(focused)),
        ),
        area,
    );
}

fn render_results(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let block = Block::bordered()
        .title(" Results ")
        .border_style(theme.border(app.focus.focus() == Focus::Table));

    if app.search.loading || (app.search.error.is_some() && app.search.results.is_empty()) {
        let message = if app.search.loading {
            Line::styled(LOADING, Style::default().fg(theme.accent))
        } else {
            Line::styled(
                app.search.error.clone().unwrap_or_default(),
                Style::default().fg(Color::Red),
            )
        };
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let header = Row::new(["", "Anime Title", "Sub Episodes", "Dub Episodes"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = app.search.results.iter().enumerate().map(|(i, anime)| {
        Row::new([
            Cell::from((i + 1).to_string()),
            Cell::from(anime.display_title().to_string()),
            Cell::from(anime.sub_count.to_string()),
            Cell::from(anime.dub_count.to_string()),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(13),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .row_highlight_style(theme.highlight())
    .block(block);

    let mut state = TableState::default().with_selected(app.search.table.selected());
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_episodes(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    episodes: &[u32],
    cursor: Cursor,
    focused: bool,
    theme: &Theme,
) {
    let items: Vec<ListItem> = episodes
        .iter()
        .map(|n| ListItem::new(format!("Episode {n}")))
        .collect();
    let list = List::new(items)
        .block(
            Block::bordered()
                .title(format!(" {title} "))
                .border_style(theme.border(focused)),
        )
        .highlight_style(theme.highlight())
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(cursor.selected());
    frame.render_stateful_widget(list, area, &mut state);
}

fn download_banner(anime: &Anime) -> String {
    format!(
        "Press Ctrl+D to Download {} Episodes",
        truncate(anime.display_title(), TITLE_LIMIT)
    )
}

fn info_text(anime: &Anime, theme: &Theme) -> Text<'static> {
    let label = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let field = |name: &str, value: String| {
        Line::from(vec![Span::styled(format!("{name}: "), label), Span::raw(value)])
    };
    let rating = if anime.rating.trim().is_empty() {
        "-:-".to_string()
    } else {
        anime.rating.clone()
    };

    let mut lines = vec![
        Line::styled(download_banner(anime), Style::default().fg(theme.active)),
        Line::default(),
        field("English", anime.english_name.clone()),
        field("Type", anime.kind.clone()),
        field("Status", anime.status.clone()),
        field("Rating", rating),
        field("Score", format!("{:.1}", anime.score)),
        field("Genres", anime.genres.join(", ")),
        Line::default(),
        Line::styled("Description", label),
    ];
    lines.extend(anime.description.lines().map(|l| Line::raw(l.to_string())));
    Text::from(lines)
}

/// Rows `text` occupies when wrapped to `width` columns.
fn wrapped_height(text: &Text, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_info(frame: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    let block = Block::bordered()
        .title(" Info ")
        .border_style(theme.border(app.focus.focus() == Focus::InfoBox));
    let inner = block.inner(area);

    let text = app.selection.as_ref().map_or_else(
        || Text::raw("Select a title to see its details"),
        |s| info_text(&s.anime, theme),
    );
    let max_scroll = wrapped_height(&text, inner.width).saturating_sub(inner.height);
    app.info_scroll = app.info_scroll.min(max_scroll);

    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((app.info_scroll, 0))
            .block(block),
        area,
    );
}

fn render_downloads(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let focus = app.focus.focus();
    let block = Block::bordered()
        .title(" Download ")
        .border_style(theme.border(focus.is_download_list()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [banner, lists, gauge, status] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(4),
    ])
    .areas(inner);

    let banner_text = app.selection.as_ref().map_or_else(
        || "Select a title to download its episodes".to_string(),
        |s| download_banner(&s.anime),
    );
    frame.render_widget(
        Paragraph::new(banner_text)
            .style(Style::default().fg(theme.active))
            .wrap(Wrap { trim: true }),
        banner,
    );

    let [sub, dub] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(lists);
    let selection = app.selection.as_ref();
    let episodes = |kind: EpisodeKind| selection.map_or(&[][..], |s| s.episodes(kind));
    render_episodes(
        frame,
        sub,
        "Sub",
        episodes(EpisodeKind::Sub),
        app.cursors.download_sub,
        focus == Focus::DownloadSubList,
        theme,
    );
    render_episodes(
        frame,
        dub,
        "Dub",
        episodes(EpisodeKind::Dub),
        app.cursors.download_dub,
        focus == Focus::DownloadDubList,
        theme,
    );

    let snapshot = app.downloads.snapshot();
    let percent = snapshot.percent.clamp(0.0, 1.0);
    let gauge_label = if snapshot.indeterminate {
        "…".to_string()
    } else {
        format!("{:.0}%", percent * 100.0)
    };
    frame.render_widget(
        Gauge::default()
            .block(
                Block::bordered()
                    .title(
                        app.downloads
                            .label()
                            .map_or_else(String::new, |l| format!(" {l} ")),
                    )
                    .border_style(theme.border(false)),
            )
            .gauge_style(Style::default().fg(theme.accent))
            .ratio(percent)
            .label(gauge_label),
        gauge,
    );

    let mut lines = vec![Line::from(vec![
        Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(snapshot.status_text()),
    ])];
    if let Some(error) = &snapshot.error {
        lines.push(Line::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(path) = app.downloads.last_path() {
        lines.push(Line::raw(format!("Saved to {}", path.display())));
    }
    lines.push(Line::styled(
        DOWNLOAD_HINTS,
        Style::default().fg(theme.inactive),
    ));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), status);
}

const ABOUT: &str = "\
A terminal client for finding and watching anime.

Search the catalog, pick a title from the results and press enter on an \
episode to stream it in mpv. Open the download panel with ctrl+d to save \
episodes to disk instead; downloads run in the background and can be \
paused or cancelled without leaving the interface.";

fn render_about(frame: &mut Frame, area: Rect, theme: &Theme) {
    let mut lines = vec![
        Line::styled(
            "kaizen",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Line::raw(format!("version {}", env!("CARGO_PKG_VERSION"))),
        Line::default(),
    ];
    lines.extend(ABOUT.lines().map(Line::raw));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().border_style(theme.border(false))),
        area,
    );
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let [left, right] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(u16::try_from(STATUS_HINTS.chars().count()).unwrap_or(0)),
    ])
    .areas(area);
    if let Some(notice) = &app.notice {
        frame.render_widget(Paragraph::new(truncate(notice, NOTICE_LIMIT)), left);
    }
    frame.render_widget(
        Paragraph::new(STATUS_HINTS)
            .alignment(Alignment::Right)
            .style(Style::default().add_modifier(Modifier::DIM)),
        right,
    );
}

const HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("tab / shift+tab", "switch tabs"),
            ("?", "show or hide this help"),
            ("esc / ctrl+c", "quit"),
        ],
    ),
    (
        "Focus Controls",
        &[
            ("!", "search input"),
            ("@", "results table"),
            ("#", "sub episodes"),
            ("$", "dub episodes"),
            ("%", "info panel"),
            ("ctrl+d", "toggle the download panel"),
        ],
    ),
    (
        "Actions",
        &[
            ("enter", "search, select a title, play or download an episode"),
            ("ctrl+p", "pause or resume the download"),
            ("ctrl+x", "cancel the download"),
        ],
    ),
    (
        "Navigation Within Components",
        &[
            ("up / k, down / j", "move one row"),
            ("pgup / b, pgdown / f", "move one page"),
            ("home / g, end / G", "jump to the first or last row"),
        ],
    ),
    (
        "Tips",
        &[
            ("", "focus keys work everywhere, even in the search input"),
            ("", "starting a new download replaces the running one"),
        ],
    ),
];

fn render_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let heading = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(theme.active);
    let mut lines = Vec::new();
    for (section, entries) in HELP {
        lines.push(Line::styled(*section, heading));
        for (keys, what) in *entries {
            lines.push(if keys.is_empty() {
                Line::raw(format!("  {what}"))
            } else {
                Line::from(vec![
                    Span::styled(format!("  {keys:<22}"), key),
                    Span::raw(*what),
                ])
            });
        }
        lines.push(Line::default());
    }

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let [vertical] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(80)])
        .flex(Flex::Center)
        .areas(vertical);

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::bordered()
                .title(" Kaizen Keybinds ")
                .border_style(theme.border(true)),
        ),
        popup,
    );
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use kaizen_core::SessionId;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    use super::*;
    use crate::app::downloads::testing::FakeDownloads;
    use crate::app::msg::{EpisodeRef, LinkTarget, Msg};
    use crate::app::state::AppConfig;

    const WIDTH: u16 = 140;
    const HEIGHT: u16 = 45;

    fn app(width: u16, height: u16) -> App {
        let config = AppConfig {
            download_root: PathBuf::from("/videos"),
            poll_interval: Duration::from_millis(100),
        };
        let mut app = App::new(config, Arc::new(FakeDownloads::default()));
        app.update(Msg::Resize { width, height });
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.update(Msg::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn draw(app: &mut App) -> String {
        let backend = TestBackend::new(app.width, app.height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, app, &Theme::default()))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let width = usize::from(buffer.area.width);
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn frieren() -> Anime {
        Anime {
            id: "abc".to_string(),
            title: "Sousou no Frieren".to_string(),
            english_name: "Frieren: Beyond Journey's End".to_string(),
            sub_count: 3,
            dub_count: 2,
            score: 9.14,
            genres: vec!["Adventure".to_string(), "Fantasy".to_string()],
            description: "An elf mage outlives her party.".to_string(),
            ..Anime::default()
        }
    }

    fn selected(app: &mut App) {
        app.update(Msg::SearchFinished(Ok(vec![frieren()])));
        press(app, KeyCode::Char('@'));
        press(app, KeyCode::Enter);
    }

    #[test]
    fn small_window_shows_size_error() {
        let mut app = app(100, 30);
        let screen = draw(&mut app);
        assert!(screen.contains("Minimum window size is not met."));
        assert!(screen.contains("current size = 93x30"));
        assert!(!screen.contains("Watch Anime"));
    }

    #[test]
    fn empty_watch_tab() {
        let mut app = app(WIDTH, HEIGHT);
        let screen = draw(&mut app);
        assert!(screen.contains("Watch Anime"));
        assert!(screen.contains("About"));
        assert!(screen.contains(PLACEHOLDER));
        assert!(screen.contains("Select a title to see its details"));
    }

    #[test]
    fn loading_replaces_results_table() {
        let mut app = app(WIDTH, HEIGHT);
        for c in "naruto".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        let screen = draw(&mut app);
        assert!(screen.contains(LOADING));
        assert!(screen.contains("naruto"));
    }

    #[test]
    fn results_and_selection_fill_table_lists_and_info() {
        let mut app = app(WIDTH, HEIGHT);
        selected(&mut app);
        let screen = draw(&mut app);
        assert!(screen.contains("Anime Title"));
        assert!(screen.contains("Sub Episodes"));
        assert!(screen.contains("Sousou no Frieren"));
        assert!(screen.contains("Episode 3"));
        assert!(screen.contains("Press Ctrl+D to Download Sousou no Frieren Episodes"));
        assert!(screen.contains("Score: 9.1"));
        assert!(screen.contains("Rating: -:-"));
        assert!(screen.contains("Adventure, Fantasy"));
    }

    #[test]
    fn info_scroll_is_clamped_to_content() {
        let mut app = app(WIDTH, HEIGHT);
        selected(&mut app);
        press(&mut app, KeyCode::Char('%'));
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.info_scroll, u16::MAX);
        draw(&mut app);
        assert_eq!(app.info_scroll, 0);
    }

    #[test]
    fn download_panel_shows_progress_and_hints() {
        let mut app = app(WIDTH, HEIGHT);
        selected(&mut app);
        app.update(Msg::Key(KeyEvent::new(
            KeyCode::Char('d'),
            KeyModifiers::CONTROL,
        )));
        app.update(Msg::LinkResolved {
            target: LinkTarget::Download(EpisodeRef {
                anime_id: "abc".to_string(),
                title: "Sousou no Frieren".to_string(),
                kind: EpisodeKind::Sub,
                episode: 1,
            }),
            result: Ok("https://cdn/ep1.mp4".to_string()),
        });
        assert_eq!(
            app.downloads.phase(),
            crate::app::downloads::DownloadPhase::Downloading {
                id: SessionId::new(1),
                paused: false
            }
        );

        let screen = draw(&mut app);
        assert!(screen.contains("Download"));
        assert!(screen.contains("Status: Downloading…"));
        assert!(screen.contains("0%"));
        assert!(screen.contains(DOWNLOAD_HINTS));
    }

    #[test]
    fn help_popup_lists_sections() {
        let mut app = app(WIDTH, HEIGHT);
        press(&mut app, KeyCode::Char('?'));
        let screen = draw(&mut app);
        assert!(screen.contains("Kaizen Keybinds"));
        assert!(screen.contains("Focus Controls"));
        assert!(screen.contains("Navigation Within Components"));
    }

    #[test]
    fn about_tab() {
        let mut app = app(WIDTH, HEIGHT);
        press(&mut app, KeyCode::Tab);
        let screen = draw(&mut app);
        assert!(screen.contains("kaizen"));
        assert!(screen.contains("terminal client"));
        assert!(!screen.contains(PLACEHOLDER));
    }

    #[test]
    fn theme_falls_back_on_bad_colors() {
        let settings = Settings {
            focus_active_color: Some("#ff0000".to_string()),
            accent_color: Some("not a color".to_string()),
            ..Settings::default()
        };
        let theme = Theme::from_settings(&settings);
        assert_eq!(theme.active, Color::Rgb(0xff, 0, 0));
        assert_eq!(theme.accent, Theme::default().accent);
        assert_eq!(theme.inactive, Theme::default().inactive);
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "x".repeat(60);
        let truncated = truncate(&long, TITLE_LIMIT);
        assert_eq!(truncated.len(), TITLE_LIMIT + 3);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate("short", TITLE_LIMIT), "short");
    }
}
