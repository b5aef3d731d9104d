//! Event loop driver: terminal input, command execution and redraws.

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event};
use kaizen_core::{CatalogPort, MediaPlayerPort};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

use super::msg::{Command, Msg};
use super::state::App;
use super::view::{self, Theme};

/// How long the input thread blocks before checking for shutdown.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Adapters the event loop performs commands with.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CatalogPort>,
    pub player: Arc<dyn MediaPlayerPort>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

/// Run the interface until the user quits.
pub async fn run(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    theme: &Theme,
    services: &Services,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let size = terminal.size()?;
    app.update(Msg::Resize {
        width: size.width,
        height: size.height,
    });
    spawn_input_reader(tx.clone())?;

    while app.is_running() {
        terminal.draw(|frame| view::render(frame, app, theme))?;

        let Some(msg) = rx.recv().await else {
            break;
        };
        dispatch(app, msg, services, &tx);
        while let Ok(msg) = rx.try_recv() {
            dispatch(app, msg, services, &tx);
        }
    }

    tracing::info!(target: "kaizen.ui", "event loop stopped");
    Ok(())
}

fn dispatch(app: &mut App, msg: Msg, services: &Services, tx: &UnboundedSender<Msg>) {
    for command in app.update(msg) {
        execute(command, services, tx);
    }
}

/// Forward terminal events until the receiving side goes away.
fn spawn_input_reader(tx: UnboundedSender<Msg>) -> io::Result<()> {
    thread::Builder::new()
        .name("kaizen-input".to_string())
        .spawn(move || {
            while !tx.is_closed() {
                match event::poll(INPUT_POLL) {
                    Ok(false) => {}
                    Ok(true) => {
                        let msg = match event::read() {
                            Ok(Event::Key(key)) => Msg::Key(key),
                            Ok(Event::Resize(width, height)) => Msg::Resize { width, height },
                            Ok(_) => continue,
                            Err(err) => {
                                tracing::error!(target: "kaizen.ui", error = %err, "terminal read failed");
                                break;
                            }
                        };
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::error!(target: "kaizen.ui", error = %err, "terminal poll failed");
                        break;
                    }
                }
            }
        })?;
    Ok(())
}

/// Perform one command in the background. The result comes back as a
/// message on `tx`.
pub fn execute(
    command: Command,
    services: &Services,
    tx: &UnboundedSender<Msg>,
) -> Option<JoinHandle<()>> {
    let tx = tx.clone();
    let handle = match command {
        Command::Search(query) => {
            let catalog = Arc::clone(&services.catalog);
            tokio::spawn(async move {
                let result = catalog.search(&query).await;
                let _ = tx.send(Msg::SearchFinished(result));
            })
        }
        Command::ResolveLink(target) => {
            let catalog = Arc::clone(&services.catalog);
            tokio::spawn(async move {
                let episode = target.episode();
                let result = catalog
                    .stream_link(&episode.anime_id, episode.kind, episode.episode)
                    .await;
                let _ = tx.send(Msg::LinkResolved { target, result });
            })
        }
        Command::Play(url) => {
            let player = Arc::clone(&services.player);
            tokio::spawn(async move {
                let result = player.play(&url).await;
                let _ = tx.send(Msg::PlaybackFinished(result));
            })
        }
        Command::SchedulePoll { session, delay } => tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Msg::PollTick(session));
        }),
        Command::Quit => return None,
    };
    Some(handle)
}
