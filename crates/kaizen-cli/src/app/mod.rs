//! Terminal interface.
//!
//! Elm-style: [`App::update`] folds one [`Msg`] into the state and returns
//! [`Command`]s, [`render`] draws the state, and [`run`] wires
//! both to the terminal and the adapters.
//!
//! # Structure
//!
//! - `state` - `App` and its `update` function
//! - `focus` - Focus state machine and the side panel toggle
//! - `keymap` - Key press to `Action`
//! - `downloads` - Download overlay: session phase, polling, snapshot
//! - `view` - Widgets and layout
//! - `runtime` - Input thread, command execution, redraw loop

mod cursor;
mod downloads;
mod focus;
mod keymap;
mod msg;
mod runtime;
mod state;
mod view;

pub use cursor::Cursor;
pub use downloads::{DownloadPanel, DownloadPhase};
pub use focus::{Focus, FocusState, FocusTarget, SidePanel};
pub use keymap::{Action, action_for};
pub use msg::{Command, EpisodeRef, LinkTarget, Msg};
pub use runtime::{Services, execute, run};
pub use state::{App, AppConfig, MIN_HEIGHT, MIN_WIDTH, NO_LINK_NOTICE, Tab};
pub use view::{Theme, render};
