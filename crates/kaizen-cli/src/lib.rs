//! Terminal client for kaizen: search the catalog, stream episodes in an
//! external player and download them in the background.
//!
//! The binary in `main.rs` parses arguments, initializes logging and either
//! runs a maintenance command or hands a composed [`CliContext`] to the
//! interface in [`app`].

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use anyhow as _;
use dotenvy as _;

// Used by integration tests only
#[cfg(test)]
use axum as _;
#[cfg(test)]
use futures_util as _;

pub mod app;
pub mod bootstrap;
pub mod error;
pub mod logging;
pub mod maintenance;
pub mod parser;
pub mod player;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, bootstrap};
pub use error::CliError;
pub use parser::{Cli, RunMode};
pub use player::ExternalPlayer;
