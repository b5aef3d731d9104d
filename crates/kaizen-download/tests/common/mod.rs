//! Local HTTP server and polling helpers for transfer tests.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use futures_util::stream;
use tokio::net::TcpListener;

use kaizen_download::{DownloadControlPort, SessionId, StatusUpdate};

/// Size of the `/fixed` resource.
pub const FIXED_LEN: usize = 10 * 1024 * 1024;

/// Chunk size and count of the `/chunked` resource.
pub const CHUNKED_PIECE: usize = 16 * 1024;
pub const CHUNKED_PIECES: usize = 64;

/// Chunk size, count and pacing of the `/slow` resource.
pub const SLOW_PIECE: usize = 64 * 1024;
pub const SLOW_PIECES: usize = 100;
pub const SLOW_DELAY: Duration = Duration::from_millis(20);

/// Total size of the `/slow` resource.
pub const SLOW_LEN: usize = SLOW_PIECE * SLOW_PIECES;

/// A media server bound to an ephemeral localhost port.
pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Start the server on the current runtime.
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/fixed", get(fixed))
            .route("/chunked", get(chunked))
            .route("/slow", get(slow))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr }
    }

    /// Full URL of a route.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// Byte at offset `i` of every test resource.
pub fn pattern_byte(i: usize) -> u8 {
    (i % 251) as u8
}

fn pattern(offset: usize, len: usize) -> Vec<u8> {
    (offset..offset + len).map(pattern_byte).collect()
}

async fn fixed() -> Response {
    pattern(0, FIXED_LEN).into_response()
}

async fn chunked() -> Response {
    let pieces = (0..CHUNKED_PIECES)
        .map(|i| Ok::<_, Infallible>(pattern(i * CHUNKED_PIECE, CHUNKED_PIECE)));
    Body::from_stream(stream::iter(pieces)).into_response()
}

async fn slow() -> Response {
    let pieces = stream::unfold(0_usize, |i| async move {
        if i == SLOW_PIECES {
            return None;
        }
        tokio::time::sleep(SLOW_DELAY).await;
        Some((
            Ok::<_, Infallible>(pattern(i * SLOW_PIECE, SLOW_PIECE)),
            i + 1,
        ))
    });

    Response::builder()
        .header(header::CONTENT_LENGTH, SLOW_LEN)
        .body(Body::from_stream(pieces))
        .unwrap()
}

/// Drain the manager until `session` reports its terminal update.
///
/// Returns every update drained along the way, from any session.
pub async fn drain_until_terminal(
    manager: &impl DownloadControlPort,
    session: SessionId,
) -> Vec<StatusUpdate> {
    let drain = async {
        let mut seen = Vec::new();
        loop {
            match manager.try_next_update() {
                Some(update) => {
                    let done = update.session == session && update.complete;
                    seen.push(update);
                    if done {
                        return seen;
                    }
                }
                None => tokio::time::sleep(Duration::from_millis(5)).await,
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(30), drain)
        .await
        .expect("session never finished")
}

/// Drain the manager until `session` reports progress past zero bytes.
pub async fn wait_for_bytes(
    manager: &impl DownloadControlPort,
    session: SessionId,
) -> Vec<StatusUpdate> {
    let drain = async {
        let mut seen = Vec::new();
        loop {
            match manager.try_next_update() {
                Some(update) => {
                    let started = update.session == session && update.bytes_transferred > 0;
                    assert!(
                        !(update.session == session && update.complete),
                        "session ended before transferring: {update:?}"
                    );
                    seen.push(update);
                    if started {
                        return seen;
                    }
                }
                None => tokio::time::sleep(Duration::from_millis(5)).await,
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(10), drain)
        .await
        .expect("session never made progress")
}

/// Drain whatever is queued right now.
pub fn drain_now(manager: &impl DownloadControlPort) -> Vec<StatusUpdate> {
    std::iter::from_fn(|| manager.try_next_update()).collect()
}
