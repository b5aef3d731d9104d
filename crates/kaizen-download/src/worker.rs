//! Transfer worker.
//!
//! One worker runs per session. It owns its destination file, streams the
//! response body into it chunk by chunk and reports through the status bus.
//! The worker only talks to the outside world through its [`ControlHandle`]
//! and the bus; it never sees the manager's state.
//!
//! Every run ends with exactly one terminal update, which is both published
//! and returned.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use futures_util::TryStreamExt;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::task::JoinHandle;
use tokio_util::io::StreamReader;

use kaizen_core::{DownloadError, DownloadRequest, SessionId, StatusUpdate};

use crate::bus::{Publish, StatusBus};
use crate::config::TransferConfig;
use crate::control::ControlHandle;
use crate::paths::DownloadDestination;
use crate::progress::ProgressThrottle;

/// Shared dependencies of every worker.
#[derive(Debug, Clone)]
pub struct WorkerDeps {
    /// HTTP client; cloning shares the connection pool.
    pub client: reqwest::Client,
    /// Where updates go.
    pub bus: Arc<StatusBus>,
    /// Chunk size and throttle interval.
    pub config: TransferConfig,
}

/// Everything one worker needs to run a session.
#[derive(Debug)]
pub struct TransferJob {
    /// Session this worker reports as.
    pub session: SessionId,
    /// What to fetch and where to write it.
    pub request: DownloadRequest,
    /// Worker side of the session control.
    pub control: ControlHandle,
    /// Worker of the session this one replaced.
    ///
    /// Awaited before the destination is touched, so two workers never
    /// write to or clean up the same file at once.
    pub predecessor: Option<JoinHandle<StatusUpdate>>,
}

/// Byte counters of a running transfer.
#[derive(Debug, Default)]
struct Counters {
    bytes: u64,
    total: Option<u64>,
}

/// Run a session to its end and return its terminal update.
pub async fn run_transfer(job: TransferJob, deps: &WorkerDeps) -> StatusUpdate {
    let TransferJob {
        session,
        request,
        mut control,
        predecessor,
    } = job;

    tracing::debug!(
        target: "kaizen.download",
        session = %session,
        url = %request.url,
        path = %request.destination().display(),
        "transfer starting"
    );

    let mut counters = Counters::default();
    let mut created: Option<DownloadDestination> = None;

    let outcome = async {
        if let Some(previous) = predecessor {
            wait_for_predecessor(session, previous, &control).await?;
        }
        execute(session, &request, &mut control, deps, &mut counters, &mut created).await
    }
    .await;

    let terminal = match outcome {
        Ok(path) => {
            tracing::info!(
                target: "kaizen.download",
                session = %session,
                bytes = counters.bytes,
                path = %path.display(),
                "transfer complete"
            );
            StatusUpdate::completed(session, counters.bytes, counters.total, path)
        }
        Err(error) => {
            if let Some(destination) = &created {
                destination.remove_partial().await;
            }
            if error.is_failure() {
                tracing::warn!(
                    target: "kaizen.download",
                    session = %session,
                    bytes = counters.bytes,
                    error = %error,
                    "transfer failed"
                );
            } else {
                tracing::debug!(
                    target: "kaizen.download",
                    session = %session,
                    bytes = counters.bytes,
                    reason = %error,
                    "transfer stopped"
                );
            }
            StatusUpdate::failed(session, counters.bytes, counters.total, error)
        }
    };

    report(&deps.bus, terminal.clone());
    terminal
}

/// Wait for the replaced worker to finish unwinding.
///
/// The wait completes even when this session is stopped meanwhile: the
/// session after this one only waits on this worker, so returning early
/// would let the replaced worker clean up underneath it. The replaced
/// worker has already been told to stop, so the wait is short.
async fn wait_for_predecessor(
    session: SessionId,
    mut previous: JoinHandle<StatusUpdate>,
    control: &ControlHandle,
) -> Result<(), DownloadError> {
    let finished = tokio::select! {
        biased;

        () = control.stopped() => None,
        joined = &mut previous => Some(joined),
    };
    let stopped = finished.is_none();
    let joined = match finished {
        Some(joined) => joined,
        None => previous.await,
    };

    if let Err(e) = joined {
        tracing::warn!(
            target: "kaizen.download",
            session = %session,
            error = %e,
            "previous transfer task did not finish cleanly"
        );
    }

    if stopped {
        return Err(control.stop_error());
    }
    Ok(())
}

/// The transfer itself. `created` is set once the file exists on disk.
async fn execute(
    session: SessionId,
    request: &DownloadRequest,
    control: &mut ControlHandle,
    deps: &WorkerDeps,
    counters: &mut Counters,
    created: &mut Option<DownloadDestination>,
) -> Result<PathBuf, DownloadError> {
    let destination = DownloadDestination::plan(request)?;
    let url = reqwest::Url::parse(&request.url)
        .map_err(|e| DownloadError::invalid_request(format!("bad URL '{}': {e}", request.url)))?;
    control.check()?;

    destination.ensure_dir().await?;
    let mut file = File::create(destination.path())
        .await
        .map_err(|e| DownloadError::from_io_error(&e))?;
    let path = destination.path().to_path_buf();
    *created = Some(destination);

    let response = tokio::select! {
        biased;
        () = control.stopped() => return Err(control.stop_error()),
        sent = deps.client.get(url).send() => sent.map_err(network_error)?,
    };

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::network_with_status(
            format!("server responded {status}"),
            status.as_u16(),
        ));
    }

    counters.total = response.content_length();
    report(&deps.bus, StatusUpdate::progress(session, 0, counters.total));

    let reader = StreamReader::new(response.bytes_stream().map_err(io::Error::other));
    tokio::pin!(reader);

    let mut buf = vec![0_u8; deps.config.chunk_size()];
    let mut throttle = ProgressThrottle::new(deps.config.progress_interval());
    throttle.should_emit();

    loop {
        control.check()?;
        if control.is_paused() {
            tracing::debug!(target: "kaizen.download", session = %session, "transfer paused");
            control.wait_while_paused().await?;
            tracing::debug!(target: "kaizen.download", session = %session, "transfer resumed");
            throttle.reset();
        }

        let read = tokio::select! {
            biased;
            () = control.stopped() => return Err(control.stop_error()),
            read = reader.read(&mut buf) => read.map_err(|e| read_error(&e))?,
        };
        if read == 0 {
            break;
        }

        file.write_all(&buf[..read])
            .await
            .map_err(|e| DownloadError::from_io_error(&e))?;
        counters.bytes += read as u64;

        if throttle.should_emit() {
            report(
                &deps.bus,
                StatusUpdate::progress(session, counters.bytes, counters.total),
            );
        }
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::from_io_error(&e))?;

    Ok(path)
}

/// Publish an update, logging progress the full bus had to drop.
fn report(bus: &StatusBus, update: StatusUpdate) -> Publish {
    let session = update.session;
    let bytes = update.bytes_transferred;
    let outcome = bus.publish(update);
    if outcome == Publish::Dropped {
        tracing::trace!(
            target: "kaizen.download",
            session = %session,
            bytes,
            capacity = bus.capacity(),
            "status bus full, progress dropped"
        );
    }
    outcome
}

fn network_error(err: reqwest::Error) -> DownloadError {
    match err.status() {
        Some(status) => DownloadError::network_with_status(err.to_string(), status.as_u16()),
        None => DownloadError::network(err.to_string()),
    }
}

/// Body read errors come from the connection, not the disk.
fn read_error(err: &io::Error) -> DownloadError {
    DownloadError::network(format!("reading response body: {err}"))
}
