//! Per-session control state.
//!
//! Each session gets its own pair of handles: the manager keeps a
//! [`SessionControl`] to pause, resume, cancel or supersede, and the worker
//! owns the matching [`ControlHandle`]. Pausing is a `watch` flag the worker
//! waits on; stopping is a `CancellationToken` plus the recorded reason.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use kaizen_core::DownloadError;

const REASON_NONE: u8 = 0;
const REASON_CANCELLED: u8 = 1;
const REASON_SUPERSEDED: u8 = 2;

/// Why a worker was told to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The user cancelled.
    Cancelled,
    /// A newer session replaced this one.
    Superseded,
}

impl StopReason {
    /// The error the worker reports for this reason.
    #[must_use]
    pub const fn into_error(self) -> DownloadError {
        match self {
            Self::Cancelled => DownloadError::Cancelled,
            Self::Superseded => DownloadError::Superseded,
        }
    }
}

#[derive(Debug)]
struct StopState {
    token: CancellationToken,
    reason: AtomicU8,
}

impl StopState {
    fn reason(&self) -> Option<StopReason> {
        match self.reason.load(Ordering::Acquire) {
            REASON_CANCELLED => Some(StopReason::Cancelled),
            REASON_SUPERSEDED => Some(StopReason::Superseded),
            _ => None,
        }
    }

    fn error(&self) -> DownloadError {
        self.reason()
            .map_or(DownloadError::Cancelled, StopReason::into_error)
    }
}

/// Create the control pair for a new session.
#[must_use]
pub fn session_control() -> (SessionControl, ControlHandle) {
    let stop = Arc::new(StopState {
        token: CancellationToken::new(),
        reason: AtomicU8::new(REASON_NONE),
    });
    let (paused_tx, paused_rx) = watch::channel(false);

    (
        SessionControl {
            stop: Arc::clone(&stop),
            paused_tx,
        },
        ControlHandle { stop, paused_rx },
    )
}

/// Manager-side control of one session.
#[derive(Debug)]
pub struct SessionControl {
    stop: Arc<StopState>,
    paused_tx: watch::Sender<bool>,
}

impl SessionControl {
    /// Park the worker before its next read. Returns `true` if this changed
    /// the flag.
    pub fn pause(&self) -> bool {
        self.paused_tx
            .send_if_modified(|paused| !std::mem::replace(paused, true))
    }

    /// Let a parked worker continue. Returns `true` if this changed the flag.
    pub fn resume(&self) -> bool {
        self.paused_tx
            .send_if_modified(|paused| std::mem::replace(paused, false))
    }

    /// Flip the paused flag and return the new value.
    pub fn toggle_pause(&self) -> bool {
        self.paused_tx.send_modify(|paused| *paused = !*paused);
        *self.paused_tx.borrow()
    }

    /// Current value of the paused flag.
    pub fn is_paused(&self) -> bool {
        *self.paused_tx.borrow()
    }

    /// Ask the worker to stop because the user cancelled.
    ///
    /// Has no effect on the reason if the session was already stopped.
    pub fn cancel(&self) {
        let _ = self.stop.reason.compare_exchange(
            REASON_NONE,
            REASON_CANCELLED,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        self.stop.token.cancel();
    }

    /// Ask the worker to stop because a newer session took over.
    ///
    /// Overrides a pending cancellation, so a worker that has not yet
    /// reacted reports itself as superseded.
    pub fn supersede(&self) {
        self.stop.reason.store(REASON_SUPERSEDED, Ordering::Release);
        self.stop.token.cancel();
    }

    /// Why the session was stopped, if it was.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop.reason()
    }

    /// Check if a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.stop.token.is_cancelled()
    }
}

/// Worker-side view of the session control state.
#[derive(Debug)]
pub struct ControlHandle {
    stop: Arc<StopState>,
    paused_rx: watch::Receiver<bool>,
}

impl ControlHandle {
    /// Fail fast if a stop was requested.
    pub fn check(&self) -> Result<(), DownloadError> {
        if self.stop.token.is_cancelled() {
            Err(self.stop_error())
        } else {
            Ok(())
        }
    }

    /// Current value of the paused flag.
    pub fn is_paused(&self) -> bool {
        *self.paused_rx.borrow()
    }

    /// Resolves once a stop is requested.
    pub async fn stopped(&self) {
        self.stop.token.cancelled().await;
    }

    /// The error matching the recorded stop reason.
    ///
    /// Falls back to `Cancelled` when the stop came from the control being
    /// dropped without a reason.
    pub fn stop_error(&self) -> DownloadError {
        self.stop.error()
    }

    /// Wait until the session is not paused.
    ///
    /// Returns immediately when not paused. While paused, no reads are
    /// issued, so the connection's receive window fills and the server is
    /// throttled by TCP itself. A stop request ends the wait with the
    /// matching error.
    pub async fn wait_while_paused(&mut self) -> Result<(), DownloadError> {
        self.check()?;
        let stop = Arc::clone(&self.stop);
        let paused_rx = &mut self.paused_rx;

        tokio::select! {
            biased;

            () = stop.token.cancelled() => Err(stop.error()),

            resumed = async { paused_rx.wait_for(|paused| !*paused).await.is_ok() } => {
                if resumed { Ok(()) } else { Err(stop.error()) }
            }
        }
    }
}
