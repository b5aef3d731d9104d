//! Download manager.
//!
//! Owns the status bus, the session id counter and the single active
//! session, and implements [`DownloadControlPort`] for the UI.
//!
//! # Concurrency Model
//!
//! - Every method is synchronous and non-blocking; workers run on the
//!   tokio runtime captured at construction.
//! - Starting a session supersedes the previous one and hands its task to
//!   the new worker, which waits for it before touching the disk.
//! - The active session's lifecycle and snapshot live in one
//!   [`SessionTracker`]; the UI reads them through
//!   [`DownloadControlPort::current_status`].
//! - Lock order: active → tracker (consistent everywhere).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use kaizen_core::{
    DownloadControlPort, DownloadError, DownloadRequest, SessionId, SessionState, SessionTracker,
    StatusSnapshot, StatusUpdate,
};

use crate::bus::StatusBus;
use crate::config::TransferConfig;
use crate::control::{SessionControl, session_control};
use crate::worker::{TransferJob, WorkerDeps, run_transfer};

/// The session whose updates the UI renders.
#[derive(Debug)]
struct ActiveSession {
    id: SessionId,
    control: SessionControl,
    task: JoinHandle<StatusUpdate>,
}

/// Background download manager.
#[derive(Debug)]
pub struct DownloadManager {
    deps: WorkerDeps,
    runtime: Handle,
    next_id: AtomicU64,
    active: Mutex<Option<ActiveSession>>,
    tracker: Mutex<SessionTracker>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DownloadManager {
    /// Create a manager that spawns workers on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails when called outside a tokio runtime or when the HTTP client
    /// cannot be built.
    pub fn new(config: TransferConfig) -> Result<Self, DownloadError> {
        let runtime = Handle::try_current()
            .map_err(|e| DownloadError::other(format!("no tokio runtime: {e}")))?;
        Self::with_runtime(config, runtime)
    }

    /// Create a manager that spawns workers on `runtime`.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn with_runtime(config: TransferConfig, runtime: Handle) -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| DownloadError::other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            deps: WorkerDeps {
                client,
                bus: Arc::new(StatusBus::new(config.bus_capacity())),
                config,
            },
            runtime,
            next_id: AtomicU64::new(0),
            active: Mutex::new(None),
            tracker: Mutex::new(SessionTracker::new()),
        })
    }

    /// The bus workers publish to.
    pub fn bus(&self) -> &Arc<StatusBus> {
        &self.deps.bus
    }

    /// Cancel the active session, if any, and hand back its task.
    ///
    /// Awaiting the task lets the worker remove its partial file before
    /// the process exits.
    pub fn shutdown(&self) -> Option<JoinHandle<StatusUpdate>> {
        let active = lock(&self.active).take()?;
        tracing::debug!(target: "kaizen.download", session = %active.id, "shutting down");
        active.control.cancel();
        Some(active.task)
    }

    /// Lifecycle state of the current or last session.
    pub fn session_state(&self) -> SessionState {
        lock(&self.tracker).state()
    }
}

impl DownloadControlPort for DownloadManager {
    fn start_download(&self, request: DownloadRequest) -> SessionId {
        let id = SessionId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let (control, handle) = session_control();

        let mut active = lock(&self.active);
        let predecessor = active.take().map(|previous| {
            tracing::debug!(
                target: "kaizen.download",
                previous = %previous.id,
                session = %id,
                "superseding session"
            );
            previous.control.supersede();
            previous.task
        });
        lock(&self.tracker).start();

        let job = TransferJob {
            session: id,
            request,
            control: handle,
            predecessor,
        };
        let deps = self.deps.clone();
        let task = self
            .runtime
            .spawn(async move { run_transfer(job, &deps).await });

        *active = Some(ActiveSession { id, control, task });
        id
    }

    fn active_session(&self) -> Option<SessionId> {
        lock(&self.active).as_ref().map(|active| active.id)
    }

    fn pause(&self) -> bool {
        let active = lock(&self.active);
        let Some(session) = active.as_ref() else {
            return false;
        };
        session.control.pause();
        lock(&self.tracker).set_paused(true);
        true
    }

    fn resume(&self) -> bool {
        let active = lock(&self.active);
        let Some(session) = active.as_ref() else {
            return false;
        };
        session.control.resume();
        lock(&self.tracker).set_paused(false);
        true
    }

    fn toggle_pause(&self) -> Option<bool> {
        let active = lock(&self.active);
        let session = active.as_ref()?;
        let paused = session.control.toggle_pause();
        lock(&self.tracker).set_paused(paused);
        Some(paused)
    }

    fn cancel(&self) -> bool {
        let active = lock(&self.active);
        let Some(session) = active.as_ref() else {
            return false;
        };
        tracing::debug!(target: "kaizen.download", session = %session.id, "cancel requested");
        session.control.cancel();
        lock(&self.tracker).cancel_requested();
        true
    }

    fn try_next_update(&self) -> Option<StatusUpdate> {
        let update = self.deps.bus.try_recv()?;

        let mut active = lock(&self.active);
        if active.as_ref().is_some_and(|a| a.id == update.session) {
            let mut tracker = lock(&self.tracker);
            tracker.apply(&update);
            if update.complete {
                tracing::debug!(
                    target: "kaizen.download",
                    session = %update.session,
                    state = ?tracker.state(),
                    "session ended"
                );
                *active = None;
            }
        } else if update.complete {
            tracing::trace!(
                target: "kaizen.download",
                session = %update.session,
                state = ?SessionState::ended_by(&update),
                "replaced session ended"
            );
        }
        Some(update)
    }

    fn current_status(&self) -> StatusSnapshot {
        lock(&self.tracker).snapshot().clone()
    }
}
