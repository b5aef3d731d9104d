//! Download slice of the event loop.
//!
//! Tracks whether a session is in flight and drains the status bus one
//! update per poll tick. The snapshot the overlay renders is the port's
//! [`current_status`](DownloadControlPort::current_status), re-read after
//! every drain and every control call. All calls into the port are
//! non-blocking.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use kaizen_core::{DownloadControlPort, DownloadRequest, SessionId, StatusSnapshot};

use super::msg::Command;

/// Whether a session is being polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadPhase {
    #[default]
    NotDownloading,
    Downloading {
        id: SessionId,
        paused: bool,
    },
}

/// State behind the download overlay.
pub struct DownloadPanel {
    port: Arc<dyn DownloadControlPort>,
    poll_interval: Duration,
    phase: DownloadPhase,
    snapshot: StatusSnapshot,
    label: Option<String>,
    last_path: Option<PathBuf>,
}

impl std::fmt::Debug for DownloadPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadPanel")
            .field("phase", &self.phase)
            .field("snapshot", &self.snapshot)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl DownloadPanel {
    pub fn new(port: Arc<dyn DownloadControlPort>, poll_interval: Duration) -> Self {
        Self {
            port,
            poll_interval,
            phase: DownloadPhase::NotDownloading,
            snapshot: StatusSnapshot::default(),
            label: None,
            last_path: None,
        }
    }

    pub const fn phase(&self) -> DownloadPhase {
        self.phase
    }

    /// Percent, status and error as the port last reported them.
    pub const fn snapshot(&self) -> &StatusSnapshot {
        &self.snapshot
    }

    /// What the current or last session is fetching.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Where the last completed session wrote its file.
    pub fn last_path(&self) -> Option<&PathBuf> {
        self.last_path.as_ref()
    }

    /// Start a session and begin polling it.
    ///
    /// A session already in flight is superseded, not queued.
    pub fn start(&mut self, request: DownloadRequest, label: String) -> Command {
        if let DownloadPhase::Downloading { id, .. } = self.phase {
            tracing::info!(target: "kaizen.ui", previous = %id, "replacing running download");
        }

        self.last_path = None;
        self.label = Some(label);

        let id = self.port.start_download(request);
        self.refresh();
        self.phase = DownloadPhase::Downloading { id, paused: false };
        tracing::debug!(target: "kaizen.ui", session = %id, "download started");

        self.schedule(id)
    }

    /// Handle a poll tick for `id`.
    ///
    /// Drains at most one update. Returns the next tick to schedule, or
    /// `None` once the session has ended or `id` is no longer active.
    pub fn on_poll_tick(&mut self, id: SessionId) -> Option<Command> {
        let DownloadPhase::Downloading { id: active, .. } = self.phase else {
            return None;
        };
        if active != id {
            return None;
        }

        let Some(update) = self.port.try_next_update() else {
            return Some(self.schedule(id));
        };

        if update.session != active || update.is_superseded() {
            tracing::trace!(
                target: "kaizen.ui",
                session = %update.session,
                active = %active,
                "discarding stale update"
            );
            return Some(self.schedule(id));
        }

        self.refresh();

        if update.complete {
            tracing::debug!(
                target: "kaizen.ui",
                session = %id,
                status = %self.snapshot.status,
                "download finished"
            );
            self.phase = DownloadPhase::NotDownloading;
            self.last_path = update.result_path;
            return None;
        }

        Some(self.schedule(id))
    }

    /// Flip pause on the active session (`ctrl+p`).
    pub fn toggle_pause(&mut self) {
        let DownloadPhase::Downloading { id, .. } = self.phase else {
            return;
        };
        let Some(paused) = self.port.toggle_pause() else {
            return;
        };

        self.phase = DownloadPhase::Downloading { id, paused };
        self.refresh();
    }

    /// Ask the active session to stop (`ctrl+x`).
    ///
    /// The status reads "Cancelling…" until the worker's terminal update
    /// arrives.
    pub fn cancel(&mut self) {
        if !matches!(self.phase, DownloadPhase::Downloading { .. }) {
            return;
        }
        if self.port.cancel() {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        self.snapshot = self.port.current_status();
    }

    const fn schedule(&self, session: SessionId) -> Command {
        Command::SchedulePoll {
            session,
            delay: self.poll_interval,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory download port driven by the test.

    use std::collections::VecDeque;
    use std::sync::{Mutex, PoisonError};

    use kaizen_core::{
        DownloadControlPort, DownloadRequest, SessionId, SessionTracker, StatusSnapshot,
        StatusUpdate,
    };

    #[derive(Debug, Default)]
    struct Inner {
        next_id: u64,
        active: Option<SessionId>,
        paused: bool,
        cancelled: bool,
        started: Vec<DownloadRequest>,
        queue: VecDeque<StatusUpdate>,
        tracker: SessionTracker,
    }

    /// Hands out ids and replays queued updates, tracking status with the
    /// same [`SessionTracker`] the real manager uses.
    #[derive(Debug, Default)]
    pub struct FakeDownloads {
        inner: Mutex<Inner>,
    }

    impl FakeDownloads {
        fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
            self.inner.lock().unwrap_or_else(PoisonError::into_inner)
        }

        pub fn push(&self, update: StatusUpdate) {
            self.lock().queue.push_back(update);
        }

        pub fn started(&self) -> Vec<DownloadRequest> {
            self.lock().started.clone()
        }

        pub fn is_paused(&self) -> bool {
            self.lock().paused
        }

        pub fn was_cancelled(&self) -> bool {
            self.lock().cancelled
        }

        pub fn pending(&self) -> usize {
            self.lock().queue.len()
        }
    }

    impl DownloadControlPort for FakeDownloads {
        fn start_download(&self, request: DownloadRequest) -> SessionId {
            let mut inner = self.lock();
            inner.next_id += 1;
            let id = SessionId::new(inner.next_id);
            inner.active = Some(id);
            inner.paused = false;
            inner.cancelled = false;
            inner.started.push(request);
            inner.tracker.start();
            id
        }

        fn active_session(&self) -> Option<SessionId> {
            self.lock().active
        }

        fn pause(&self) -> bool {
            let mut inner = self.lock();
            if inner.active.is_none() {
                return false;
            }
            inner.paused = true;
            inner.tracker.set_paused(true);
            true
        }

        fn resume(&self) -> bool {
            let mut inner = self.lock();
            if inner.active.is_none() {
                return false;
            }
            inner.paused = false;
            inner.tracker.set_paused(false);
            true
        }

        fn toggle_pause(&self) -> Option<bool> {
            let mut inner = self.lock();
            inner.active?;
            inner.paused = !inner.paused;
            let paused = inner.paused;
            inner.tracker.set_paused(paused);
            Some(paused)
        }

        fn cancel(&self) -> bool {
            let mut inner = self.lock();
            if inner.active.is_none() {
                return false;
            }
            inner.cancelled = true;
            inner.tracker.cancel_requested();
            true
        }

        fn try_next_update(&self) -> Option<StatusUpdate> {
            let mut inner = self.lock();
            let update = inner.queue.pop_front()?;
            if inner.active == Some(update.session) {
                inner.tracker.apply(&update);
                if update.complete {
                    inner.active = None;
                }
            }
            Some(update)
        }

        fn current_status(&self) -> StatusSnapshot {
            self.lock().tracker.snapshot().clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeDownloads;
    use super::*;
    use kaizen_core::{DownloadError, DownloadStatus, StatusUpdate};
    use mockall::mock;

    mock! {
        Port {}

        impl DownloadControlPort for Port {
            fn start_download(&self, request: DownloadRequest) -> SessionId;
            fn active_session(&self) -> Option<SessionId>;
            fn pause(&self) -> bool;
            fn resume(&self) -> bool;
            fn toggle_pause(&self) -> Option<bool>;
            fn cancel(&self) -> bool;
            fn try_next_update(&self) -> Option<StatusUpdate>;
            fn current_status(&self) -> StatusSnapshot;
        }
    }

    const TICK: Duration = Duration::from_millis(100);

    fn panel() -> (Arc<FakeDownloads>, DownloadPanel) {
        let fake = Arc::new(FakeDownloads::default());
        let panel = DownloadPanel::new(fake.clone(), TICK);
        (fake, panel)
    }

    fn request() -> DownloadRequest {
        DownloadRequest::new("http://cdn/ep1.mp4", "/videos/Frieren", "Frieren_ep1_sub.mp4")
    }

    fn tick(session: SessionId) -> Command {
        Command::SchedulePoll {
            session,
            delay: TICK,
        }
    }

    #[test]
    fn start_resets_snapshot_and_schedules_first_tick() {
        let (fake, mut panel) = panel();
        let command = panel.start(request(), "Frieren episode 1 (sub)".into());

        let id = SessionId::new(1);
        assert_eq!(command, tick(id));
        assert_eq!(
            panel.phase(),
            DownloadPhase::Downloading { id, paused: false }
        );
        assert_eq!(panel.snapshot().status, DownloadStatus::Downloading);
        assert_eq!(fake.started(), vec![request()]);
    }

    #[test]
    fn empty_bus_keeps_polling() {
        let (_fake, mut panel) = panel();
        panel.start(request(), String::new());
        let id = SessionId::new(1);
        assert_eq!(panel.on_poll_tick(id), Some(tick(id)));
        assert_eq!(panel.on_poll_tick(id), Some(tick(id)));
    }

    #[test]
    fn each_tick_drains_one_update() {
        let (fake, mut panel) = panel();
        panel.start(request(), String::new());
        let id = SessionId::new(1);
        fake.push(StatusUpdate::progress(id, 25, Some(100)));
        fake.push(StatusUpdate::progress(id, 50, Some(100)));

        assert_eq!(panel.on_poll_tick(id), Some(tick(id)));
        assert!((panel.snapshot().percent - 0.25).abs() < f64::EPSILON);
        assert_eq!(fake.pending(), 1);

        panel.on_poll_tick(id);
        assert!((panel.snapshot().percent - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn terminal_update_stops_polling() {
        let (fake, mut panel) = panel();
        panel.start(request(), String::new());
        let id = SessionId::new(1);
        fake.push(StatusUpdate::completed(
            id,
            100,
            Some(100),
            PathBuf::from("/videos/Frieren/Frieren_ep1_sub.mp4"),
        ));

        assert_eq!(panel.on_poll_tick(id), None);
        assert_eq!(panel.phase(), DownloadPhase::NotDownloading);
        assert_eq!(panel.snapshot().status_text(), "Download Complete!");
        assert!((panel.snapshot().percent - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            panel.last_path(),
            Some(&PathBuf::from("/videos/Frieren/Frieren_ep1_sub.mp4"))
        );
        // A late tick for the finished session does nothing.
        assert_eq!(panel.on_poll_tick(id), None);
    }

    #[test]
    fn superseded_session_is_never_shown() {
        let (fake, mut panel) = panel();
        panel.start(request(), String::new());
        let old = SessionId::new(1);
        fake.push(StatusUpdate::progress(old, 40, Some(100)));
        panel.on_poll_tick(old);

        let new_tick = panel.start(request(), String::new());
        let new = SessionId::new(2);
        assert_eq!(new_tick, tick(new));

        // The old chain of ticks ends on its own.
        assert_eq!(panel.on_poll_tick(old), None);

        fake.push(StatusUpdate::progress(old, 60, Some(100)));
        fake.push(StatusUpdate::failed(old, 60, Some(100), DownloadError::Superseded));
        fake.push(StatusUpdate::progress(new, 10, Some(100)));

        assert_eq!(panel.on_poll_tick(new), Some(tick(new)));
        assert_eq!(panel.on_poll_tick(new), Some(tick(new)));
        assert_eq!(panel.snapshot().status, DownloadStatus::Downloading);
        assert!((panel.snapshot().percent - 0.0).abs() < f64::EPSILON);

        panel.on_poll_tick(new);
        assert!((panel.snapshot().percent - 0.1).abs() < f64::EPSILON);
        assert!(panel.snapshot().error.is_none());
    }

    #[test]
    fn pause_is_a_toggle() {
        let (fake, mut panel) = panel();
        panel.start(request(), String::new());
        let id = SessionId::new(1);

        panel.toggle_pause();
        assert!(fake.is_paused());
        assert_eq!(panel.phase(), DownloadPhase::Downloading { id, paused: true });
        assert_eq!(panel.snapshot().status_text(), "Paused");

        panel.toggle_pause();
        assert!(!fake.is_paused());
        assert_eq!(panel.phase(), DownloadPhase::Downloading { id, paused: false });
        assert_eq!(panel.snapshot().status_text(), "Downloading…");
    }

    #[test]
    fn progress_while_paused_keeps_paused_text() {
        let (fake, mut panel) = panel();
        panel.start(request(), String::new());
        let id = SessionId::new(1);
        panel.toggle_pause();

        fake.push(StatusUpdate::progress(id, 30, Some(100)));
        panel.on_poll_tick(id);
        assert_eq!(panel.snapshot().status, DownloadStatus::Paused);
    }

    #[test]
    fn cancel_shows_cancelling_until_confirmed() {
        let (fake, mut panel) = panel();
        panel.start(request(), String::new());
        let id = SessionId::new(1);

        panel.cancel();
        assert!(fake.was_cancelled());
        assert_eq!(panel.snapshot().status_text(), "Cancelling…");

        // Pausing while cancelling does not hide the pending cancel.
        panel.toggle_pause();
        assert_eq!(panel.snapshot().status_text(), "Cancelling…");

        fake.push(StatusUpdate::failed(id, 30, Some(100), DownloadError::Cancelled));
        assert_eq!(panel.on_poll_tick(id), None);
        assert_eq!(panel.snapshot().status_text(), "Download Cancelled");
        assert_eq!(panel.snapshot().error.as_deref(), Some("cancelled by user"));
    }

    #[test]
    fn failure_is_shown_with_detail() {
        let (fake, mut panel) = panel();
        panel.start(request(), String::new());
        let id = SessionId::new(1);
        fake.push(StatusUpdate::failed(
            id,
            0,
            None,
            DownloadError::network_with_status("server responded 404 Not Found", 404),
        ));

        assert_eq!(panel.on_poll_tick(id), None);
        assert_eq!(panel.snapshot().status_text(), "Download Failed");
        assert!(panel.snapshot().error.is_some());
    }

    #[test]
    fn overlay_shows_the_status_the_port_reports() {
        let id = SessionId::new(9);
        let reported = StatusSnapshot {
            percent: 0.42,
            indeterminate: false,
            status: DownloadStatus::Paused,
            error: None,
        };

        let mut port = MockPort::new();
        port.expect_start_download().times(1).return_const(id);
        port.expect_try_next_update()
            .times(1)
            .returning(move || Some(StatusUpdate::progress(id, 10, Some(100))));
        port.expect_toggle_pause().times(1).return_const(Some(false));
        port.expect_cancel().times(1).return_const(true);
        let shown = reported.clone();
        port.expect_current_status()
            .times(4)
            .returning(move || shown.clone());

        let mut panel = DownloadPanel::new(Arc::new(port), TICK);
        panel.start(request(), String::new());
        assert_eq!(*panel.snapshot(), reported);

        // The drained update says 10%; the port's status is what is shown.
        assert_eq!(panel.on_poll_tick(id), Some(tick(id)));
        assert_eq!(*panel.snapshot(), reported);

        panel.toggle_pause();
        assert_eq!(panel.phase(), DownloadPhase::Downloading { id, paused: false });
        assert_eq!(*panel.snapshot(), reported);

        panel.cancel();
        assert_eq!(*panel.snapshot(), reported);
    }

    #[test]
    fn controls_do_nothing_when_idle() {
        let (fake, mut panel) = panel();
        panel.toggle_pause();
        panel.cancel();
        assert!(!fake.is_paused());
        assert!(!fake.was_cancelled());
        assert_eq!(panel.snapshot().status_text(), "Ready");
        assert_eq!(panel.on_poll_tick(SessionId::new(1)), None);
    }
}
