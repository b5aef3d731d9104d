//! Status bus: the hand-off point between transfer workers and the UI.
//!
//! A bounded FIFO of [`StatusUpdate`]s. Workers publish without waiting;
//! the event loop drains with [`StatusBus::try_recv`] from its poll tick.
//!
//! Only the newest progress of a session matters, so each session holds at
//! most one queued progress update: a newer one overwrites it in place. When
//! the bus is full, progress is dropped, but a terminal update always gets
//! in, evicting the oldest queued progress if needed. Per-session order is
//! preserved because a session's terminal update is always published last.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use kaizen_core::StatusUpdate;

/// What happened to a published update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    /// Appended at the back.
    Queued,
    /// Replaced an older progress update of the same session.
    Coalesced,
    /// Discarded because the bus was full.
    Dropped,
}

/// Bounded, coalescing FIFO of status updates.
#[derive(Debug)]
pub struct StatusBus {
    queue: Mutex<VecDeque<StatusUpdate>>,
    capacity: usize,
}

impl StatusBus {
    /// Create a bus holding at most `capacity` updates (minimum one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<StatusUpdate>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish an update without waiting.
    pub fn publish(&self, update: StatusUpdate) -> Publish {
        let mut queue = self.lock();

        if !update.complete {
            if let Some(slot) = queue
                .iter_mut()
                .find(|queued| queued.session == update.session && !queued.complete)
            {
                *slot = update;
                return Publish::Coalesced;
            }
            if queue.len() >= self.capacity {
                return Publish::Dropped;
            }
            queue.push_back(update);
            return Publish::Queued;
        }

        if queue.len() >= self.capacity {
            if let Some(pos) = queue.iter().position(|queued| !queued.complete) {
                queue.remove(pos);
            } else {
                tracing::warn!(
                    target: "kaizen.download",
                    session = %update.session,
                    capacity = self.capacity,
                    "status bus full of terminal updates; growing past capacity"
                );
            }
        }
        queue.push_back(update);
        Publish::Queued
    }

    /// Take the oldest update, if any.
    pub fn try_recv(&self) -> Option<StatusUpdate> {
        self.lock().pop_front()
    }

    /// Number of queued updates.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Configured capacity.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
