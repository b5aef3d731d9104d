//! Background download manager for kaizen.
//!
//! - `control` - per-session pause/cancel/supersede handles
//! - `bus` - bounded, coalescing queue of status updates
//! - `worker` - streams one response body to disk
//! - `manager` - the single-active-session [`DownloadManager`]

// Re-export core types for convenience
pub use kaizen_core::download::{
    DownloadError, DownloadResult, DownloadStatus, Progress, SessionId, SessionState,
    StatusSnapshot, StatusUpdate,
};
pub use kaizen_core::ports::{DownloadControlPort, DownloadRequest};

mod bus;
mod config;
mod control;
mod manager;
mod paths;
pub(crate) mod progress;
mod worker;

pub use bus::{Publish, StatusBus};
pub use config::{DEFAULT_BUS_CAPACITY, DEFAULT_CHUNK_SIZE, TransferConfig};
pub use control::{ControlHandle, SessionControl, StopReason, session_control};
pub use manager::DownloadManager;
pub use paths::DownloadDestination;
pub use progress::ProgressThrottle;
pub use worker::{TransferJob, WorkerDeps, run_transfer};
