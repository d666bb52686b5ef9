//! Read-only snapshots of the engine's latest status and event log.
//!
//! The engine is the only writer. Each publish builds a complete new value
//! and swaps it in under a short write lock, so a reader holding a snapshot
//! sees either the previous or the new value as a whole.

use crate::alert_state::AlertState;
use crate::constants::STATUS_RUNNING;
use crate::event_log::EventLog;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// Latest detection status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionStatus {
    /// Engine run state
    pub status: String,
    /// Whether an alert is currently active
    pub seizure_detected: bool,
    /// Mean oscillation count of the last frame, 0 without metrics
    pub debug_shakes: f64,
    /// Mean amplitude of the last frame, 0 without metrics
    pub debug_energy: f64,
    /// Alert state after the last frame
    pub alert_state: AlertState,
    /// Confirmation counter relative to its threshold, in `[0, 1]`
    pub confirmation_progress: f64,
}

impl Default for DetectionStatus {
    fn default() -> Self {
        Self {
            status: STATUS_RUNNING.to_string(),
            seizure_detected: false,
            debug_shakes: 0.0,
            debug_energy: 0.0,
            alert_state: AlertState::Idle,
            confirmation_progress: 0.0,
        }
    }
}

struct Published {
    status: RwLock<Arc<DetectionStatus>>,
    log: RwLock<Arc<EventLog>>,
}

/// Cloneable handle for reading published snapshots
#[derive(Clone)]
pub struct StatusBoard {
    inner: Arc<Published>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    /// Create a board holding the default status and an empty log
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Published {
                status: RwLock::new(Arc::new(DetectionStatus::default())),
                log: RwLock::new(Arc::new(EventLog::new())),
            }),
        }
    }

    /// Latest published status
    #[must_use]
    pub fn status(&self) -> Arc<DetectionStatus> {
        Arc::clone(&self.inner.status.read())
    }

    /// Latest published event log
    #[must_use]
    pub fn log(&self) -> Arc<EventLog> {
        Arc::clone(&self.inner.log.read())
    }

    /// CSV rendering of the latest published log
    #[must_use]
    pub fn report_csv(&self) -> String {
        self.log().to_csv()
    }

    pub(crate) fn publish_status(&self, status: DetectionStatus) {
        let next = Arc::new(status);
        *self.inner.status.write() = next;
    }

    /// Publish a copy of `log`; entries are shared, not duplicated
    pub(crate) fn publish_log(&self, log: &EventLog) {
        let next = Arc::new(log.clone());
        *self.inner.log.write() = next;
    }
}
