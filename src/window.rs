//! Fixed-capacity position history per tracked joint.

use crate::landmarks::{JointId, LandmarkFrame};
use log::debug;
use std::collections::{BTreeMap, VecDeque};

/// Recent horizontal positions of one joint, oldest first
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl SlidingWindow {
    /// Create an empty window holding at most `capacity` samples
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest one when full.
    ///
    /// Non-finite samples are rejected and leave the window untouched.
    /// Returns whether the sample was stored.
    pub fn push(&mut self, position: f64) -> bool {
        if !position.is_finite() || self.capacity == 0 {
            return false;
        }

        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(position);
        true
    }

    /// Whether the window holds exactly `capacity` samples
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.samples.len() == self.capacity
    }

    /// Copy of the current contents, oldest first
    #[must_use]
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    /// Number of stored samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Snapshots of every tracked joint's window, keyed by joint
pub type WindowSnapshot = BTreeMap<JointId, Vec<f64>>;

/// One sliding window per tracked joint
#[derive(Debug, Clone)]
pub struct WindowSet {
    windows: BTreeMap<JointId, SlidingWindow>,
}

impl WindowSet {
    /// Create empty windows of equal capacity for `joints`
    #[must_use]
    pub fn new(joints: &[JointId], capacity: usize) -> Self {
        Self {
            windows: joints.iter().map(|&joint| (joint, SlidingWindow::new(capacity))).collect(),
        }
    }

    /// Push every detected tracked joint of `frame`.
    ///
    /// Joints absent from the frame, or reported with a non-finite position,
    /// are skipped for this frame. Returns the number of samples stored.
    pub fn update(&mut self, frame: &LandmarkFrame) -> usize {
        let mut stored = 0;
        for (joint, window) in &mut self.windows {
            match frame.position(*joint) {
                Some(x) if window.push(x) => stored += 1,
                Some(x) => debug!("Rejected sample {x} for {joint}"),
                None => {}
            }
        }
        stored
    }

    /// Window of a single joint
    #[must_use]
    pub fn get(&self, joint: JointId) -> Option<&SlidingWindow> {
        self.windows.get(&joint)
    }

    /// Whether every tracked window is full
    #[must_use]
    pub fn all_full(&self) -> bool {
        !self.windows.is_empty() && self.windows.values().all(SlidingWindow::is_full)
    }

    /// Snapshot of every window
    #[must_use]
    pub fn snapshot(&self) -> WindowSnapshot {
        self.windows
            .iter()
            .map(|(&joint, window)| (joint, window.snapshot()))
            .collect()
    }
}
