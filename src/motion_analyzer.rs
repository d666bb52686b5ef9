//! Oscillation and amplitude analysis of joint position windows.
//!
//! Each window is mean-centred; its amplitude is the peak-to-peak spread and
//! its oscillation count is the number of direction reversals halved, so one
//! full back-and-forth swing counts once. Per-joint results are averaged into
//! the aggregate figures the alert logic consumes.

use crate::landmarks::JointId;
use crate::window::WindowSnapshot;
use serde::Serialize;
use std::collections::BTreeMap;

/// Motion figures for one joint window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JointMetrics {
    /// Peak-to-peak spread of the centred positions, in pixels
    pub amplitude: f64,
    /// Full back-and-forth swings in the window
    pub oscillation_count: u32,
}

/// Motion figures for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameMetrics {
    /// Per-joint figures
    pub joints: BTreeMap<JointId, JointMetrics>,
    /// Mean oscillation count across joints
    pub avg_oscillation: f64,
    /// Mean amplitude across joints
    pub avg_amplitude: f64,
}

/// Shaking thresholds applied to aggregate metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeCriteria {
    /// Minimum mean oscillation count
    pub min_oscillations: f64,
    /// Minimum mean amplitude
    pub min_amplitude: f64,
}

impl FrameMetrics {
    /// Whether this frame qualifies as shaking under `criteria`
    #[must_use]
    pub fn is_shaking(&self, criteria: &ShakeCriteria) -> bool {
        self.avg_oscillation >= criteria.min_oscillations && self.avg_amplitude >= criteria.min_amplitude
    }
}

/// Stateless analyzer over a fixed set of joints and window length
#[derive(Debug, Clone)]
pub struct MotionAnalyzer {
    joints: Vec<JointId>,
    capacity: usize,
}

impl MotionAnalyzer {
    /// Create an analyzer requiring full windows of `capacity` for `joints`
    #[must_use]
    pub fn new(joints: Vec<JointId>, capacity: usize) -> Self {
        Self { joints, capacity }
    }

    /// Compute frame metrics from window snapshots.
    ///
    /// Returns `None` when any required joint is missing or its window holds
    /// fewer than `capacity` samples.
    #[must_use]
    pub fn compute_metrics(&self, windows: &WindowSnapshot) -> Option<FrameMetrics> {
        if self.joints.is_empty() || self.capacity == 0 {
            return None;
        }

        let mut joints = BTreeMap::new();
        for joint in &self.joints {
            let samples = windows.get(joint)?;
            if samples.len() < self.capacity {
                return None;
            }
            // Only the most recent `capacity` samples are analysed
            let recent = &samples[samples.len() - self.capacity..];
            joints.insert(*joint, joint_metrics(recent));
        }

        #[allow(clippy::cast_precision_loss)]
        let count = joints.len() as f64;
        let avg_oscillation = joints.values().map(|m| f64::from(m.oscillation_count)).sum::<f64>() / count;
        let avg_amplitude = joints.values().map(|m| m.amplitude).sum::<f64>() / count;

        Some(FrameMetrics {
            joints,
            avg_oscillation,
            avg_amplitude,
        })
    }
}

/// Metrics of a single window
#[must_use]
pub fn joint_metrics(samples: &[f64]) -> JointMetrics {
    if samples.is_empty() {
        return JointMetrics {
            amplitude: 0.0,
            oscillation_count: 0,
        };
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let centred: Vec<f64> = samples.iter().map(|x| x - mean).collect();

    let min = centred.iter().copied().fold(f64::INFINITY, f64::min);
    let max = centred.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    JointMetrics {
        amplitude: (max - min).max(0.0),
        oscillation_count: count_reversals(&centred) / 2,
    }
}

/// Count sign changes between consecutive non-zero centred samples.
///
/// Samples sitting exactly on the mean carry the previous direction, so a
/// pass through zero counts once and a touch of zero counts not at all.
fn count_reversals(centred: &[f64]) -> u32 {
    let mut reversals = 0;
    let mut previous: Option<bool> = None;

    for &value in centred {
        if value == 0.0 {
            continue;
        }
        let positive = value > 0.0;
        if previous.is_some_and(|p| p != positive) {
            reversals += 1;
        }
        previous = Some(positive);
    }

    reversals
}
