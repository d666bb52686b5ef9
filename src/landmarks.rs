//! Tracked body landmarks and the sources that deliver them frame by frame.
//!
//! The engine never talks to a pose estimator directly. Anything able to
//! produce one [`LandmarkFrame`] per camera frame implements
//! [`LandmarkProvider`]: a live estimator, a recorded replay, or a scripted
//! sequence in tests.

use crate::utils::normalized_to_pixel;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::path::Path;

/// Body landmark tracked by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointId {
    /// Tip of the nose
    Nose,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left wrist
    LeftWrist,
    /// Right wrist
    RightWrist,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
}

impl JointId {
    /// Every joint the detector knows about
    pub const ALL: [Self; 7] = [
        Self::Nose,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
    ];

    /// Snake-case name, matching the configuration and replay formats
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
        }
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Predefined sets of tracked joints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointProfile {
    /// Head and shoulders
    UpperBody,
    /// Head, shoulders, wrists and hips
    FullBody,
}

impl JointProfile {
    /// Joints tracked by this profile
    #[must_use]
    pub fn joints(self) -> Vec<JointId> {
        match self {
            Self::UpperBody => vec![JointId::Nose, JointId::LeftShoulder, JointId::RightShoulder],
            Self::FullBody => JointId::ALL.to_vec(),
        }
    }
}

/// Horizontal pixel positions detected in one frame.
///
/// A joint missing from the frame was not detected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkFrame {
    positions: BTreeMap<JointId, f64>,
}

impl LandmarkFrame {
    /// Create a frame with no detections
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper adding one detected position
    #[must_use]
    pub fn with(mut self, joint: JointId, x: f64) -> Self {
        self.positions.insert(joint, x);
        self
    }

    /// Frame where every listed joint sits at the same x position
    #[must_use]
    pub fn uniform(joints: &[JointId], x: f64) -> Self {
        joints.iter().fold(Self::new(), |frame, &joint| frame.with(joint, x))
    }

    /// Build a frame from normalised `[0, 1]` x coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is not finite or `frame_width` is 0.
    pub fn from_normalized(points: &[(JointId, f64)], frame_width: u32, mirror: bool) -> Result<Self> {
        let mut frame = Self::new();
        for &(joint, x) in points {
            frame.insert(joint, normalized_to_pixel(x, frame_width, mirror)?);
        }
        Ok(frame)
    }

    /// Record a detection for a joint
    pub fn insert(&mut self, joint: JointId, x: f64) {
        self.positions.insert(joint, x);
    }

    /// Position of a joint, `None` if it was not detected
    #[must_use]
    pub fn position(&self, joint: JointId) -> Option<f64> {
        self.positions.get(&joint).copied()
    }

    /// Whether no joint was detected in this frame
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Source of landmark frames consumed by the engine
pub trait LandmarkProvider {
    /// Produce the next frame.
    ///
    /// Returns `Ok(None)` once the source is exhausted or has been stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the source failed irrecoverably.
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>>;
}

/// In-memory provider replaying a fixed list of frames
#[derive(Debug, Clone, Default)]
pub struct ScriptedLandmarks {
    frames: VecDeque<LandmarkFrame>,
}

impl ScriptedLandmarks {
    /// Create a provider yielding `frames` in order
    #[must_use]
    pub fn new(frames: Vec<LandmarkFrame>) -> Self {
        Self { frames: frames.into() }
    }

    /// Frames not yet delivered
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkProvider for ScriptedLandmarks {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        Ok(self.frames.pop_front())
    }
}

/// One recorded frame: joint name to x position, `null` when not detected
type RecordedFrame = BTreeMap<JointId, Option<f64>>;

/// Provider replaying frames recorded in a YAML file.
///
/// ```yaml
/// - { nose: 100, left_shoulder: 80, right_shoulder: 120 }
/// - { nose: 112, left_shoulder: null, right_shoulder: 132 }
/// ```
#[derive(Debug, Clone)]
pub struct ReplayLandmarks {
    inner: ScriptedLandmarks,
}

impl ReplayLandmarks {
    /// Load a recording from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a recording from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a list of joint maps.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let recorded: Vec<RecordedFrame> = serde_yaml::from_str(content)
            .map_err(|e| Error::LandmarkError(format!("Failed to parse replay: {e}")))?;

        let frames = recorded
            .into_iter()
            .map(|frame| {
                frame
                    .into_iter()
                    .filter_map(|(joint, x)| x.map(|x| (joint, x)))
                    .fold(LandmarkFrame::new(), |acc, (joint, x)| acc.with(joint, x))
            })
            .collect();

        Ok(Self {
            inner: ScriptedLandmarks::new(frames),
        })
    }

    /// Frames not yet delivered
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }
}

impl LandmarkProvider for ReplayLandmarks {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        self.inner.next_frame()
    }
}
