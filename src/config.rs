//! Configuration management for the seizure detection engine

use crate::alert_state::AlertSettings;
use crate::constants::{
    DEFAULT_ALERT_MESSAGE, DEFAULT_CONFIRMATION_FRAMES, DEFAULT_DECAY_STEP, DEFAULT_HOLD_FRAMES,
    DEFAULT_MIN_AMPLITUDE, DEFAULT_MIN_OSCILLATIONS, DEFAULT_REPORT_FILE, DEFAULT_SAMPLE_RATE,
    DEFAULT_WINDOW_SECONDS,
};
use crate::landmarks::{JointId, JointProfile};
use crate::motion_analyzer::ShakeCriteria;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Motion detection configuration
    pub detection: DetectionConfig,

    /// Alert notification configuration
    pub alert: AlertConfig,

    /// Session report configuration
    pub session: SessionConfig,
}

/// Motion detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Landmark frames per second
    pub sample_rate: u32,

    /// Sliding window length in seconds
    pub window_seconds: f64,

    /// Minimum mean oscillation count per window
    pub min_oscillations: f64,

    /// Minimum mean amplitude in pixels
    pub min_amplitude: f64,

    /// Shaking frames needed to raise an alert
    pub confirmation_frames: u32,

    /// Counter decrement on calm frames
    pub decay_step: u32,

    /// Frames an alert is held once raised
    pub hold_frames: u32,

    /// Predefined joint set
    pub profile: JointProfile,

    /// Explicit joint list, overrides `profile` when set
    pub joints: Option<Vec<JointId>>,
}

/// Alert notification parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Emergency contact number, empty when unset
    pub contact: String,

    /// Message sent to the contact
    pub message: String,

    /// External program invoked as `<command> <args..> <contact> <message>`
    pub command: Option<String>,

    /// Extra leading arguments for `command`
    pub args: Vec<String>,
}

/// Session report parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Default report file name
    pub report_file: PathBuf,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            min_oscillations: DEFAULT_MIN_OSCILLATIONS,
            min_amplitude: DEFAULT_MIN_AMPLITUDE,
            confirmation_frames: DEFAULT_CONFIRMATION_FRAMES,
            decay_step: DEFAULT_DECAY_STEP,
            hold_frames: DEFAULT_HOLD_FRAMES,
            profile: JointProfile::UpperBody,
            joints: None,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            contact: String::new(),
            message: DEFAULT_ALERT_MESSAGE.to_string(),
            command: None,
            args: Vec::new(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            report_file: PathBuf::from(DEFAULT_REPORT_FILE),
        }
    }
}

impl DetectionConfig {
    /// Samples held per joint window
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn buffer_capacity(&self) -> usize {
        let samples = f64::from(self.sample_rate) * self.window_seconds;
        if samples.is_finite() && samples >= 0.0 {
            samples.round() as usize
        } else {
            0
        }
    }

    /// Joints tracked by the engine
    #[must_use]
    pub fn tracked_joints(&self) -> Vec<JointId> {
        self.joints.clone().unwrap_or_else(|| self.profile.joints())
    }

    /// Per-frame shaking thresholds
    #[must_use]
    pub fn shake_criteria(&self) -> ShakeCriteria {
        ShakeCriteria {
            min_oscillations: self.min_oscillations,
            min_amplitude: self.min_amplitude,
        }
    }

    /// State machine tuning
    #[must_use]
    pub fn alert_settings(&self) -> AlertSettings {
        AlertSettings {
            criteria: self.shake_criteria(),
            confirmation_frames: self.confirmation_frames,
            decay_step: self.decay_step,
            hold_frames: self.hold_frames,
        }
    }

    /// Validate detection parameters
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::ConfigError("Sample rate must be greater than 0".to_string()));
        }
        if !self.window_seconds.is_finite() || self.window_seconds <= 0.0 {
            return Err(Error::ConfigError(
                "Window length must be a positive number of seconds".to_string(),
            ));
        }
        if self.buffer_capacity() == 0 {
            return Err(Error::ConfigError(
                "Buffer capacity (sample rate x window seconds) must be greater than 0".to_string(),
            ));
        }
        if !self.min_oscillations.is_finite() || self.min_oscillations <= 0.0 {
            return Err(Error::ConfigError(
                "Minimum oscillations must be greater than 0".to_string(),
            ));
        }
        if !self.min_amplitude.is_finite() || self.min_amplitude <= 0.0 {
            return Err(Error::ConfigError("Minimum amplitude must be greater than 0".to_string()));
        }
        if self.confirmation_frames == 0 {
            return Err(Error::ConfigError(
                "Confirmation frames must be greater than 0".to_string(),
            ));
        }
        if self.decay_step == 0 {
            return Err(Error::ConfigError("Decay step must be greater than 0".to_string()));
        }
        if self.hold_frames == 0 {
            return Err(Error::ConfigError("Hold frames must be greater than 0".to_string()));
        }

        let joints = self.tracked_joints();
        if joints.is_empty() {
            return Err(Error::ConfigError("At least one joint must be tracked".to_string()));
        }
        let unique: BTreeSet<JointId> = joints.iter().copied().collect();
        if unique.len() != joints.len() {
            return Err(Error::ConfigError("Tracked joints must not repeat".to_string()));
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        self.detection.validate()?;

        if self.alert.command.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(Error::ConfigError("Notifier command must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Seizure Guard Configuration

# Motion detection
detection:
  sample_rate: 15
  window_seconds: 1.0
  min_oscillations: 0.75
  min_amplitude: 6.0
  confirmation_frames: 15
  decay_step: 2
  hold_frames: 45
  profile: upper_body
  # joints: [nose, left_shoulder, right_shoulder, left_wrist, right_wrist]

# Alert notification
alert:
  contact: ""
  message: "ALERT: Seizure detected by SeizureGuard System! Immediate attention required."
  # command: "/usr/local/bin/notify-contact"
  args: []

# Session report
session:
  report_file: "SeizureGuard_Report.csv"
"#;
