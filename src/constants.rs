//! Constants used throughout the application

/// Default frames per second of the landmark stream
pub const DEFAULT_SAMPLE_RATE: u32 = 15;

/// Default sliding window length in seconds
pub const DEFAULT_WINDOW_SECONDS: f64 = 1.0;

/// Minimum averaged full swings per window to count as shaking
pub const DEFAULT_MIN_OSCILLATIONS: f64 = 0.75;

/// Minimum averaged peak-to-peak amplitude in pixels to count as shaking
pub const DEFAULT_MIN_AMPLITUDE: f64 = 6.0;

/// Sustained shaking frames needed before an alert is raised
pub const DEFAULT_CONFIRMATION_FRAMES: u32 = 15;

/// Counter decrement applied on every non-shaking frame
pub const DEFAULT_DECAY_STEP: u32 = 2;

/// Frames an alert stays active once raised (3 seconds at 15 fps)
pub const DEFAULT_HOLD_FRAMES: u32 = 45;

/// Default alert text sent to the emergency contact
pub const DEFAULT_ALERT_MESSAGE: &str =
    "ALERT: Seizure detected by SeizureGuard System! Immediate attention required.";

/// Default file name for the exported session report
pub const DEFAULT_REPORT_FILE: &str = "SeizureGuard_Report.csv";

/// Status string published while the engine is processing frames
pub const STATUS_RUNNING: &str = "Running";

/// Timestamp format used in log exports
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder for the duration column when it does not apply
pub const DURATION_PLACEHOLDER: &str = "-";
