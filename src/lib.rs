//! Seizure detection library for landmark-based motion monitoring.
//!
//! This library watches a few tracked body landmarks and raises a debounced
//! alert when they show rhythmic, high-amplitude motion:
//! - Fixed-length sliding windows of horizontal positions per joint
//! - Oscillation and amplitude metrics over those windows
//! - A confirm-and-hold alert state machine
//! - An append-only session log with CSV export
//!
//! The detection pipeline per frame consists of:
//! 1. Pushing each detected joint position into its window
//! 2. Computing metrics once every window is full
//! 3. Advancing the alert state machine
//! 4. Logging alert edges and dispatching notifications off-thread
//!
//! # Examples
//!
//! ## Processing Frames
//!
//! ```no_run
//! use seizure_guard::{config::Config, engine::Engine, landmarks::{JointId, LandmarkFrame}};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = Engine::from_config(&Config::default())?;
//!
//! for i in 0..60 {
//!     let x = if i % 2 == 0 { 100.0 } else { 112.0 };
//!     let frame = LandmarkFrame::new()
//!         .with(JointId::Nose, x)
//!         .with(JointId::LeftShoulder, x - 40.0)
//!         .with(JointId::RightShoulder, x + 40.0);
//!     let report = engine.process_frame(&frame);
//!     println!("{:?}", report.state);
//! }
//!
//! println!("{}", engine.log().to_csv());
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading Status From Another Thread
//!
//! ```no_run
//! use seizure_guard::{config::Config, engine::Engine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::from_config(&Config::default())?;
//! let board = engine.status_board();
//!
//! std::thread::spawn(move || {
//!     let status = board.status();
//!     println!("seizure detected: {}", status.seizure_detected);
//! });
//! # Ok(())
//! # }
//! ```
//!
//! ## Replaying Recorded Landmarks
//!
//! ```no_run
//! use seizure_guard::{config::Config, engine::Engine, landmarks::ReplayLandmarks};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut replay = ReplayLandmarks::from_file("session.yaml")?;
//! let mut engine = Engine::from_config(&Config::from_file("config.yaml")?)?;
//! let frames = engine.run(&mut replay)?;
//! println!("processed {frames} frames");
//! # Ok(())
//! # }
//! ```

/// Tracked joints and landmark sources
pub mod landmarks;

/// Fixed-capacity position windows
pub mod window;

/// Oscillation and amplitude metrics
pub mod motion_analyzer;

/// Debounced alert state machine
pub mod alert_state;

/// Append-only event log and export
pub mod event_log;

/// Alert notification dispatch
pub mod dispatch;

/// Published status and log snapshots
pub mod status;

/// Frame processing engine
pub mod engine;

/// Coordinate conversion helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

/// Command-line arguments
pub mod cli;

pub use error::{Error, Result};
