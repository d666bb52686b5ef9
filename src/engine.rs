//! Frame-by-frame seizure detection engine.

use crate::alert_state::{AlertMachine, AlertSettings, AlertSignal, AlertState, SeizureEvent};
use crate::config::Config;
use crate::dispatch::{
    create_dispatcher, normalize_contact, spawn_dispatch, AlertDispatcher, AlertNotice, DispatchOutcome,
    DispatchReport,
};
use crate::event_log::{EventLog, EventType, LogEntry};
use crate::landmarks::{LandmarkFrame, LandmarkProvider};
use crate::motion_analyzer::{FrameMetrics, MotionAnalyzer};
use crate::status::{DetectionStatus, StatusBoard};
use crate::window::WindowSet;
use crate::Result;
use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Result of processing one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Metrics of the frame, `None` while windows are filling
    pub metrics: Option<FrameMetrics>,
    /// Alert state after the frame
    pub state: AlertState,
    /// Edge signal fired by this frame
    pub signal: Option<AlertSignal>,
}

/// Seizure detection engine owning all detection state
pub struct Engine {
    settings: AlertSettings,
    windows: WindowSet,
    analyzer: MotionAnalyzer,
    machine: AlertMachine,
    log: EventLog,
    board: StatusBoard,
    dispatcher: Arc<dyn AlertDispatcher>,
    contact: String,
    message: String,
    reports_tx: Sender<DispatchReport>,
    reports_rx: Receiver<DispatchReport>,
    frames_processed: u64,
}

impl Engine {
    /// Create an engine with the dispatcher described by `config`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let dispatcher = create_dispatcher(&config.alert);
        Self::new(config, dispatcher)
    }

    /// Create an engine with an explicit dispatcher
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn new(config: &Config, dispatcher: Arc<dyn AlertDispatcher>) -> Result<Self> {
        config.validate()?;

        let detection = &config.detection;
        let joints = detection.tracked_joints();
        let capacity = detection.buffer_capacity();
        let (reports_tx, reports_rx) = mpsc::channel();

        info!(
            "Initializing detection engine: {} joints, window {} samples, dispatcher {}",
            joints.len(),
            capacity,
            dispatcher.name()
        );

        let mut engine = Self {
            settings: detection.alert_settings(),
            windows: WindowSet::new(&joints, capacity),
            analyzer: MotionAnalyzer::new(joints, capacity),
            machine: AlertMachine::new(),
            log: EventLog::new(),
            board: StatusBoard::new(),
            dispatcher,
            contact: normalize_contact(&config.alert.contact),
            message: config.alert.message.clone(),
            reports_tx,
            reports_rx,
            frames_processed: 0,
        };

        engine.record(LogEntry::new(Local::now(), EventType::SystemStarted, "Monitoring Initialized"));
        engine.board.publish_log(&engine.log);

        Ok(engine)
    }

    /// Process one frame stamped with the current wall time
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> FrameReport {
        self.process_frame_at(frame, Local::now())
    }

    /// Process one frame stamped with `now`
    pub fn process_frame_at(&mut self, frame: &LandmarkFrame, now: DateTime<Local>) -> FrameReport {
        let mut log_changed = self.collect_dispatch_reports_at(now) > 0;

        self.windows.update(frame);
        let metrics = if self.windows.all_full() {
            self.analyzer.compute_metrics(&self.windows.snapshot())
        } else {
            None
        };

        let signal = self.machine.step(&self.settings, metrics.as_ref(), now);
        self.frames_processed += 1;

        match &signal {
            Some(AlertSignal::Started { start_time, intensity }) => {
                self.on_alert_started(*start_time, *intensity);
                log_changed = true;
            }
            Some(AlertSignal::Ended(event)) => {
                self.on_alert_ended(event);
                log_changed = true;
            }
            None => {}
        }

        self.publish(metrics.as_ref());
        if log_changed {
            self.board.publish_log(&self.log);
        }

        FrameReport {
            metrics,
            state: self.machine.state(),
            signal,
        }
    }

    /// Process frames until `provider` is exhausted.
    ///
    /// Returns the number of frames processed.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails.
    pub fn run<P: LandmarkProvider + ?Sized>(&mut self, provider: &mut P) -> Result<u64> {
        info!("Starting detection loop");
        let mut processed = 0;
        while let Some(frame) = provider.next_frame()? {
            self.process_frame(&frame);
            processed += 1;
        }
        info!("Landmark source finished after {processed} frames");
        Ok(processed)
    }

    /// Change the emergency contact
    pub fn set_contact(&mut self, number: &str) {
        self.contact = normalize_contact(number);
        info!("Emergency contact updated to: {}", self.contact);
        let details = if self.contact.is_empty() { "cleared" } else { self.contact.as_str() };
        let entry = LogEntry::new(Local::now(), EventType::ContactUpdated, details);
        self.record(entry);
        self.board.publish_log(&self.log);
    }

    /// Record outcomes of finished dispatches.
    ///
    /// Returns the number of outcomes recorded.
    pub fn collect_dispatch_reports(&mut self) -> usize {
        let collected = self.collect_dispatch_reports_at(Local::now());
        if collected > 0 {
            self.board.publish_log(&self.log);
        }
        collected
    }

    fn collect_dispatch_reports_at(&mut self, now: DateTime<Local>) -> usize {
        let mut collected = 0;
        while let Ok(report) = self.reports_rx.try_recv() {
            let entry = match report.outcome {
                Ok(DispatchOutcome::Sent) => {
                    info!("Alert sent via {}", report.dispatcher);
                    let details = format!("Notified {}", display_contact(&report.notice.contact));
                    LogEntry::new(now, EventType::AlertSent, details)
                }
                Ok(DispatchOutcome::Skipped(reason)) => {
                    info!("Alert skipped: {reason}");
                    LogEntry::new(now, EventType::AlertSkipped, reason)
                }
                Err(e) => {
                    error!("Alert dispatch via {} failed: {e}", report.dispatcher);
                    LogEntry::new(now, EventType::AlertFailed, e.to_string())
                }
            };
            self.record(entry);
            collected += 1;
        }
        collected
    }

    fn on_alert_started(&mut self, start_time: DateTime<Local>, intensity: f64) {
        warn!("SEIZURE DETECTED (intensity {intensity:.1})");
        self.record(LogEntry::new(
            start_time,
            EventType::SeizureDetected,
            format!("Initial Intensity: {intensity:.1}"),
        ));

        let notice = AlertNotice {
            contact: self.contact.clone(),
            message: self.message.clone(),
            start_time,
            intensity,
        };
        spawn_dispatch(Arc::clone(&self.dispatcher), notice, self.reports_tx.clone());
    }

    fn on_alert_ended(&mut self, event: &SeizureEvent) {
        info!(
            "Seizure ended after {:.1}s (max intensity {:.1})",
            event.duration_seconds, event.max_intensity
        );
        self.record(
            LogEntry::new(
                event.end_time,
                EventType::SeizureEnded,
                format!("Max Intensity: {:.1}", event.max_intensity),
            )
            .with_duration(event.duration_seconds),
        );
    }

    fn record(&mut self, entry: LogEntry) {
        debug!("Logged: {} - {}", entry.event_type, entry.details);
        self.log.append(entry);
    }

    fn publish(&self, metrics: Option<&FrameMetrics>) {
        let progress = if self.machine.is_active() {
            1.0
        } else {
            f64::from(self.machine.counter()) / f64::from(self.settings.confirmation_frames)
        };

        self.board.publish_status(DetectionStatus {
            seizure_detected: self.machine.is_active(),
            debug_shakes: metrics.map_or(0.0, |m| m.avg_oscillation),
            debug_energy: metrics.map_or(0.0, |m| m.avg_amplitude),
            alert_state: self.machine.state(),
            confirmation_progress: progress.clamp(0.0, 1.0),
            ..DetectionStatus::default()
        });
    }

    /// Handle for reading published status and log snapshots
    #[must_use]
    pub fn status_board(&self) -> StatusBoard {
        self.board.clone()
    }

    /// Latest published status
    #[must_use]
    pub fn status(&self) -> Arc<DetectionStatus> {
        self.board.status()
    }

    /// Event log
    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Current alert state
    #[must_use]
    pub fn state(&self) -> AlertState {
        self.machine.state()
    }

    /// Current confirmation counter
    #[must_use]
    pub fn confirmation_counter(&self) -> u32 {
        self.machine.counter()
    }

    /// Current emergency contact
    #[must_use]
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Frames processed so far
    #[must_use]
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}

fn display_contact(contact: &str) -> &str {
    if contact.is_empty() {
        "<no contact>"
    } else {
        contact
    }
}
