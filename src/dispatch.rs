//! Alert notification dispatch.
//!
//! Notifications run on their own thread so a slow or failing channel never
//! stalls frame processing. The outcome travels back over a channel and is
//! recorded by the engine on a later frame.

use crate::config::AlertConfig;
use crate::{Error, Result};
use chrono::{DateTime, Local};
use log::{error, info, warn};
use std::process::Command;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

/// Content of one alert notification
#[derive(Debug, Clone, PartialEq)]
pub struct AlertNotice {
    /// Emergency contact, empty when none is configured
    pub contact: String,
    /// Message text
    pub message: String,
    /// When the alert was raised
    pub start_time: DateTime<Local>,
    /// Mean amplitude at the moment of triggering
    pub intensity: f64,
}

/// Result of a notification attempt that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Notification delivered
    Sent,
    /// Notification intentionally not attempted
    Skipped(String),
}

/// Outcome of one dispatch, reported back to the engine
#[derive(Debug)]
pub struct DispatchReport {
    /// Dispatcher that handled the notice
    pub dispatcher: String,
    /// The notice that was dispatched
    pub notice: AlertNotice,
    /// What happened
    pub outcome: Result<DispatchOutcome>,
}

/// Channel able to notify someone about an alert
pub trait AlertDispatcher: Send + Sync {
    /// Deliver one notification
    ///
    /// # Errors
    ///
    /// Returns `DispatchError` if delivery failed.
    fn notify(&self, notice: &AlertNotice) -> Result<DispatchOutcome>;

    /// Dispatcher name for logs
    fn name(&self) -> &str;
}

/// Dispatcher that only writes the alert to the application log
pub struct LogDispatcher;

impl AlertDispatcher for LogDispatcher {
    fn notify(&self, notice: &AlertNotice) -> Result<DispatchOutcome> {
        if notice.contact.is_empty() {
            info!("No contact number set. Alert logged only.");
        }
        warn!(
            "ALERT for {}: {} (intensity {:.1})",
            if notice.contact.is_empty() { "<none>" } else { notice.contact.as_str() },
            notice.message,
            notice.intensity
        );
        Ok(DispatchOutcome::Sent)
    }

    fn name(&self) -> &str {
        "LogDispatcher"
    }
}

/// Dispatcher that runs an external program per alert.
///
/// The program is called as `<program> <args..> <contact> <message>` and must
/// exit successfully.
pub struct CommandDispatcher {
    program: String,
    args: Vec<String>,
}

impl CommandDispatcher {
    /// Create a dispatcher running `program` with leading `args`
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl AlertDispatcher for CommandDispatcher {
    fn notify(&self, notice: &AlertNotice) -> Result<DispatchOutcome> {
        if notice.contact.is_empty() {
            info!("No contact number set. Skipping alert.");
            return Ok(DispatchOutcome::Skipped("No contact number set".to_string()));
        }

        info!("Alerting {} via {}", notice.contact, self.program);
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&notice.contact)
            .arg(&notice.message)
            .status()
            .map_err(|e| Error::DispatchError(format!("Failed to run {}: {e}", self.program)))?;

        if status.success() {
            Ok(DispatchOutcome::Sent)
        } else {
            Err(Error::DispatchError(format!("{} exited with {status}", self.program)))
        }
    }

    fn name(&self) -> &str {
        "CommandDispatcher"
    }
}

/// Create the dispatcher described by the alert configuration
#[must_use]
pub fn create_dispatcher(config: &AlertConfig) -> Arc<dyn AlertDispatcher> {
    match &config.command {
        Some(program) => Arc::new(CommandDispatcher::new(program.clone(), config.args.clone())),
        None => Arc::new(LogDispatcher),
    }
}

/// Normalise a contact number to international form with a leading `+`.
///
/// Surrounding whitespace is trimmed; an empty input stays empty.
#[must_use]
pub fn normalize_contact(number: &str) -> String {
    let number = number.trim();
    if number.is_empty() || number.starts_with('+') {
        number.to_string()
    } else {
        format!("+{number}")
    }
}

/// Run `dispatcher` for `notice` on a background thread.
///
/// The outcome is sent on `reports`; a closed receiver is ignored. If the
/// thread cannot be started a failed report is sent instead.
pub fn spawn_dispatch(dispatcher: Arc<dyn AlertDispatcher>, notice: AlertNotice, reports: Sender<DispatchReport>) {
    let name = dispatcher.name().to_string();
    let fallback = (notice.clone(), reports.clone());
    let spawned = thread::Builder::new().name("alert-dispatch".to_string()).spawn(move || {
        let outcome = dispatcher.notify(&notice);
        let report = DispatchReport {
            dispatcher: dispatcher.name().to_string(),
            notice,
            outcome,
        };
        let _ = reports.send(report);
    });

    if let Err(e) = spawned {
        error!("Failed to start dispatch thread for {name}: {e}");
        let (notice, reports) = fallback;
        let _ = reports.send(spawn_failure_report(name, notice, &e));
    }
}

fn spawn_failure_report(dispatcher: String, notice: AlertNotice, cause: &std::io::Error) -> DispatchReport {
    DispatchReport {
        dispatcher,
        notice,
        outcome: Err(Error::DispatchError(format!("Failed to start dispatch thread: {cause}"))),
    }
}
