//! Append-only session log and its tabular export.

use crate::constants::{DURATION_PLACEHOLDER, TIMESTAMP_FORMAT};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Kind of logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventType {
    /// Monitoring session started
    SystemStarted,
    /// Alert raised
    SeizureDetected,
    /// Alert cleared
    SeizureEnded,
    /// Notification delivered
    AlertSent,
    /// Notification not attempted
    AlertSkipped,
    /// Notification attempt failed
    AlertFailed,
    /// Emergency contact changed
    ContactUpdated,
}

impl EventType {
    /// Label used in exports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SystemStarted => "System Started",
            Self::SeizureDetected => "SEIZURE DETECTED",
            Self::SeizureEnded => "Seizure Ended",
            Self::AlertSent => "Alert Sent",
            Self::AlertSkipped => "Alert Skipped",
            Self::AlertFailed => "Alert Failed",
            Self::ContactUpdated => "Contact Updated",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One log record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// When the event was recorded
    pub timestamp: DateTime<Local>,
    /// Event kind
    pub event_type: EventType,
    /// Free-form details
    pub details: String,
    /// Duration for events that span time
    pub duration_seconds: Option<f64>,
}

impl LogEntry {
    /// Create an entry without a duration
    pub fn new(timestamp: DateTime<Local>, event_type: EventType, details: impl Into<String>) -> Self {
        Self {
            timestamp,
            event_type,
            details: details.into(),
            duration_seconds: None,
        }
    }

    /// Attach a duration in seconds
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    fn to_row(&self) -> ExportRow {
        let duration = match self.duration_seconds {
            Some(seconds) if seconds > 0.0 => format!("{seconds:.1}"),
            _ => DURATION_PLACEHOLDER.to_string(),
        };

        ExportRow {
            timestamp: self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            event: self.event_type.label().to_string(),
            details: self.details.clone(),
            duration,
        }
    }
}

/// Column names of the export
pub const EXPORT_HEADER: [&str; 4] = ["Timestamp", "Event", "Details", "Duration (sec)"];

/// One exported row, all columns rendered as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// Formatted timestamp
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    /// Event label
    #[serde(rename = "Event")]
    pub event: String,
    /// Details column
    #[serde(rename = "Details")]
    pub details: String,
    /// Duration with one decimal, or a placeholder
    #[serde(rename = "Duration (sec)")]
    pub duration: String,
}

impl ExportRow {
    /// Columns in header order
    #[must_use]
    pub fn columns(&self) -> [&str; 4] {
        [
            self.timestamp.as_str(),
            self.event.as_str(),
            self.details.as_str(),
            self.duration.as_str(),
        ]
    }
}

/// Ordered, append-only event log.
///
/// Entries are immutable once appended and shared between clones, so a
/// published copy of the log never duplicates entry contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    entries: Vec<Arc<LogEntry>>,
}

impl EventLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(Arc::new(entry));
    }

    /// All entries in append order
    #[must_use]
    pub fn entries(&self) -> &[Arc<LogEntry>] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last().map(|entry| &**entry)
    }

    /// Rows in append order, rendered lazily.
    ///
    /// The header is not included; see [`EXPORT_HEADER`].
    pub fn export_rows(&self) -> impl Iterator<Item = ExportRow> + Clone + '_ {
        self.entries.iter().map(|entry| entry.to_row())
    }

    /// Render header and rows as CSV text
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_csv_line(&mut out, &EXPORT_HEADER);
        for row in self.export_rows() {
            push_csv_line(&mut out, &row.columns());
        }
        out
    }
}

fn push_csv_line(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(second: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 1, 10, 0, second)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn test_empty_log_exports_header_only() {
        let log = EventLog::new();
        assert_eq!(log.export_rows().count(), 0);
        assert_eq!(log.to_csv(), "Timestamp,Event,Details,Duration (sec)\r\n");
    }

    #[test]
    fn test_rows_follow_append_order() {
        let mut log = EventLog::new();
        log.append(LogEntry::new(at(0), EventType::SystemStarted, "Monitoring Initialized"));
        log.append(LogEntry::new(at(5), EventType::SeizureDetected, "Initial Intensity: 12.0"));
        log.append(LogEntry::new(at(9), EventType::SeizureEnded, "Max Intensity: 14.2").with_duration(4.04));

        let rows: Vec<ExportRow> = log.export_rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].event, "System Started");
        assert_eq!(rows[0].duration, "-");
        assert_eq!(rows[0].timestamp, "2024-05-01 10:00:00");
        assert_eq!(rows[2].event, "Seizure Ended");
        assert_eq!(rows[2].duration, "4.0");
    }

    #[test]
    fn test_export_is_restartable() {
        let mut log = EventLog::new();
        log.append(LogEntry::new(at(1), EventType::AlertSent, "ok"));

        let rows = log.export_rows();
        let first: Vec<_> = rows.clone().collect();
        let second: Vec<_> = rows.collect();
        assert_eq!(first, second);
        assert_eq!(first, log.export_rows().collect::<Vec<_>>());
    }

    #[test]
    fn test_clone_shares_entries() {
        let mut log = EventLog::new();
        log.append(LogEntry::new(at(0), EventType::SystemStarted, "Monitoring Initialized"));
        let copy = log.clone();
        log.append(LogEntry::new(at(3), EventType::ContactUpdated, "+1"));

        assert_eq!(copy.len(), 1);
        assert_eq!(log.len(), 2);
        assert!(Arc::ptr_eq(&copy.entries()[0], &log.entries()[0]));
    }

    #[test]
    fn test_zero_duration_uses_placeholder() {
        let entry = LogEntry::new(at(0), EventType::SeizureEnded, "").with_duration(0.0);
        assert_eq!(entry.to_row().duration, DURATION_PLACEHOLDER);
    }

    #[test]
    fn test_csv_quoting() {
        let mut log = EventLog::new();
        log.append(LogEntry::new(at(2), EventType::AlertFailed, "exit status 1, \"busy\""));
        let csv = log.to_csv();
        assert!(csv.ends_with("Alert Failed,\"exit status 1, \"\"busy\"\"\",-\r\n"));
    }
}
