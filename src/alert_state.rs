//! Debounced alert state machine.
//!
//! Shaking frames push a confirmation counter up by one, calm frames pull it
//! down by `decay_step`. When the counter reaches `confirmation_frames` the
//! alert becomes active and stays so for exactly `hold_frames` further
//! frames, regardless of what the metrics do in the meantime.

use crate::motion_analyzer::{FrameMetrics, ShakeCriteria};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Externally visible alert state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertState {
    /// No shaking evidence
    Idle,
    /// Shaking evidence is accumulating
    Confirming,
    /// Alert raised and held
    Active,
}

/// Tuning of the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertSettings {
    /// Per-frame shaking thresholds
    pub criteria: ShakeCriteria,
    /// Counter value that raises the alert
    pub confirmation_frames: u32,
    /// Counter decrement on a non-shaking frame
    pub decay_step: u32,
    /// Frames the alert is held once raised
    pub hold_frames: u32,
}

/// Completed alert cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeizureEvent {
    /// When the alert was raised
    pub start_time: DateTime<Local>,
    /// When the alert cleared
    pub end_time: DateTime<Local>,
    /// Wall time between start and end
    pub duration_seconds: f64,
    /// Highest mean amplitude observed while active
    pub max_intensity: f64,
}

/// One-shot signal produced on an alert edge
#[derive(Debug, Clone, PartialEq)]
pub enum AlertSignal {
    /// Alert raised this frame
    Started {
        /// Start timestamp of the event
        start_time: DateTime<Local>,
        /// Mean amplitude at the moment of triggering
        intensity: f64,
    },
    /// Alert cleared this frame
    Ended(SeizureEvent),
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveEvent {
    start_time: DateTime<Local>,
    max_intensity: f64,
}

/// Alert state machine
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlertMachine {
    counter: u32,
    hold_timer: u32,
    current: Option<ActiveEvent>,
}

impl AlertMachine {
    /// Create an idle machine
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current externally visible state
    #[must_use]
    pub fn state(&self) -> AlertState {
        if self.current.is_some() {
            AlertState::Active
        } else if self.counter > 0 {
            AlertState::Confirming
        } else {
            AlertState::Idle
        }
    }

    /// Current confirmation counter
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Frames left before an active alert clears, 0 when not active
    #[must_use]
    pub fn hold_remaining(&self) -> u32 {
        self.hold_timer
    }

    /// Whether an alert is currently raised
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Compute the next machine and any edge signal for one frame.
    ///
    /// `metrics` is `None` when the windows are not yet full; such frames
    /// count as non-shaking.
    #[must_use]
    pub fn transition(
        &self,
        settings: &AlertSettings,
        metrics: Option<&FrameMetrics>,
        now: DateTime<Local>,
    ) -> (Self, Option<AlertSignal>) {
        let mut next = self.clone();
        let amplitude = metrics.map(|m| m.avg_amplitude);

        if let Some(mut event) = next.current.take() {
            if let Some(amplitude) = amplitude {
                if amplitude > event.max_intensity {
                    event.max_intensity = amplitude;
                }
            }

            next.hold_timer = next.hold_timer.saturating_sub(1);
            if next.hold_timer > 0 {
                next.current = Some(event);
                return (next, None);
            }

            next.counter = 0;
            let elapsed = now.signed_duration_since(event.start_time);
            #[allow(clippy::cast_precision_loss)]
            let duration_seconds = (elapsed.num_milliseconds() as f64 / 1000.0).max(0.0);
            let ended = SeizureEvent {
                start_time: event.start_time,
                end_time: now,
                duration_seconds,
                max_intensity: event.max_intensity,
            };
            return (next, Some(AlertSignal::Ended(ended)));
        }

        let shaking = metrics.is_some_and(|m| m.is_shaking(&settings.criteria));
        next.counter = if shaking {
            (next.counter + 1).min(settings.confirmation_frames)
        } else {
            next.counter.saturating_sub(settings.decay_step)
        };

        if next.counter < settings.confirmation_frames {
            return (next, None);
        }

        let intensity = amplitude.unwrap_or(0.0);
        next.hold_timer = settings.hold_frames;
        next.current = Some(ActiveEvent {
            start_time: now,
            max_intensity: intensity,
        });

        (next, Some(AlertSignal::Started { start_time: now, intensity }))
    }

    /// Apply [`AlertMachine::transition`] in place
    pub fn step(
        &mut self,
        settings: &AlertSettings,
        metrics: Option<&FrameMetrics>,
        now: DateTime<Local>,
    ) -> Option<AlertSignal> {
        let (next, signal) = self.transition(settings, metrics, now);
        *self = next;
        signal
    }
}
