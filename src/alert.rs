//! Transition alerts
//!
//! Builds the human-readable alert for a confirmed status transition and
//! defines the delivery seam. De-duplication is *not* done here: the
//! polling scheduler's gate is the sole authority, and a sink must tolerate
//! being called any number of times.

use log::info;

use crate::status::{OperatingStatus, SeverityColor};
use crate::tracker::Transition;

/// A user-facing transition alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Short headline
    pub title: String,
    /// Full message body
    pub body: String,
    /// Severity color of the new status
    pub color: SeverityColor,
    /// Status before the transition
    pub previous: OperatingStatus,
    /// Status after the transition
    pub current: OperatingStatus,
}

impl Alert {
    /// Compose the alert for a transition.
    pub fn for_transition(transition: &Transition) -> Self {
        let previous = transition.previous;
        let current = transition.current;

        let (title, body) = match current {
            OperatingStatus::Off => (
                "STREET LIGHT OFF".to_string(),
                format!("Street light status changed from {previous} to OFF"),
            ),
            OperatingStatus::On => (
                "STREET LIGHT ON".to_string(),
                format!("Street light status changed from {previous} to ON"),
            ),
            OperatingStatus::Flicker => (
                "STREET LIGHT FLICKERING".to_string(),
                format!("ALERT: Street light is flickering! (was {previous})"),
            ),
            OperatingStatus::Unknown => (
                "Street light status".to_string(),
                format!("Status changed from {previous} to {current}"),
            ),
        };

        Self {
            title,
            body,
            color: current.severity_color(),
            previous,
            current,
        }
    }
}

/// Delivery seam for transition alerts.
///
/// Fire-and-forget: delivery failures are the collaborator's to log, never
/// propagated back to block polling.
pub trait AlertSink: Send + Sync {
    /// Deliver one alert.
    fn notify(&self, alert: &Alert);
}

/// Sink that reports alerts through the `log` facade.
///
/// Stand-in for platform notification delivery, which lives outside this
/// crate.
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn notify(&self, alert: &Alert) {
        info!("{}: {}", alert.title, alert.body);
    }
}
