// LUXWATCH - Street light telemetry monitor
// Copyright (c) 2025 Luxwatch contributors
//
// Licensed under the MIT license.

//! Operating status classification
//!
//! Maps raw samples to the small state enum the rest of the crate works
//! with. The device pre-computes its own status code upstream, so
//! classification is a pure code lookup; light level and variability are
//! informational only.

use std::fmt;

use crate::sample::Sample;

/// Classified state of the monitored street light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperatingStatus {
    /// Light is off (low and stable signal).
    Off,
    /// Light is on (high and stable signal).
    On,
    /// Light is flickering (unstable signal).
    Flicker,
    /// Unrecognized or missing status code, and the tracker's cold-start
    /// state before any sample has been observed.
    #[default]
    Unknown,
}

impl OperatingStatus {
    /// Classify a sample. Pure and total: never panics, unrecognized input
    /// always yields [`OperatingStatus::Unknown`].
    pub fn classify(sample: &Sample) -> Self {
        Self::from_code(sample.status_code)
    }

    /// The status code mapping itself: 0 is off, 1 is on, 2 is flicker,
    /// anything else is unknown.
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::Off,
            Some(1) => Self::On,
            Some(2) => Self::Flicker,
            _ => Self::Unknown,
        }
    }

    /// Parse the persisted string form. Total: unrecognized input degrades
    /// to [`OperatingStatus::Unknown`] rather than failing.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "OFF" => Self::Off,
            "ON" => Self::On,
            "FLICKER" => Self::Flicker,
            _ => Self::Unknown,
        }
    }

    /// Stable string form, used for persistence and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Flicker => "FLICKER",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Severity color associated with this status, consumed by alerts and
    /// the presentation layer.
    pub fn severity_color(&self) -> SeverityColor {
        match self {
            Self::Off => SeverityColor::Red,
            Self::On => SeverityColor::Green,
            Self::Flicker => SeverityColor::Yellow,
            Self::Unknown => SeverityColor::Gray,
        }
    }
}

impl fmt::Display for OperatingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity color carried on alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityColor {
    Red,
    Green,
    Yellow,
    Gray,
}
