//! Telemetry sample model
//!
//! One reading from the sensor feed: a timestamp, the measured light level,
//! its short-term variability, and the status code the device itself
//! computed. Field parsing is lenient by policy: a malformed field degrades
//! to a default or sentinel, it never discards the sample.

use chrono::{DateTime, Utc};

/// One telemetry reading, immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Reading time in UTC. `None` is the "unknown time" sentinel used when
    /// the upstream timestamp is absent or unparseable.
    pub timestamp: Option<DateTime<Utc>>,
    /// Measured light level. 0.0 when the source field is absent or
    /// non-numeric.
    pub light_level: f32,
    /// Short-term variability of the light level, same default rule.
    pub variability: f32,
    /// Device-computed status code, the source of truth for classification.
    pub status_code: Option<i32>,
}

impl Sample {
    /// Create a sample from already-parsed values.
    pub fn new(
        timestamp: Option<DateTime<Utc>>,
        light_level: f32,
        variability: f32,
        status_code: Option<i32>,
    ) -> Self {
        Self {
            timestamp,
            light_level,
            variability,
            status_code,
        }
    }

    /// Build a sample from the raw optional string fields the feed carries.
    ///
    /// Total over all inputs: every field recovers locally on parse failure
    /// (timestamp -> `None`, numerics -> 0.0, status code -> `None`).
    pub fn from_fields(
        created_at: Option<&str>,
        light_level: Option<&str>,
        variability: Option<&str>,
        status_code: Option<&str>,
    ) -> Self {
        Self {
            timestamp: created_at.and_then(parse_timestamp),
            light_level: parse_numeric(light_level),
            variability: parse_numeric(variability),
            status_code: status_code.and_then(|s| s.trim().parse().ok()),
        }
    }

    /// Human-readable reading time, or the sentinel text when unknown.
    pub fn timestamp_display(&self) -> String {
        match self.timestamp {
            Some(ts) => ts.format("%b %d, %H:%M").to_string(),
            None => "UNKNOWN TIME".to_string(),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

fn parse_numeric(raw: Option<&str>) -> f32 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0.0)
}
