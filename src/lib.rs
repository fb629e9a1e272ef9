//! # Luxwatch - Street light telemetry monitor
//!
//! Continuously samples a remote sensor feed, classifies the operating
//! state of a monitored street light, detects state transitions, and
//! raises a de-duplicated alert exactly once per transition.
//!
//! ## Key Properties
//!
//! - **Pure classification**: the device pre-computes its status; mapping
//!   it to a state enum is total and never fails
//! - **Exactly-one alert per transition**: repeated observations never
//!   re-alert, and the cold-start observation is never alertable
//! - **Restart-safe**: the last-known status is persisted, so a process
//!   restart does not replay alerts
//! - **Bounded polling**: two independent cycles (fast status refresh,
//!   slow status + history refresh) with skip-if-busy overlap suppression
//!
//! ## Quick Start
//!
//! ```rust
//! use luxwatch::{Alert, MemoryStatusStore, OperatingStatus, Sample, StateTracker};
//!
//! // One reading from the feed, fields as the wire carries them.
//! let sample = Sample::from_fields(
//!     Some("2025-06-01T21:30:00Z"),
//!     Some("812.5"),
//!     Some("14.2"),
//!     Some("1"),
//! );
//! let status = OperatingStatus::classify(&sample);
//! assert_eq!(status, OperatingStatus::On);
//!
//! // Track transitions against the persisted last-known status.
//! let mut tracker = StateTracker::new(MemoryStatusStore::new());
//! let first = tracker.observe(status).unwrap();
//! assert!(!first.alertable()); // first observation after cold start
//!
//! let transition = tracker.observe(OperatingStatus::Flicker).unwrap();
//! assert!(transition.alertable());
//! let alert = Alert::for_transition(&transition);
//! assert_eq!(alert.title, "STREET LIGHT FLICKERING");
//! ```
//!
//! Continuous monitoring runs through [`PollingScheduler`], which owns the
//! fetch + classify + track pipeline and hands back a [`PollingSession`]
//! for the presentation layer to read from and to stop deterministically.
//!
//! ## Modules
//!
//! - [`sample`]: telemetry reading model and lenient field parsing
//! - [`status`]: operating status enum and pure classifier
//! - [`source`]: telemetry source seam and ThingSpeak HTTP client
//! - [`history`]: bounded trend window of recent samples
//! - [`tracker`]: transition detection over the persisted last status
//! - [`alert`]: alert composition and delivery seam
//! - [`scheduler`]: fast/slow polling cycles and session control
//! - [`config`]: polling and history configuration
//! - [`error`]: error taxonomy

// Modules
pub mod alert;
pub mod config;
pub mod error;
pub mod history;
pub mod sample;
pub mod scheduler;
pub mod source;
pub mod status;
pub mod tracker;

// Re-exports for convenient access
pub use alert::{Alert, AlertSink, LogAlertSink};
pub use config::MonitorConfig;
pub use error::{LuxwatchError, Result, SourceError, StoreError};
pub use history::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};
pub use sample::Sample;
pub use scheduler::{FeedUpdate, PollingScheduler, PollingSession};
pub use source::{SourceConfig, TelemetrySource, ThingSpeakSource, DEFAULT_BASE_URL};
pub use status::{OperatingStatus, SeverityColor};
pub use tracker::{FileStatusStore, MemoryStatusStore, StateTracker, StatusStore, Transition};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
