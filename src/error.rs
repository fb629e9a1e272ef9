//! Error types for luxwatch
//!
//! Failures split by concern: the telemetry source (network, upstream API)
//! and the status store (persistence). Field-level parse failures are not
//! errors at all; they are recovered locally in [`crate::sample`] with
//! defaults and sentinels. Nothing in this crate is fatal: every failure is
//! reported and retried on the next scheduled tick.

use thiserror::Error;

/// Result type alias for luxwatch operations
pub type Result<T> = std::result::Result<T, LuxwatchError>;

/// Main error type for luxwatch operations
#[derive(Error, Debug)]
pub enum LuxwatchError {
    /// Telemetry source error
    #[error("Telemetry source error: {0}")]
    Source(#[from] SourceError),

    /// Status store error
    #[error("Status store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from the telemetry source
///
/// Clone + PartialEq so a failure can be published as a value to the
/// presentation layer and compared in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The channel has no data at all
    #[error("No data available from channel {channel}")]
    NotFound { channel: String },

    /// Network or transport failure
    #[error("Channel unreachable: {reason}")]
    Unreachable { reason: String },

    /// Non-2xx response or a body that does not match the expected schema
    #[error("Bad response from channel {channel}: {reason}")]
    BadResponse { channel: String, reason: String },
}

/// Errors from the persisted status store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Failed to write the last-known status
    #[error("Failed to persist status to {path}: {reason}")]
    Write { path: String, reason: String },
}
