// LUXWATCH - Street light telemetry monitor
// Copyright (c) 2025 Luxwatch contributors
//
// Licensed under the MIT license.

//! State tracking and transition detection
//!
//! The tracker holds the last-observed operating status, durable across
//! process restarts through a [`StatusStore`]. Each new classification is
//! compared against it; a difference is persisted first, then reported as a
//! [`Transition`].
//!
//! A transition is *structural* whenever the status differs from the
//! previous one, but only *alertable* when the previous status was already
//! known. Conflating the two would fire a spurious alert on every cold
//! start, so the distinction is kept explicit on [`Transition`].

use std::fs;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::status::OperatingStatus;

/// Persistence seam for the last-known status.
///
/// A single process-wide value with single-writer-at-a-time access,
/// serialized by the tracker's owner.
pub trait StatusStore {
    /// Load the persisted status. Infallible by policy: a missing or
    /// unreadable entry degrades to [`OperatingStatus::Unknown`], which is
    /// exactly the cold-start state.
    fn load(&self) -> OperatingStatus;

    /// Persist a confirmed transition's new status.
    fn save(&mut self, status: OperatingStatus) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStatusStore {
    status: OperatingStatus,
}

impl MemoryStatusStore {
    /// Create a store starting from the cold-start state.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusStore for MemoryStatusStore {
    fn load(&self) -> OperatingStatus {
        self.status
    }

    fn save(&mut self, status: OperatingStatus) -> Result<(), StoreError> {
        self.status = status;
        Ok(())
    }
}

/// File-backed store holding the status string in a single small file.
#[derive(Debug, Clone)]
pub struct FileStatusStore {
    path: PathBuf,
}

impl FileStatusStore {
    /// Create a store backed by the given path. The file is created on the
    /// first confirmed transition.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StatusStore for FileStatusStore {
    fn load(&self) -> OperatingStatus {
        match fs::read_to_string(&self.path) {
            Ok(raw) => OperatingStatus::from_name(&raw),
            // First run, or unreadable entry: cold-start state.
            Err(_) => OperatingStatus::Unknown,
        }
    }

    fn save(&mut self, status: OperatingStatus) -> Result<(), StoreError> {
        fs::write(&self.path, status.as_str()).map_err(|err| StoreError::Write {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        })
    }
}

/// Result of observing a new classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// True when the status differs from the previously observed one
    pub changed: bool,
    /// Status observed before this observation
    pub previous: OperatingStatus,
    /// Status just observed
    pub current: OperatingStatus,
}

impl Transition {
    /// Whether this transition warrants a user-visible alert.
    ///
    /// The first observation after a cold start reports `changed` but is
    /// never alertable; the point of first observation is not a change
    /// worth alerting on.
    pub fn alertable(&self) -> bool {
        self.changed && self.previous != OperatingStatus::Unknown
    }
}

/// Tracks the last-observed status and detects transitions.
#[derive(Debug)]
pub struct StateTracker<S: StatusStore> {
    store: S,
    previous: OperatingStatus,
}

impl<S: StatusStore> StateTracker<S> {
    /// Create a tracker, loading the last-known status from the store.
    pub fn new(store: S) -> Self {
        let previous = store.load();
        Self { store, previous }
    }

    /// Last-observed status
    pub fn previous(&self) -> OperatingStatus {
        self.previous
    }

    /// Compare a new classification against the last-observed status.
    ///
    /// An unchanged status returns `changed: false` and touches nothing. A
    /// changed status is persisted before the in-memory value is updated,
    /// so a failed write leaves the tracker exactly as it was and the same
    /// transition is re-detected on the next tick.
    pub fn observe(&mut self, current: OperatingStatus) -> Result<Transition, StoreError> {
        if current == self.previous {
            return Ok(Transition {
                changed: false,
                previous: self.previous,
                current,
            });
        }

        self.store.save(current)?;
        let previous = std::mem::replace(&mut self.previous, current);
        Ok(Transition {
            changed: true,
            previous,
            current,
        })
    }
}
