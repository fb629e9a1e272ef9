// LUXWATCH - Street light telemetry monitor
// Copyright (c) 2025 Luxwatch contributors
//
// Licensed under the MIT license.

//! Polling scheduler
//!
//! Drives the two refresh cycles against the telemetry source:
//!
//! - **Fast cycle**: fetch the latest sample, classify it, run it through
//!   the state tracker and alert on an alertable transition.
//! - **Slow cycle**: the same latest-sample refresh, then a history fetch
//!   that replaces the trend buffer.
//!
//! Each cycle is skip-if-busy: a tick arriving while the previous run is
//! still executing is dropped, never queued, so resource use stays bounded
//! under slow networks. Fetch failures are published to the presentation
//! layer as a tagged [`FeedUpdate::Failed`] value and the cycle keeps
//! ticking. Both cycles observe through the same tracker, serialized by an
//! async mutex so two concurrent observations cannot both claim the same
//! transition.
//!
//! A [`PollingSession`] owns the spawned cycles and stops them
//! deterministically: [`PollingSession::stop`] (or dropping the session)
//! cancels both timers immediately and discards any in-flight fetch.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::alert::{Alert, AlertSink};
use crate::config::MonitorConfig;
use crate::error::SourceError;
use crate::history::HistoryBuffer;
use crate::sample::Sample;
use crate::source::TelemetrySource;
use crate::status::OperatingStatus;
use crate::tracker::{StateTracker, StatusStore};

/// Latest cycle outcome, published to the presentation layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeedUpdate {
    /// No cycle has completed yet
    #[default]
    Idle,
    /// Latest sample fetched and classified
    Latest {
        status: OperatingStatus,
        sample: Sample,
    },
    /// The last fetch failed; previously published data remains valid
    Failed(SourceError),
}

/// Drives periodic fetch + classify + track against a telemetry source.
pub struct PollingScheduler<S, P>
where
    S: TelemetrySource + 'static,
    P: StatusStore + Send + 'static,
{
    source: Arc<S>,
    tracker: Arc<Mutex<StateTracker<P>>>,
    sink: Arc<dyn AlertSink>,
    config: MonitorConfig,
}

impl<S, P> PollingScheduler<S, P>
where
    S: TelemetrySource + 'static,
    P: StatusStore + Send + 'static,
{
    /// Create a scheduler with the default configuration.
    pub fn new(source: S, tracker: StateTracker<P>, sink: Arc<dyn AlertSink>) -> Self {
        Self::with_config(source, tracker, sink, MonitorConfig::default())
    }

    /// Create a scheduler with a custom configuration.
    pub fn with_config(
        source: S,
        tracker: StateTracker<P>,
        sink: Arc<dyn AlertSink>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            source: Arc::new(source),
            tracker: Arc::new(Mutex::new(tracker)),
            sink,
            config,
        }
    }

    /// Start both cycles and hand back the session controlling them.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> PollingSession {
        let cancel = CancellationToken::new();
        let (updates_tx, updates_rx) = watch::channel(FeedUpdate::Idle);
        let updates_tx = Arc::new(updates_tx);
        let history = Arc::new(Mutex::new(HistoryBuffer::new(self.config.history_capacity)));

        let fast = tokio::spawn(run_fast_cycle(
            Arc::clone(&self.source),
            Arc::clone(&self.tracker),
            Arc::clone(&self.sink),
            Arc::clone(&updates_tx),
            self.config.fast_interval,
            cancel.clone(),
        ));

        let slow = tokio::spawn(run_slow_cycle(
            Arc::clone(&self.source),
            Arc::clone(&self.tracker),
            Arc::clone(&self.sink),
            Arc::clone(&updates_tx),
            Arc::clone(&history),
            self.config.slow_interval,
            self.config.history_results,
            cancel.clone(),
        ));

        PollingSession {
            cancel,
            fast,
            slow,
            updates: updates_rx,
            history,
        }
    }
}

/// Handle over one active polling session.
///
/// Stopping (or dropping) the session cancels both cycles' pending timers
/// immediately; an in-flight fetch is discarded along with its result.
pub struct PollingSession {
    cancel: CancellationToken,
    fast: JoinHandle<()>,
    slow: JoinHandle<()>,
    updates: watch::Receiver<FeedUpdate>,
    history: Arc<Mutex<HistoryBuffer>>,
}

impl PollingSession {
    /// Subscribe to cycle outcomes.
    pub fn updates(&self) -> watch::Receiver<FeedUpdate> {
        self.updates.clone()
    }

    /// Most recently published cycle outcome.
    pub fn latest(&self) -> FeedUpdate {
        self.updates.borrow().clone()
    }

    /// Read-only copy of the current trend window.
    pub async fn history(&self) -> Vec<Sample> {
        self.history.lock().await.snapshot()
    }

    /// Stop both cycles. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// True once both cycle tasks have exited.
    pub fn is_stopped(&self) -> bool {
        self.fast.is_finished() && self.slow.is_finished()
    }

    /// Stop both cycles and wait for them to exit.
    pub async fn join(mut self) {
        self.cancel.cancel();
        let _ = (&mut self.fast).await;
        let _ = (&mut self.slow).await;
    }
}

impl Drop for PollingSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_fast_cycle<S, P>(
    source: Arc<S>,
    tracker: Arc<Mutex<StateTracker<P>>>,
    sink: Arc<dyn AlertSink>,
    updates: Arc<watch::Sender<FeedUpdate>>,
    period: Duration,
    cancel: CancellationToken,
) where
    S: TelemetrySource,
    P: StatusStore + Send,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = refresh_latest(&*source, &tracker, &*sink, &updates) => {}
        }
    }
    debug!("fast cycle stopped");
}

#[allow(clippy::too_many_arguments)]
async fn run_slow_cycle<S, P>(
    source: Arc<S>,
    tracker: Arc<Mutex<StateTracker<P>>>,
    sink: Arc<dyn AlertSink>,
    updates: Arc<watch::Sender<FeedUpdate>>,
    history: Arc<Mutex<HistoryBuffer>>,
    period: Duration,
    history_results: usize,
    cancel: CancellationToken,
) where
    S: TelemetrySource,
    P: StatusStore + Send,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = async {
                refresh_latest(&*source, &tracker, &*sink, &updates).await;
                refresh_history(&*source, &history, history_results, &updates).await;
            } => {}
        }
    }
    debug!("slow cycle stopped");
}

/// One latest-sample refresh: fetch, classify, observe, gate the alert.
async fn refresh_latest<S, P>(
    source: &S,
    tracker: &Mutex<StateTracker<P>>,
    sink: &dyn AlertSink,
    updates: &watch::Sender<FeedUpdate>,
) where
    S: TelemetrySource,
    P: StatusStore + Send,
{
    let sample = match source.fetch_latest().await {
        Ok(sample) => sample,
        Err(err) => {
            warn!("latest fetch failed: {err}");
            updates.send_replace(FeedUpdate::Failed(err));
            return;
        }
    };

    let status = OperatingStatus::classify(&sample);
    let observed = tracker.lock().await.observe(status);
    match observed {
        Ok(transition) if transition.alertable() => {
            debug!(
                "status transition {} -> {}",
                transition.previous, transition.current
            );
            sink.notify(&Alert::for_transition(&transition));
        }
        Ok(_) => {}
        // The transition stays undetected in the store and is re-detected
        // on the next tick; the fetched sample is still worth publishing.
        Err(err) => warn!("failed to persist status {status}: {err}"),
    }

    updates.send_replace(FeedUpdate::Latest { status, sample });
}

/// One history refresh: fetch the recent window and replace the buffer.
async fn refresh_history<S>(
    source: &S,
    history: &Mutex<HistoryBuffer>,
    results: usize,
    updates: &watch::Sender<FeedUpdate>,
) where
    S: TelemetrySource,
{
    match source.fetch_history(results).await {
        Ok(samples) => {
            debug!("history window replaced with {} samples", samples.len());
            history.lock().await.replace(samples);
        }
        Err(err) => {
            warn!("history fetch failed: {err}");
            updates.send_replace(FeedUpdate::Failed(err));
        }
    }
}
