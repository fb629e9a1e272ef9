// Luxwatch - Integration Tests
//
// End-to-end tests over the public API: classify -> track -> alert through
// a running polling session, persistence across simulated process
// restarts, and the trend window as the presentation layer sees it.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use async_trait::async_trait;
use luxwatch::{
    Alert, AlertSink, FeedUpdate, FileStatusStore, MonitorConfig, OperatingStatus,
    PollingScheduler, Sample, SourceError, StateTracker, TelemetrySource,
};

/// Source replaying a fixed script of status codes; the last entry repeats
/// once the script runs out.
struct FeedScript {
    codes: StdMutex<VecDeque<Option<i32>>>,
    last_code: StdMutex<Option<i32>>,
    history: Vec<Sample>,
}

impl FeedScript {
    fn new(codes: &[Option<i32>]) -> Self {
        Self {
            codes: StdMutex::new(codes.iter().copied().collect()),
            last_code: StdMutex::new(None),
            history: Vec::new(),
        }
    }

    fn with_history(mut self, count: usize) -> Self {
        self.history = (0..count)
            .map(|i| Sample::new(None, i as f32, 0.0, Some(1)))
            .collect();
        self
    }
}

#[async_trait]
impl TelemetrySource for FeedScript {
    async fn fetch_latest(&self) -> Result<Sample, SourceError> {
        let code = {
            let mut codes = self.codes.lock().unwrap();
            match codes.pop_front() {
                Some(code) => {
                    *self.last_code.lock().unwrap() = code;
                    code
                }
                None => *self.last_code.lock().unwrap(),
            }
        };
        Ok(Sample::new(None, 640.0, 8.0, code))
    }

    async fn fetch_history(&self, _count: usize) -> Result<Vec<Sample>, SourceError> {
        if self.history.is_empty() {
            return Err(SourceError::NotFound {
                channel: "test".to_string(),
            });
        }
        Ok(self.history.clone())
    }
}

#[derive(Default)]
struct CollectingSink {
    alerts: StdMutex<Vec<Alert>>,
}

impl CollectingSink {
    fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }
}

impl AlertSink for CollectingSink {
    fn notify(&self, alert: &Alert) {
        self.alerts.lock().unwrap().push(alert.clone());
    }
}

fn test_config() -> MonitorConfig {
    MonitorConfig {
        fast_interval: Duration::from_secs(15),
        slow_interval: Duration::from_secs(3600),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_session_alerts_once_per_transition_with_copy() {
    // Both cycles run once at start, then the fast cycle walks the script.
    let source = FeedScript::new(&[Some(1), Some(1), Some(2)]).with_history(10);
    let sink = Arc::new(CollectingSink::default());
    let tracker = StateTracker::new(luxwatch::MemoryStatusStore::new());

    let session = PollingScheduler::with_config(
        source,
        tracker,
        Arc::clone(&sink) as Arc<dyn AlertSink>,
        test_config(),
    )
    .start();

    tokio::time::sleep(Duration::from_secs(50)).await;
    session.join().await;

    let alerts = sink.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].previous, OperatingStatus::On);
    assert_eq!(alerts[0].current, OperatingStatus::Flicker);
    assert_eq!(alerts[0].title, "STREET LIGHT FLICKERING");
    assert!(alerts[0].body.contains("was ON"));
}

#[tokio::test(start_paused = true)]
async fn test_persisted_status_survives_session_restart() {
    let dir = tempfile::tempdir().unwrap();
    let status_path = dir.path().join("last_status");
    let sink = Arc::new(CollectingSink::default());

    // First session observes ON from a cold start: no alert.
    {
        let tracker = StateTracker::new(FileStatusStore::new(&status_path));
        let session = PollingScheduler::with_config(
            FeedScript::new(&[Some(1)]),
            tracker,
            Arc::clone(&sink) as Arc<dyn AlertSink>,
            test_config(),
        )
        .start();
        tokio::time::sleep(Duration::from_secs(5)).await;
        session.join().await;
    }
    assert!(sink.alerts().is_empty());

    // Restarted session loads ON from disk; observing OFF alerts exactly
    // once with the persisted status as the previous side.
    {
        let tracker = StateTracker::new(FileStatusStore::new(&status_path));
        assert_eq!(tracker.previous(), OperatingStatus::On);

        let session = PollingScheduler::with_config(
            FeedScript::new(&[Some(0)]),
            tracker,
            Arc::clone(&sink) as Arc<dyn AlertSink>,
            test_config(),
        )
        .start();
        tokio::time::sleep(Duration::from_secs(5)).await;
        session.join().await;
    }

    let alerts = sink.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].previous, OperatingStatus::On);
    assert_eq!(alerts[0].current, OperatingStatus::Off);
    assert_eq!(alerts[0].title, "STREET LIGHT OFF");
}

#[tokio::test(start_paused = true)]
async fn test_presentation_layer_reads_latest_and_history() {
    let source = FeedScript::new(&[Some(1)]).with_history(80);
    let sink = Arc::new(CollectingSink::default());
    let tracker = StateTracker::new(luxwatch::MemoryStatusStore::new());

    let session = PollingScheduler::with_config(
        source,
        tracker,
        Arc::clone(&sink) as Arc<dyn AlertSink>,
        MonitorConfig::default(),
    )
    .start();

    tokio::time::sleep(Duration::from_secs(5)).await;

    match session.latest() {
        FeedUpdate::Latest { status, sample } => {
            assert_eq!(status, OperatingStatus::On);
            assert_eq!(sample.light_level, 640.0);
        }
        other => panic!("expected Latest, got {other:?}"),
    }

    // 80 fetched against the default capacity of 50.
    let window = session.history().await;
    assert_eq!(window.len(), 50);
    assert_eq!(window.first().unwrap().light_level, 30.0);
    assert_eq!(window.last().unwrap().light_level, 79.0);

    session.join().await;
}

#[tokio::test(start_paused = true)]
async fn test_history_failure_keeps_previous_window() {
    let sink = Arc::new(CollectingSink::default());
    let tracker = StateTracker::new(luxwatch::MemoryStatusStore::new());

    // History fetch fails (no history configured); latest still flows.
    let session = PollingScheduler::with_config(
        FeedScript::new(&[Some(1)]),
        tracker,
        Arc::clone(&sink) as Arc<dyn AlertSink>,
        MonitorConfig::default(),
    )
    .start();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(session.history().await.is_empty());
    session.join().await;
}
