// LUXWATCH - Street light telemetry monitor
// Copyright (c) 2025 Luxwatch contributors
//
// Licensed under the MIT license.

//! Telemetry source interface and ThingSpeak client
//!
//! [`TelemetrySource`] is the seam the polling scheduler fetches through;
//! [`ThingSpeakSource`] is the HTTP implementation against a ThingSpeak
//! channel (`feeds/last.json` for the latest entry, `feeds.json?results=N`
//! for the recent window). Both calls are slow network operations that can
//! fail or time out; the scheduler treats them as fallible, never as
//! guaranteed-success.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SourceError;
use crate::sample::Sample;

/// Public ThingSpeak API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.thingspeak.com";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of telemetry readings for one monitored device.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch the single most recent reading.
    async fn fetch_latest(&self) -> Result<Sample, SourceError>;

    /// Fetch the most recent `count` readings, ascending by time.
    ///
    /// Entries with no light-level field are filtered out before
    /// conversion: a sample with no usable signal is not chart-worthy. A
    /// missing status code is kept; it still classifies as unknown.
    async fn fetch_history(&self, count: usize) -> Result<Vec<Sample>, SourceError>;
}

/// Configuration for a ThingSpeak channel
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// API base URL (default: the public ThingSpeak endpoint)
    pub base_url: String,

    /// Channel identifier
    pub channel_id: String,

    /// Read API key, required only for private channels
    pub read_api_key: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl SourceConfig {
    /// Create a configuration for a public channel.
    pub fn for_channel(channel_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            channel_id: channel_id.into(),
            read_api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the read API key for a private channel.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.read_api_key = Some(key.into());
        self
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// One feed entry as ThingSpeak reports it. All data fields arrive as
/// optional strings.
#[derive(Debug, Deserialize)]
struct Feed {
    created_at: Option<String>,
    field1: Option<String>,
    field2: Option<String>,
    field3: Option<String>,
}

impl Feed {
    fn into_sample(self) -> Sample {
        Sample::from_fields(
            self.created_at.as_deref(),
            self.field1.as_deref(),
            self.field2.as_deref(),
            self.field3.as_deref(),
        )
    }

    fn has_signal(&self) -> bool {
        self.field1.is_some()
    }
}

/// Channel feeds response envelope
#[derive(Debug, Deserialize)]
struct ChannelFeeds {
    feeds: Vec<Feed>,
}

/// HTTP client for a ThingSpeak channel.
pub struct ThingSpeakSource {
    client: reqwest::Client,
    config: SourceConfig,
}

impl ThingSpeakSource {
    /// Create a client for the configured channel.
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| SourceError::Unreachable {
                reason: format!("failed to build HTTP client: {err}"),
            })?;
        Ok(Self { client, config })
    }

    /// Channel this client reads from
    pub fn channel_id(&self) -> &str {
        &self.config.channel_id
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/channels/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.channel_id,
            path
        )
    }

    async fn get_body(&self, url: &str, query: &[(&str, String)]) -> Result<String, SourceError> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.config.read_api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }
        for (name, value) in query {
            request = request.query(&[(*name, value.as_str())]);
        }

        let response = request.send().await.map_err(|err| SourceError::Unreachable {
            reason: err.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::BadResponse {
                channel: self.config.channel_id.clone(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        response.text().await.map_err(|err| SourceError::Unreachable {
            reason: err.to_string(),
        })
    }
}

#[async_trait]
impl TelemetrySource for ThingSpeakSource {
    async fn fetch_latest(&self) -> Result<Sample, SourceError> {
        let body = self.get_body(&self.endpoint("feeds/last.json"), &[]).await?;
        parse_latest_body(&body, &self.config.channel_id)
    }

    async fn fetch_history(&self, count: usize) -> Result<Vec<Sample>, SourceError> {
        let body = self
            .get_body(
                &self.endpoint("feeds.json"),
                &[("results", count.to_string())],
            )
            .await?;
        parse_history_body(&body, &self.config.channel_id)
    }
}

fn parse_latest_body(body: &str, channel: &str) -> Result<Sample, SourceError> {
    // An empty channel answers the last-entry endpoint with the literal
    // body "-1".
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "-1" {
        return Err(SourceError::NotFound {
            channel: channel.to_string(),
        });
    }

    let feed: Feed = serde_json::from_str(trimmed).map_err(|err| SourceError::BadResponse {
        channel: channel.to_string(),
        reason: err.to_string(),
    })?;
    Ok(feed.into_sample())
}

fn parse_history_body(body: &str, channel: &str) -> Result<Vec<Sample>, SourceError> {
    let parsed: ChannelFeeds =
        serde_json::from_str(body.trim()).map_err(|err| SourceError::BadResponse {
            channel: channel.to_string(),
            reason: err.to_string(),
        })?;

    if parsed.feeds.is_empty() {
        return Err(SourceError::NotFound {
            channel: channel.to_string(),
        });
    }

    Ok(parsed
        .feeds
        .into_iter()
        .filter(Feed::has_signal)
        .map(Feed::into_sample)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::OperatingStatus;

    #[test]
    fn test_parse_latest_body() {
        let body = r#"{
            "created_at": "2025-06-01T21:30:00Z",
            "entry_id": 4821,
            "field1": "812.5",
            "field2": "14.2",
            "field3": "1"
        }"#;

        let sample = parse_latest_body(body, "3089109").unwrap();
        assert_eq!(sample.light_level, 812.5);
        assert_eq!(sample.variability, 14.2);
        assert_eq!(OperatingStatus::classify(&sample), OperatingStatus::On);
    }

    #[test]
    fn test_parse_latest_unrecognized_code_is_classifiable() {
        let body = r#"{"created_at": "2025-06-01T21:30:00Z", "field3": "9"}"#;
        let sample = parse_latest_body(body, "3089109").unwrap();
        assert_eq!(sample.status_code, Some(9));
        assert_eq!(OperatingStatus::classify(&sample), OperatingStatus::Unknown);
    }

    #[test]
    fn test_parse_latest_empty_channel() {
        let err = parse_latest_body("-1", "3089109").unwrap_err();
        assert_eq!(
            err,
            SourceError::NotFound {
                channel: "3089109".to_string()
            }
        );
    }

    #[test]
    fn test_parse_latest_malformed_json() {
        let err = parse_latest_body("<html>gateway timeout</html>", "3089109").unwrap_err();
        assert!(matches!(err, SourceError::BadResponse { .. }));
    }

    #[test]
    fn test_parse_history_filters_entries_without_signal() {
        let body = r#"{
            "channel": {"id": 3089109},
            "feeds": [
                {"created_at": "2025-06-01T21:00:00Z", "field1": "10.0", "field3": "0"},
                {"created_at": "2025-06-01T21:01:00Z", "field3": "0"},
                {"created_at": "2025-06-01T21:02:00Z", "field1": "820.0", "field3": "1"}
            ]
        }"#;

        let samples = parse_history_body(body, "3089109").unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].light_level, 10.0);
        assert_eq!(samples[1].light_level, 820.0);
    }

    #[test]
    fn test_parse_history_keeps_missing_status_code() {
        let body = r#"{"feeds": [{"created_at": "2025-06-01T21:00:00Z", "field1": "10.0"}]}"#;
        let samples = parse_history_body(body, "3089109").unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(
            OperatingStatus::classify(&samples[0]),
            OperatingStatus::Unknown
        );
    }

    #[test]
    fn test_parse_history_empty_feeds() {
        let err = parse_history_body(r#"{"feeds": []}"#, "3089109").unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[test]
    fn test_source_config_for_channel() {
        let config = SourceConfig::for_channel("3089109");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.channel_id, "3089109");
        assert!(config.read_api_key.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_endpoint_building() {
        let config = SourceConfig::for_channel("42").with_base_url("http://localhost:8080/");
        let source = ThingSpeakSource::new(config).unwrap();
        assert_eq!(
            source.endpoint("feeds/last.json"),
            "http://localhost:8080/channels/42/feeds/last.json"
        );
    }
}
