mod channels;
mod events;

pub use channels::{LogChannel, MeasurementProtocolChannel};
pub use events::{EventName, TelemetryEvent};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

pub const DEFAULT_ENDPOINT: &str = "https://www.google-analytics.com/mp/collect";

/// Trait for telemetry destinations.
#[async_trait]
pub trait TelemetryChannel: Send + Sync {
    async fn send(&self, event: &TelemetryEvent) -> Result<(), TelemetryError>;
    fn name(&self) -> &str;
}

/// Errors from telemetry channels. Logged, never surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("HTTP beacon error: {0}")]
    Http(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Configuration for the telemetry sink.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub measurement_id: Option<String>,
    pub api_secret: Option<String>,
    pub endpoint: String,
    /// Upper bound on how long [`Telemetry::flush`] waits
    pub flush_timeout: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            measurement_id: None,
            api_secret: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            flush_timeout: Duration::from_millis(1500),
        }
    }
}

impl TelemetryConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            enabled: std::env::var("ANALYTICS_ENABLED")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(defaults.enabled),
            measurement_id: std::env::var("ANALYTICS_MEASUREMENT_ID")
                .ok()
                .filter(|s| !s.is_empty()),
            api_secret: std::env::var("ANALYTICS_API_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            endpoint: std::env::var("ANALYTICS_ENDPOINT")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.endpoint),
            flush_timeout: std::env::var("ANALYTICS_FLUSH_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.flush_timeout),
        }
    }
}

/// Fire-and-forget event sink. Tracking never blocks and never fails the caller.
pub struct Telemetry {
    channels: Arc<Vec<Box<dyn TelemetryChannel>>>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl Telemetry {
    pub fn new(config: &TelemetryConfig) -> Self {
        if !config.enabled {
            tracing::debug!("Telemetry disabled");
            return Self::disabled();
        }

        let mut channels: Vec<Box<dyn TelemetryChannel>> = vec![Box::new(LogChannel)];

        if let (Some(measurement_id), Some(api_secret)) =
            (&config.measurement_id, &config.api_secret)
        {
            match MeasurementProtocolChannel::new(&config.endpoint, measurement_id, api_secret) {
                Ok(channel) => {
                    tracing::debug!("Analytics beacons enabled ({})", measurement_id);
                    channels.push(Box::new(channel));
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize analytics beacon: {}", e);
                }
            }
        }

        Self::with_channels(channels)
    }

    pub fn with_channels(channels: Vec<Box<dyn TelemetryChannel>>) -> Self {
        Self {
            channels: Arc::new(channels),
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// A sink that drops everything
    pub fn disabled() -> Self {
        Self::with_channels(Vec::new())
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Dispatch `event` to every channel on a spawned task and return immediately.
    ///
    /// Outside a tokio runtime the event is dropped.
    pub fn track(&self, event: TelemetryEvent) {
        if self.channels.is_empty() {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No async runtime, dropping telemetry event {}", event.name);
            return;
        };

        let channels = self.channels.clone();
        let task = runtime.spawn(async move {
            for channel in channels.iter() {
                match channel.send(&event).await {
                    Ok(()) => tracing::debug!("Sent {} via {}", event.name, channel.name()),
                    Err(e) => {
                        tracing::warn!("Failed to send {} via {}: {}", event.name, channel.name(), e)
                    }
                }
            }
        });

        if let Ok(mut pending) = self.in_flight.lock() {
            pending.retain(|handle| !handle.is_finished());
            pending.push(task);
        }
    }

    /// Wait up to `timeout` for dispatches still in flight.
    pub async fn flush(&self, timeout: Duration) {
        let pending: Vec<JoinHandle<()>> = match self.in_flight.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => return,
        };
        if pending.is_empty() {
            return;
        }

        let count = pending.len();
        let drained = tokio::time::timeout(timeout, async move {
            for handle in pending {
                let _ = handle.await;
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!("Gave up on {} telemetry dispatches after {:?}", count, timeout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingChannel {
        seen: Arc<Mutex<Vec<EventName>>>,
    }

    #[async_trait]
    impl TelemetryChannel for RecordingChannel {
        async fn send(&self, event: &TelemetryEvent) -> Result<(), TelemetryError> {
            self.seen.lock().unwrap().push(event.name);
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct FailingChannel;

    #[async_trait]
    impl TelemetryChannel for FailingChannel {
        async fn send(&self, _event: &TelemetryEvent) -> Result<(), TelemetryError> {
            Err(TelemetryError::Http("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_track_dispatches_to_all_channels() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let telemetry = Telemetry::with_channels(vec![
            Box::new(FailingChannel),
            Box::new(RecordingChannel { seen: seen.clone() }),
        ]);

        telemetry.track(TelemetryEvent::analysis_generated());
        telemetry.track(TelemetryEvent::fields_reset());
        telemetry.flush(Duration::from_secs(1)).await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![EventName::AnalysisGenerated, EventName::FieldsReset]
        );
    }

    #[test]
    fn test_track_without_runtime_is_a_no_op() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let telemetry = Telemetry::with_channels(vec![Box::new(RecordingChannel {
            seen: seen.clone(),
        })]);

        telemetry.track(TelemetryEvent::fields_reset());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_disabled_config_has_no_channels() {
        let config = TelemetryConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(Telemetry::new(&config).channel_names().is_empty());
    }

    #[test]
    fn test_beacon_registered_only_with_credentials() {
        let log_only = Telemetry::new(&TelemetryConfig::default());
        assert_eq!(log_only.channel_names(), vec!["log"]);

        let config = TelemetryConfig {
            measurement_id: Some("G-TEST".to_string()),
            api_secret: Some("secret".to_string()),
            ..Default::default()
        };
        assert_eq!(
            Telemetry::new(&config).channel_names(),
            vec!["log", "measurement-protocol"]
        );
    }

    #[test]
    fn test_flush_with_nothing_pending_returns() {
        let telemetry = Telemetry::disabled();
        tokio_test::block_on(telemetry.flush(Duration::from_millis(10)));
    }
}
