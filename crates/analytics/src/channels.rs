use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{TelemetryChannel, TelemetryError, TelemetryEvent};

/// Writes every event to the tracing log
pub struct LogChannel;

#[async_trait]
impl TelemetryChannel for LogChannel {
    async fn send(&self, event: &TelemetryEvent) -> Result<(), TelemetryError> {
        tracing::info!(
            event = %event.name,
            params = %serde_json::Value::Object(event.params.clone()),
            "telemetry event"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Posts events to a Google Analytics 4 measurement-protocol endpoint
pub struct MeasurementProtocolChannel {
    endpoint: String,
    measurement_id: String,
    api_secret: String,
    client_id: String,
    client: reqwest::Client,
}

impl MeasurementProtocolChannel {
    pub fn new(
        endpoint: impl Into<String>,
        measurement_id: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, TelemetryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| TelemetryError::Config(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            measurement_id: measurement_id.into(),
            api_secret: api_secret.into(),
            client_id: uuid::Uuid::new_v4().to_string(),
            client,
        })
    }

    fn payload(&self, event: &TelemetryEvent) -> Value {
        json!({
            "client_id": self.client_id,
            "timestamp_micros": event.timestamp.timestamp_micros(),
            "events": [{
                "name": event.name.as_str(),
                "params": event.params,
            }]
        })
    }
}

#[async_trait]
impl TelemetryChannel for MeasurementProtocolChannel {
    async fn send(&self, event: &TelemetryEvent) -> Result<(), TelemetryError> {
        self.client
            .post(&self.endpoint)
            .query(&[
                ("measurement_id", self.measurement_id.as_str()),
                ("api_secret", self.api_secret.as_str()),
            ])
            .json(&self.payload(event))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| TelemetryError::Http(e.to_string()))?;

        Ok(())
    }

    fn name(&self) -> &str {
        "measurement-protocol"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_payload_shape() {
        let channel =
            MeasurementProtocolChannel::new("http://localhost/collect", "G-TEST", "secret")
                .unwrap();
        let event = TelemetryEvent::fields_reset();
        let payload = channel.payload(&event);

        assert_eq!(payload["events"][0]["name"], "fields_reset");
        assert_eq!(payload["events"][0]["params"]["event_category"], "interaction");
        assert_eq!(payload["client_id"], channel.client_id.as_str());
    }

    #[tokio::test]
    async fn test_log_channel_never_fails() {
        let event = TelemetryEvent::analysis_generated();
        assert!(LogChannel.send(&event).await.is_ok());
    }
}
