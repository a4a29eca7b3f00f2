use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Events the calculator reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    CalculationPerformed,
    AnalysisGenerated,
    FieldsReset,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::CalculationPerformed => "calculation_performed",
            EventName::AnalysisGenerated => "analysis_generated",
            EventName::FieldsReset => "fields_reset",
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named event with a free-form key/value payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub name: EventName,
    pub params: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl TelemetryEvent {
    pub fn new(name: EventName, params: Map<String, Value>) -> Self {
        Self {
            name,
            params,
            timestamp: Utc::now(),
        }
    }

    /// `ticker` carries the sector text the user typed, or "not_informed"
    pub fn calculation_performed(sector: Option<&str>, defensive_fair_price: f64) -> Self {
        let ticker = sector
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("not_informed");
        Self::new(
            EventName::CalculationPerformed,
            object(json!({
                "ticker": ticker,
                "fair_price": defensive_fair_price,
            })),
        )
    }

    pub fn analysis_generated() -> Self {
        Self::new(
            EventName::AnalysisGenerated,
            object(json!({
                "event_category": "engagement",
                "event_label": "analysis generated",
            })),
        )
    }

    pub fn fields_reset() -> Self {
        Self::new(
            EventName::FieldsReset,
            object(json!({
                "event_category": "interaction",
                "event_label": "form reset",
            })),
        )
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculation_event_payload() {
        let event = TelemetryEvent::calculation_performed(Some(" Banking "), 55.6);
        assert_eq!(event.name.as_str(), "calculation_performed");
        assert_eq!(event.params["ticker"], "Banking");
        assert_eq!(event.params["fair_price"], 55.6);
    }

    #[test]
    fn test_calculation_event_without_sector() {
        let event = TelemetryEvent::calculation_performed(None, 10.0);
        assert_eq!(event.params["ticker"], "not_informed");

        let blank = TelemetryEvent::calculation_performed(Some("  "), 10.0);
        assert_eq!(blank.params["ticker"], "not_informed");
    }

    #[test]
    fn test_engagement_events() {
        let analysis = TelemetryEvent::analysis_generated();
        assert_eq!(analysis.name, EventName::AnalysisGenerated);
        assert_eq!(analysis.params["event_category"], "engagement");

        let reset = TelemetryEvent::fields_reset();
        assert_eq!(reset.name.to_string(), "fields_reset");
        assert_eq!(reset.params["event_category"], "interaction");
    }
}
