//! Request and response payloads shared by the server and the test client

use crate::detector::{DetectionResult, RiskLevel};
use crate::error::DetectionError;
use crate::grid::GRID_CELLS;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Message returned when fewer than 64 points are supplied
pub const INSUFFICIENT_DATA_MESSAGE: &str = "Insufficient data. Need 64 thermal points.";

fn empty_thermal_data() -> Value {
    Value::Array(Vec::new())
}

/// Body of `POST /analyze`
///
/// `thermal_data` is kept as raw JSON so that malformed entries can be
/// reported precisely instead of failing deserialization as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default = "empty_thermal_data")]
    pub thermal_data: Value,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sensor_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
}

/// Metadata fields only feed logs, so any JSON value is accepted and
/// non-string values keep their JSON rendering.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

impl AnalyzeRequest {
    pub fn new(samples: &[f64]) -> Self {
        Self {
            thermal_data: Value::from(samples.to_vec()),
            sensor_id: None,
            location: None,
            timestamp: None,
        }
    }

    pub fn with_sensor(mut self, sensor_id: impl Into<String>, location: impl Into<String>) -> Self {
        self.sensor_id = Some(sensor_id.into());
        self.location = Some(location.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn sensor_id(&self) -> &str {
        self.sensor_id.as_deref().unwrap_or("unknown")
    }

    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or("unknown")
    }

    /// Number of entries in `thermal_data`, 0 if it is not an array
    pub fn point_count(&self) -> usize {
        self.thermal_data.as_array().map(Vec::len).unwrap_or(0)
    }

    /// Convert `thermal_data` into the first 64 temperatures.
    ///
    /// The length check runs before entries are inspected, and entries past
    /// the 64th are never looked at.
    pub fn samples(&self) -> Result<Vec<f64>, DetectionError> {
        let values = match &self.thermal_data {
            Value::Array(values) => values,
            Value::Null => return Err(DetectionError::validation("thermal_data is null")),
            other => {
                return Err(DetectionError::validation(format!(
                    "thermal_data must be an array of numbers, got {}",
                    json_type(other)
                )))
            }
        };

        if values.len() < GRID_CELLS {
            return Err(DetectionError::insufficient(values.len()));
        }

        values
            .iter()
            .take(GRID_CELLS)
            .enumerate()
            .map(|(idx, value)| {
                value.as_f64().ok_or_else(|| {
                    DetectionError::validation(format!(
                        "thermal_data[{}] is not a number: {}",
                        idx, value
                    ))
                })
            })
            .collect()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Statistics block of a successful analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub average_temperature: f64,
    pub cold_spots: usize,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub max_gradient: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<String>,
}

impl From<&DetectionResult> for AnalysisSummary {
    fn from(result: &DetectionResult) -> Self {
        Self {
            min_temperature: result.features.min_temp,
            max_temperature: result.features.max_temp,
            average_temperature: result.features.avg_temp,
            cold_spots: result.features.cold_spot_count,
            risk_level: result.risk_level,
            max_gradient: result.features.max_gradient_magnitude,
            matched_rule: result.matched_rule.clone(),
        }
    }
}

/// Successful `POST /analyze` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub leak_probability: f64,
    pub analysis: AnalysisSummary,
    pub timestamp: String,
}

impl AnalyzeResponse {
    pub fn from_result(result: &DetectionResult) -> Self {
        Self {
            status: "success".to_string(),
            leak_probability: result.leak_probability,
            analysis: AnalysisSummary::from(result),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error body returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

impl From<&DetectionError> for ErrorResponse {
    fn from(err: &DetectionError) -> Self {
        match err {
            DetectionError::InsufficientData { .. } => Self::new(INSUFFICIENT_DATA_MESSAGE),
            DetectionError::Validation(_) => Self::new(err.to_string()),
        }
    }
}

/// `GET /` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

/// `GET /status` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::detect;
    use crate::synthetic::{grid_with_cell, uniform_grid};
    use serde_json::json;

    fn request(body: Value) -> AnalyzeRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_missing_thermal_data_is_insufficient() {
        let req = request(json!({"sensor_id": "cam"}));
        assert_eq!(req.samples().unwrap_err(), DetectionError::insufficient(0));
        assert_eq!(req.location(), "unknown");
    }

    #[test]
    fn test_null_thermal_data_is_invalid() {
        let req = request(json!({"thermal_data": null}));
        assert!(matches!(req.samples(), Err(DetectionError::Validation(_))));
    }

    #[test]
    fn test_non_array_thermal_data_is_invalid() {
        let req = request(json!({"thermal_data": "hot"}));
        let err = req.samples().unwrap_err();
        assert!(err.to_string().contains("got string"));
    }

    #[test]
    fn test_short_array_checked_before_entries() {
        let req = request(json!({"thermal_data": ["a", "b"]}));
        assert_eq!(req.samples().unwrap_err(), DetectionError::insufficient(2));
    }

    #[test]
    fn test_non_numeric_entry_is_invalid() {
        let mut data: Vec<Value> = uniform_grid(25.0).into_iter().map(Value::from).collect();
        data[5] = json!("warm");
        let req = request(json!({ "thermal_data": data }));
        let err = req.samples().unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(err.to_string().contains("thermal_data[5]"));
    }

    #[test]
    fn test_entries_past_64_are_ignored() {
        let mut data: Vec<Value> = uniform_grid(25.0).into_iter().map(Value::from).collect();
        data.push(json!("trailing garbage"));
        let req = request(json!({ "thermal_data": data }));
        assert_eq!(req.samples().unwrap(), uniform_grid(25.0));
    }

    #[test]
    fn test_integer_entries_accepted() {
        let req = request(json!({ "thermal_data": vec![25; 64] }));
        assert_eq!(req.samples().unwrap(), uniform_grid(25.0));
    }

    #[test]
    fn test_non_string_metadata_is_rendered() {
        let req = request(json!({
            "thermal_data": uniform_grid(25.0),
            "sensor_id": 7,
            "location": null,
            "timestamp": 1700000000
        }));
        assert_eq!(req.sensor_id(), "7");
        assert_eq!(req.location(), "unknown");
        assert_eq!(req.timestamp.as_deref(), Some("1700000000"));
        assert_eq!(req.samples().unwrap(), uniform_grid(25.0));
    }

    #[test]
    fn test_request_roundtrip_keeps_metadata() {
        let req = AnalyzeRequest::new(&uniform_grid(20.0)).with_sensor("thermal_camera_01", "lab");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["sensor_id"], "thermal_camera_01");
        assert_eq!(value["thermal_data"].as_array().unwrap().len(), 64);
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn test_response_shape() {
        let result = detect(&grid_with_cell(25.0, 3, 3, 15.0)).unwrap();
        let value = serde_json::to_value(AnalyzeResponse::from_result(&result)).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["leak_probability"], 0.7);
        assert_eq!(value["analysis"]["min_temperature"], 15.0);
        assert_eq!(value["analysis"]["max_temperature"], 25.0);
        assert_eq!(value["analysis"]["cold_spots"], 1);
        assert_eq!(value["analysis"]["risk_level"], "medium");
        assert_eq!(value["analysis"]["matched_rule"], "severe_min_temperature");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_error_response_messages() {
        let body = ErrorResponse::from(&DetectionError::insufficient(3));
        assert_eq!(body.message, INSUFFICIENT_DATA_MESSAGE);
        assert_eq!(body.status, "error");

        let body = ErrorResponse::from(&DetectionError::validation("thermal_data is null"));
        assert!(body.message.contains("thermal_data is null"));
    }
}
