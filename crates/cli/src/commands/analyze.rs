//! Analyse a thermal frame read from a file

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use thermal_lib::AnalyzeRequest;

use crate::client::ApiClient;
use crate::output::{print_alert, print_analysis, OutputFormat};

/// Read a frame from `path`.
///
/// The file holds either a bare JSON array of temperatures or a full
/// `/analyze` request object. Sensor metadata given on the command line
/// fills in fields the file leaves out.
pub fn load_request(
    path: &Path,
    sensor_id: Option<String>,
    location: Option<String>,
) -> Result<AnalyzeRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let mut request = match value {
        Value::Array(_) => AnalyzeRequest {
            thermal_data: value,
            sensor_id: None,
            location: None,
            timestamp: None,
        },
        Value::Object(_) => serde_json::from_value(value)
            .with_context(|| format!("{} is not a valid analyze request", path.display()))?,
        _ => anyhow::bail!(
            "{} must contain a JSON array or an analyze request object",
            path.display()
        ),
    };

    if request.sensor_id.is_none() {
        request.sensor_id = sensor_id;
    }
    if request.location.is_none() {
        request.location = location;
    }
    Ok(request)
}

pub async fn analyze_file(
    client: &ApiClient,
    path: &Path,
    sensor_id: Option<String>,
    location: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let request = load_request(path, sensor_id, location)?;
    let response = client.analyze(&request).await?;

    if matches!(format, OutputFormat::Table) {
        print_alert(response.leak_probability);
    }
    print_analysis(&response, format);

    Ok(())
}
