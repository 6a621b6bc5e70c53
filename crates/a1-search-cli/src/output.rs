//! Output modes and structured serialization.
//!
//! [`OutputMode`] selects between styled text for people and JSON, YAML or
//! CSV for pipelines. Structured modes serialize the report directly.

use console::Style;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Controls how results are written.
///
/// This is the user-facing enum for the `--output` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Styled text when stdout is a terminal, plain text otherwise
    #[default]
    Auto,
    /// Always use terminal styling
    Term,
    /// Never use styling
    Text,
    /// Serialize as JSON
    Json,
    /// Serialize as YAML
    Yaml,
    /// Serialize flattened items as CSV
    Csv,
}

impl OutputMode {
    /// Returns true for JSON, YAML and CSV.
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputMode::Json | OutputMode::Yaml | OutputMode::Csv)
    }

    /// Builds the text palette for this mode.
    ///
    /// `Auto` defers to console's terminal detection.
    pub fn palette(&self) -> Palette {
        let force = match self {
            OutputMode::Term => Some(true),
            OutputMode::Text => Some(false),
            _ => None,
        };
        let style = |base: Style| match force {
            Some(enabled) => base.force_styling(enabled),
            None => base,
        };
        Palette {
            heading: style(Style::new().bold()),
            accent: style(Style::new().cyan()),
            muted: style(Style::new().dim()),
        }
    }
}

/// Styles used by text output.
#[derive(Debug, Clone)]
pub struct Palette {
    /// Page and section headings.
    pub heading: Style,
    /// Field names and labels.
    pub accent: Style,
    /// Ids, empty-result notes and other secondary text.
    pub muted: Style,
}

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum OutputError {
    /// JSON encoding failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML encoding failed.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV encoding failed, or the data has no tabular shape.
    #[error("CSV serialization failed: {0}")]
    Csv(String),

    /// The mode is a text mode.
    #[error("not a structured output mode")]
    NotStructured,
}

/// Serializes data to the given structured format.
pub fn serialize_structured<T: Serialize>(data: &T, mode: OutputMode) -> Result<String, OutputError> {
    match mode {
        OutputMode::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputMode::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputMode::Csv => serialize_csv(data),
        _ => Err(OutputError::NotStructured),
    }
}

/// Serializes data to CSV.
///
/// The data is converted to JSON first. An array of objects becomes one row
/// per object with the union of keys as headers; nested values are written
/// as inline JSON.
pub fn serialize_csv<T: Serialize>(data: &T) -> Result<String, OutputError> {
    let json = serde_json::to_value(data)?;
    flatten_json_to_csv(&json)
}

fn flatten_json_to_csv(value: &serde_json::Value) -> Result<String, OutputError> {
    use serde_json::Value;

    let csv_err = |e: csv::Error| OutputError::Csv(e.to_string());
    let mut wtr = csv::Writer::from_writer(vec![]);

    match value {
        Value::Array(rows) if rows.iter().all(Value::is_object) && !rows.is_empty() => {
            // records have no fixed schema; headers are every key in first-seen order
            let mut headers: Vec<&str> = Vec::new();
            for row in rows.iter().filter_map(Value::as_object) {
                for key in row.keys() {
                    if !headers.contains(&key.as_str()) {
                        headers.push(key);
                    }
                }
            }
            wtr.write_record(&headers).map_err(csv_err)?;
            for row in rows.iter().filter_map(Value::as_object) {
                let cells: Vec<String> = headers
                    .iter()
                    .map(|h| row.get(*h).map(value_to_cell).unwrap_or_default())
                    .collect();
                wtr.write_record(&cells).map_err(csv_err)?;
            }
        }
        Value::Array(items) => {
            wtr.write_record(["value"]).map_err(csv_err)?;
            for item in items {
                wtr.write_record([value_to_cell(item)]).map_err(csv_err)?;
            }
        }
        Value::Object(obj) => {
            wtr.write_record(["key", "value"]).map_err(csv_err)?;
            for (k, v) in obj {
                wtr.write_record([k.as_str(), &value_to_cell(v)])
                    .map_err(csv_err)?;
            }
        }
        scalar => {
            wtr.write_record(["value"]).map_err(csv_err)?;
            wtr.write_record([value_to_cell(scalar)]).map_err(csv_err)?;
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| OutputError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| OutputError::Csv(e.to_string()))
}

fn value_to_cell(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
