//! Metric rows: export from nodes and read back from CSV text

use crate::{AuditError, Result};
use hben_domain::Node;
use serde::Serialize;
use tracing::debug;

/// Header of the metric name column
pub const METRIC_HEADER: &str = "Metric Name";

/// Header of the value column
pub const VALUE_HEADER: &str = "Value";

/// A single `Metric Name` / `Value` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRow {
    /// Metric name as written
    #[serde(rename = "Metric Name")]
    pub metric_name: String,

    /// Raw value, usually a percentage such as `87.00%`
    #[serde(rename = "Value")]
    pub value: String,
}

impl MetricRow {
    /// Create a row from raw strings
    pub fn new(metric_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metric_name: metric_name.into(),
            value: value.into(),
        }
    }

    /// Export a node's confidence as a percentage row
    pub fn from_node(node: &Node, metric_name: impl Into<String>) -> Self {
        Self::new(metric_name, format!("{:.2}%", node.confidence()))
    }

    /// Whether this row names `metric`, ignoring case and surrounding space
    pub fn matches(&self, metric: &str) -> bool {
        self.metric_name.trim().to_lowercase() == metric.trim().to_lowercase()
    }

    /// Render the header line followed by this row
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.serialize(self)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| AuditError::Csv(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AuditError::Csv(e.to_string()))
    }
}

/// Parse a percentage such as `" 99.5 % "` into `99.5`
///
/// Whitespace and one `%` are stripped; anything else must be a float.
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number.parse::<f64>().ok()
}

/// Read metric rows from CSV text
///
/// The metric column is the first header containing both "Metric" and
/// "Name". The value column is the first header containing "New Value",
/// else the first containing "Value". Other columns are ignored, as are
/// blank records. Quoted fields may span lines.
pub fn read_rows(text: &str) -> Result<Vec<MetricRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader.headers()?.clone();
    let metric_col = header
        .iter()
        .position(|h| h.contains("Metric") && h.contains("Name"))
        .ok_or_else(|| AuditError::MissingColumn(METRIC_HEADER.to_string()))?;
    let value_col = header
        .iter()
        .position(|h| h.contains("New Value"))
        .or_else(|| header.iter().position(|h| h.contains(VALUE_HEADER)))
        .ok_or_else(|| AuditError::MissingColumn(VALUE_HEADER.to_string()))?;
    let needed = metric_col.max(value_col) + 1;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        match (record.get(metric_col), record.get(value_col)) {
            (Some(metric), Some(value)) => rows.push(MetricRow::new(metric, value)),
            _ => {
                return Err(AuditError::MalformedRow {
                    line: record.position().map_or(0, |p| p.line() as usize),
                    expected: needed,
                    found: record.len(),
                })
            }
        }
    }

    debug!(rows = rows.len(), metric_col, value_col, "Read metric rows");
    Ok(rows)
}
