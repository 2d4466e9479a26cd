//! Audit error types

use thiserror::Error;

/// Errors that can occur while reading or auditing metric rows
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuditError {
    /// A required column was not found in the header
    #[error("Could not find the '{0}' column")]
    MissingColumn(String),

    /// No row matched the requested metric
    #[error("Could not find the '{0}' metric")]
    MissingMetric(String),

    /// The metric value is not a number
    #[error("Could not read the '{metric}' value '{value}'")]
    InvalidValue {
        /// Metric name
        metric: String,
        /// Raw value as found
        value: String,
    },

    /// A data row has fewer fields than the header requires
    #[error("Line {line}: expected at least {expected} fields, found {found}")]
    MalformedRow {
        /// 1-based line number
        line: usize,
        /// Fields required
        expected: usize,
        /// Fields present
        found: usize,
    },

    /// The report is not well-formed CSV
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for AuditError {
    fn from(err: csv::Error) -> Self {
        AuditError::Csv(err.to_string())
    }
}
