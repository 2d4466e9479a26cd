//! HBEN Audit
//!
//! Exports node confidence as metric rows and audits metric rows against a
//! required threshold.
//!
//! The auditor provides:
//! - Metric rows with `Metric Name` / `Value` headers
//! - Percentage parsing with an optional `%` suffix
//! - Case-insensitive, whitespace-trimmed metric lookup
//! - PASS/FAIL verdicts with process exit codes
//!
//! # Examples
//!
//! ```
//! use hben_audit::{AuditConfig, AuditStatus, Auditor, MetricRow};
//!
//! let rows = vec![MetricRow::new(" proto-awareness ", "100.00%")];
//! let auditor = Auditor::new(AuditConfig::default());
//!
//! let result = auditor.audit(&rows).unwrap();
//! assert_eq!(result.status, AuditStatus::Pass);
//! assert_eq!(result.status.exit_code(), 0);
//! ```

#![warn(missing_docs)]

mod auditor;
mod config;
mod error;
mod metric;

pub use auditor::{AuditResult, AuditStatus, Auditor};
pub use config::{AuditConfig, ThresholdMode, DEFAULT_METRIC, DEFAULT_REQUIRED};
pub use error::AuditError;
pub use metric::{parse_percentage, read_rows, MetricRow, METRIC_HEADER, VALUE_HEADER};

/// Result type for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;
