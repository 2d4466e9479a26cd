//! Threshold audit over metric rows

use crate::{parse_percentage, AuditConfig, AuditError, MetricRow, Result, ThresholdMode};
use hben_domain::Node;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Audit verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditStatus {
    /// The metric met the threshold
    Pass,
    /// The metric missed the threshold
    Fail,
}

impl AuditStatus {
    /// Process exit code for this verdict
    pub fn exit_code(&self) -> i32 {
        match self {
            AuditStatus::Pass => 0,
            AuditStatus::Fail => 1,
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditStatus::Pass => write!(f, "PASS"),
            AuditStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Outcome of auditing one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditResult {
    /// Metric name as configured
    pub metric: String,
    /// Verdict
    pub status: AuditStatus,
    /// Parsed value, in percent
    pub value: f64,
    /// Threshold the value was compared with
    pub required: f64,
    /// Why the audit failed, if it did
    pub reason: Option<String>,
}

impl AuditResult {
    /// Snake-case label used in the verdict line, e.g. `proto_awareness`
    pub fn label(&self) -> String {
        self.metric
            .trim()
            .to_lowercase()
            .replace(['-', ' '], "_")
    }
}

impl fmt::Display for AuditResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {} ({})", self.label(), self.status, reason),
            None => write!(f, "{}: {}", self.label(), self.status),
        }
    }
}

/// Audits metric rows against a configured threshold
pub struct Auditor {
    config: AuditConfig,
}

impl Auditor {
    /// Create an auditor with the given configuration
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Audit the first row whose name matches the configured metric
    ///
    /// # Errors
    ///
    /// [`AuditError::MissingMetric`] if no row matches, or
    /// [`AuditError::InvalidValue`] if its value is not a percentage.
    /// A value that parses but misses the threshold is a `Fail` result,
    /// not an error.
    pub fn audit(&self, rows: &[MetricRow]) -> Result<AuditResult> {
        let metric = &self.config.metric_name;
        let row = rows
            .iter()
            .find(|row| row.matches(metric))
            .ok_or_else(|| AuditError::MissingMetric(metric.clone()))?;

        let value = parse_percentage(&row.value).ok_or_else(|| AuditError::InvalidValue {
            metric: metric.clone(),
            value: row.value.clone(),
        })?;
        debug!(metric = %metric, value, "Found metric");

        let required = self.config.required;
        let (status, reason) = if self.config.mode.accepts(value, required) {
            (AuditStatus::Pass, None)
        } else {
            let wanted = match self.config.mode {
                ThresholdMode::Exact => format!("required {:.2}", required),
                ThresholdMode::AtLeast => format!("required at least {:.2}", required),
            };
            (
                AuditStatus::Fail,
                Some(format!("Value was {}, {}", value, wanted)),
            )
        };

        info!(metric = %metric, value, required, status = %status, "Audit complete");
        Ok(AuditResult {
            metric: metric.clone(),
            status,
            value,
            required,
            reason,
        })
    }

    /// Export `node` under the configured metric name and audit it
    pub fn audit_node(&self, node: &Node) -> Result<AuditResult> {
        let row = MetricRow::from_node(node, self.config.metric_name.clone());
        self.audit(std::slice::from_ref(&row))
    }
}

impl Default for Auditor {
    fn default() -> Self {
        Self::new(AuditConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hben_domain::Domain;

    fn rows() -> Vec<MetricRow> {
        vec![
            MetricRow::new("Coherence", "95%"),
            MetricRow::new(" Proto-Awareness ", "100.00%"),
        ]
    }

    #[test]
    fn test_exact_pass() {
        let result = Auditor::default().audit(&rows()).unwrap();
        assert_eq!(result.status, AuditStatus::Pass);
        assert_eq!(result.value, 100.0);
        assert_eq!(result.to_string(), "proto_awareness: PASS");
        assert_eq!(result.status.exit_code(), 0);
    }

    #[test]
    fn test_exact_fail() {
        let auditor = Auditor::new(AuditConfig::exact("coherence", 100.0));
        let result = auditor.audit(&rows()).unwrap();
        assert_eq!(result.status, AuditStatus::Fail);
        assert_eq!(
            result.to_string(),
            "coherence: FAIL (Value was 95, required 100.00)"
        );
        assert_eq!(result.status.exit_code(), 1);
    }

    #[test]
    fn test_at_least() {
        let auditor = Auditor::new(AuditConfig::at_least("Coherence", 90.0));
        assert_eq!(auditor.audit(&rows()).unwrap().status, AuditStatus::Pass);

        let auditor = Auditor::new(AuditConfig::at_least("Coherence", 96.0));
        let result = auditor.audit(&rows()).unwrap();
        assert_eq!(result.status, AuditStatus::Fail);
        assert!(result.reason.unwrap().contains("at least 96.00"));
    }

    #[test]
    fn test_missing_metric() {
        let auditor = Auditor::new(AuditConfig::exact("Recall", 100.0));
        assert_eq!(
            auditor.audit(&rows()),
            Err(AuditError::MissingMetric("Recall".to_string()))
        );
    }

    #[test]
    fn test_invalid_value() {
        let rows = vec![MetricRow::new("Proto-Awareness", "full")];
        match Auditor::default().audit(&rows) {
            Err(AuditError::InvalidValue { value, .. }) => assert_eq!(value, "full"),
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_first_matching_row_wins() {
        let rows = vec![
            MetricRow::new("proto-awareness", "50%"),
            MetricRow::new("Proto-Awareness", "100%"),
        ];
        let result = Auditor::default().audit(&rows).unwrap();
        assert_eq!(result.value, 50.0);
    }

    #[test]
    fn test_audit_node() {
        let node = Node::new("A", 100.0, 0, Domain::Scientific);
        let result = Auditor::default().audit_node(&node).unwrap();
        assert_eq!(result.status, AuditStatus::Pass);

        let node = Node::new("B", 99.996, 0, Domain::Scientific);
        // Exported with two decimals, so this rounds up to 100.00%
        let result = Auditor::default().audit_node(&node).unwrap();
        assert_eq!(result.status, AuditStatus::Pass);
    }

    #[test]
    fn test_result_serializes() {
        let result = Auditor::default().audit(&rows()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "PASS");
        assert_eq!(json["reason"], serde_json::Value::Null);
    }
}
