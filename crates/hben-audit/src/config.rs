//! Audit configuration

use serde::{Deserialize, Serialize};

/// Metric audited when none is named
pub const DEFAULT_METRIC: &str = "Proto-Awareness";

/// Required value when none is given
pub const DEFAULT_REQUIRED: f64 = 100.0;

/// How a metric value is compared with the required threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Value must equal the threshold exactly
    #[default]
    Exact,
    /// Value must be greater than or equal to the threshold
    AtLeast,
}

impl ThresholdMode {
    /// Whether `value` satisfies `required` under this mode
    #[allow(clippy::float_cmp)]
    pub fn accepts(&self, value: f64, required: f64) -> bool {
        match self {
            ThresholdMode::Exact => value == required,
            ThresholdMode::AtLeast => value >= required,
        }
    }
}

/// Configuration for an audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Metric name to look up
    pub metric_name: String,

    /// Required value, in percent
    pub required: f64,

    /// Comparison mode
    pub mode: ThresholdMode,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            metric_name: DEFAULT_METRIC.to_string(),
            required: DEFAULT_REQUIRED,
            mode: ThresholdMode::Exact,
        }
    }
}

impl AuditConfig {
    /// Require `metric_name` to equal `required` exactly
    pub fn exact(metric_name: impl Into<String>, required: f64) -> Self {
        Self {
            metric_name: metric_name.into(),
            required,
            mode: ThresholdMode::Exact,
        }
    }

    /// Require `metric_name` to reach at least `minimum`
    pub fn at_least(metric_name: impl Into<String>, minimum: f64) -> Self {
        Self {
            metric_name: metric_name.into(),
            required: minimum,
            mode: ThresholdMode::AtLeast,
        }
    }
}
