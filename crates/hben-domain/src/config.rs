//! Configuration for steady-state propagation
//!
//! Controls how much of a node's prior confidence survives each propagation
//! pass, the fallback weight for missing edges, and whether results are
//! clamped to [0, 100].

use serde::{Deserialize, Serialize};

/// Share of the prior confidence retained on each pass (default: 0.3)
pub const PRIOR_WEIGHT: f64 = 0.3;

/// Share of the parent-derived confidence applied on each pass (default: 0.7)
pub const EVIDENCE_WEIGHT: f64 = 0.7;

/// Weight used when an edge weight lookup misses (default: 0.5)
pub const DEFAULT_EDGE_WEIGHT: f64 = 0.5;

/// Configuration for [`EntailmentDag::propagate_confidence`](crate::EntailmentDag::propagate_confidence)
///
/// # Examples
///
/// ```
/// use hben_domain::PropagationConfig;
///
/// let config = PropagationConfig::default();
/// assert_eq!(config.prior_weight, 0.3);
/// assert!(!config.clamp_confidence);
///
/// let config = PropagationConfig::conservative();
/// assert!(config.clamp_confidence);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationConfig {
    /// Weight of the node's current confidence in the blend
    #[serde(default = "default_prior_weight")]
    pub prior_weight: f64,

    /// Weight of the weighted parent average in the blend
    #[serde(default = "default_evidence_weight")]
    pub evidence_weight: f64,

    /// Fallback weight when an edge lookup misses
    #[serde(default = "default_edge_weight")]
    pub default_edge_weight: f64,

    /// Clamp propagated confidence into [0, 100]
    /// Default: false (the blend is applied as-is)
    #[serde(default)]
    pub clamp_confidence: bool,
}

fn default_prior_weight() -> f64 {
    PRIOR_WEIGHT
}

fn default_evidence_weight() -> f64 {
    EVIDENCE_WEIGHT
}

fn default_edge_weight() -> f64 {
    DEFAULT_EDGE_WEIGHT
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            prior_weight: PRIOR_WEIGHT,
            evidence_weight: EVIDENCE_WEIGHT,
            default_edge_weight: DEFAULT_EDGE_WEIGHT,
            clamp_confidence: false,
        }
    }
}

impl PropagationConfig {
    /// Slow-moving beliefs: half prior, half evidence, clamped
    pub fn conservative() -> Self {
        Self {
            prior_weight: 0.5,
            evidence_weight: 0.5,
            default_edge_weight: DEFAULT_EDGE_WEIGHT,
            clamp_confidence: true,
        }
    }

    /// Fast-moving beliefs: evidence dominates
    pub fn responsive() -> Self {
        Self {
            prior_weight: 0.1,
            evidence_weight: 0.9,
            default_edge_weight: DEFAULT_EDGE_WEIGHT,
            clamp_confidence: false,
        }
    }

    /// Blend a prior with a newly computed value
    pub(crate) fn blend(&self, prior: f64, computed: f64) -> f64 {
        let blended = self.prior_weight * prior + self.evidence_weight * computed;
        if self.clamp_confidence {
            blended.clamp(0.0, 100.0)
        } else {
            blended
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PropagationConfig::default();
        assert_eq!(config.prior_weight, 0.3);
        assert_eq!(config.evidence_weight, 0.7);
        assert_eq!(config.default_edge_weight, 0.5);
        assert!(!config.clamp_confidence);
    }

    #[test]
    fn test_presets() {
        assert_eq!(PropagationConfig::conservative().prior_weight, 0.5);
        assert_eq!(PropagationConfig::responsive().evidence_weight, 0.9);
    }

    #[test]
    fn test_blend_unclamped() {
        let config = PropagationConfig::default();
        // 0.3 * 100 + 0.7 * 200 = 170
        assert!((config.blend(100.0, 200.0) - 170.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_clamped() {
        let config = PropagationConfig {
            clamp_confidence: true,
            ..PropagationConfig::default()
        };
        assert_eq!(config.blend(100.0, 200.0), 100.0);
        assert_eq!(config.blend(-10.0, -10.0), 0.0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PropagationConfig = toml::from_str("clamp_confidence = true").unwrap();
        assert_eq!(config.prior_weight, 0.3);
        assert_eq!(config.evidence_weight, 0.7);
        assert!(config.clamp_confidence);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = PropagationConfig::responsive();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: PropagationConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
