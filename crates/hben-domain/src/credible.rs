//! Credible interval module

use crate::hfactor::round_to;
use serde::Serialize;

/// Default measurement variability
pub const DEFAULT_ALEATORIC: f64 = 0.02;

/// Default knowledge-limitation uncertainty
pub const DEFAULT_EPISTEMIC: f64 = 0.02;

/// Credible interval representing [lower, upper] confidence percentages
///
/// Both bounds are in [0, 100] and rounded to one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CredibleInterval {
    /// Lower bound, percent
    pub lower: f64,
    /// Upper bound, percent
    pub upper: f64,
}

impl CredibleInterval {
    /// Compute the interval around `confidence_percentage`
    ///
    /// The two uncertainty sources are combined in quadrature and the
    /// half-width is scaled by `(2 - hfactor)`, so trusted nodes get
    /// narrower intervals.
    pub fn around(confidence_percentage: f64, hfactor: f64, aleatoric: f64, epistemic: f64) -> Self {
        let p = confidence_percentage / 100.0;
        let total_uncertainty = (aleatoric.powi(2) + epistemic.powi(2)).sqrt();
        let half_width = total_uncertainty * (2.0 - hfactor);

        let lower = (p - half_width).max(0.0);
        let upper = (p + half_width).min(1.0);

        Self {
            lower: round_to(lower * 100.0, 1),
            upper: round_to(upper * 100.0, 1),
        }
    }

    /// Get the midpoint of the interval
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// Get the width of the interval (uncertainty measure)
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Check if the interval contains a value
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_around_midrange() {
        // sqrt(0.02^2 + 0.02^2) = 0.028284, * (2 - 0.5) = 0.042426
        let ci = CredibleInterval::around(50.0, 0.5, DEFAULT_ALEATORIC, DEFAULT_EPISTEMIC);
        assert_eq!(ci.lower, 45.8);
        assert_eq!(ci.upper, 54.2);
    }

    #[test]
    fn test_higher_hfactor_narrows() {
        let loose = CredibleInterval::around(60.0, 0.1, DEFAULT_ALEATORIC, DEFAULT_EPISTEMIC);
        let tight = CredibleInterval::around(60.0, 0.9, DEFAULT_ALEATORIC, DEFAULT_EPISTEMIC);
        assert!(tight.width() < loose.width());
    }

    #[test]
    fn test_clamped_at_extremes() {
        let top = CredibleInterval::around(100.0, 0.9, DEFAULT_ALEATORIC, DEFAULT_EPISTEMIC);
        assert_eq!(top.upper, 100.0);

        let bottom = CredibleInterval::around(0.0, 0.0, DEFAULT_ALEATORIC, DEFAULT_EPISTEMIC);
        assert_eq!(bottom.lower, 0.0);
    }

    #[test]
    fn test_zero_uncertainty_collapses() {
        let ci = CredibleInterval::around(70.0, 0.6, 0.0, 0.0);
        assert_eq!(ci.lower, 70.0);
        assert_eq!(ci.upper, 70.0);
        assert_eq!(ci.width(), 0.0);
    }

    #[test]
    fn test_midpoint_and_contains() {
        let ci = CredibleInterval { lower: 40.0, upper: 60.0 };
        assert_eq!(ci.midpoint(), 50.0);
        assert!(ci.contains(55.0));
        assert!(!ci.contains(61.0));
    }
}
